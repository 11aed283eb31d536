//! Local-maxima peak finding with height and index-distance constraints.
//!
//! Mirrors the behaviour of the usual signal-processing `find_peaks`
//! routine restricted to its `height` and `distance` options.

/// Options for [`find_peaks`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakOptions {
    /// Minimum peak value, inclusive.
    pub min_height: Option<f64>,
    /// Minimum index separation between kept peaks (`>= 1`).
    pub min_distance: usize,
}

impl Default for PeakOptions {
    fn default() -> Self {
        PeakOptions {
            min_height: None,
            min_distance: 1,
        }
    }
}

/// Indices of the local maxima of `x`.
///
/// A sample is a maximum if its left neighbour is strictly lower and the
/// next sample with a different value to its right is strictly lower too.
/// Flat tops report their middle index (rounded down). The first and last
/// samples are never maxima.
pub fn local_maxima(x: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if x.len() < 3 {
        return peaks;
    }

    let i_max = x.len() - 1;
    let mut i = 1;
    while i < i_max {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < i_max && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                let left = i;
                let right = ahead - 1;
                peaks.push((left + right) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

/// Drop peaks closer than `distance` indices to a taller one.
///
/// Peaks are visited tallest first; between equal heights the later index
/// wins. `peaks` must be sorted ascending.
pub fn select_by_distance(x: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    if distance <= 1 || peaks.len() < 2 {
        return peaks.to_vec();
    }

    let mut priority: Vec<usize> = (0..peaks.len()).collect();
    // Stable, so ties keep index order and the later one is visited first below.
    priority.sort_by(|&a, &b| x[peaks[a]].total_cmp(&x[peaks[b]]));

    let mut keep = vec![true; peaks.len()];
    for &j in priority.iter().rev() {
        if !keep[j] {
            continue;
        }

        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < distance {
            keep[k - 1] = false;
            k -= 1;
        }

        let mut k = j + 1;
        while k < peaks.len() && peaks[k] - peaks[j] < distance {
            keep[k] = false;
            k += 1;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}

/// Find peaks in `x` satisfying `options`. Returned indices are ascending.
pub fn find_peaks(x: &[f64], options: &PeakOptions) -> Vec<usize> {
    let mut peaks = local_maxima(x);

    if let Some(min_height) = options.min_height {
        peaks.retain(|&p| x[p] >= min_height);
    }

    select_by_distance(x, &peaks, options.min_distance)
}
