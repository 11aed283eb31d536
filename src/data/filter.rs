use super::model::Series;

// ---------------------------------------------------------------------------
// Time-window predicate
// ---------------------------------------------------------------------------

/// An inclusive time range in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start_ms: f64,
    pub end_ms: f64,
}

impl TimeWindow {
    pub fn new(start_ms: f64, end_ms: f64) -> Self {
        TimeWindow { start_ms, end_ms }
    }

    /// Whether `time` lies in the window (both ends included).
    pub fn contains(&self, time: f64) -> bool {
        self.start_ms <= time && time <= self.end_ms
    }
}

/// Return indices of samples whose time lies in `window`.
pub fn window_indices(series: &Series, window: &TimeWindow) -> Vec<usize> {
    series
        .times
        .iter()
        .enumerate()
        .filter(|(_, t)| window.contains(**t))
        .map(|(i, _)| i)
        .collect()
}

/// Copy out the part of `series` that lies in `window`.
///
/// Times are kept as-is (not re-based to the window start).
pub fn restrict(series: &Series, window: &TimeWindow) -> Series {
    window_indices(series, window)
        .into_iter()
        .filter_map(|i| series.get(i))
        .collect()
}
