use std::fmt;

use log::debug;
use serde::Serialize;

use super::peaks::{find_peaks, PeakOptions};
use crate::data::Series;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for spike detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Peaks at or above this pressure (mbar) are high spikes.
    pub high_threshold: f64,
    /// Peaks at or above this pressure but below `high_threshold` are low spikes.
    pub low_threshold: f64,
    /// Minimum distance between peaks, in samples.
    pub min_distance: usize,
    /// How far before the peak the ambient pressure is sampled (ms).
    pub ambient_lookback_ms: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            high_threshold: 1200.0,
            low_threshold: 840.0,
            min_distance: 1000,
            ambient_lookback_ms: 100.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Spike
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpikeKind {
    High,
    Low,
}

impl SpikeKind {
    /// Half-width of the chart window drawn around a spike (ms).
    pub fn window_ms(self) -> f64 {
        match self {
            SpikeKind::High => 600.0,
            SpikeKind::Low => 400.0,
        }
    }
}

impl fmt::Display for SpikeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpikeKind::High => write!(f, "High"),
            SpikeKind::Low => write!(f, "Low"),
        }
    }
}

/// A detected pressure excursion and its return to ambient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spike {
    pub peak_idx: usize,
    pub peak_time: f64,
    pub peak_pressure: f64,
    pub ambient_pressure: f64,
    pub crossing_time: f64,
    /// `crossing_time - peak_time`, never negative.
    pub duration: f64,
    #[serde(rename = "type")]
    pub kind: SpikeKind,
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Pressure of the sample whose time is nearest `peak_time - lookback_ms`.
/// Ties resolve to the earliest sample.
pub fn ambient_pressure(series: &Series, peak_idx: usize, lookback_ms: f64) -> Option<f64> {
    let target = series.times.get(peak_idx)? - lookback_ms;

    let mut best: Option<(usize, f64)> = None;
    for (i, &t) in series.times.iter().enumerate() {
        let dist = (t - target).abs();
        match best {
            Some((_, d)) if d <= dist => {}
            _ => best = Some((i, dist)),
        }
    }
    best.and_then(|(i, _)| series.pressures.get(i).copied())
}

/// Index of the first sample at or after `peak_idx` with pressure `<= ambient`.
pub fn crossing_index(series: &Series, peak_idx: usize, ambient: f64) -> Option<usize> {
    series
        .pressures
        .get(peak_idx..)?
        .iter()
        .position(|&p| p <= ambient)
        .map(|offset| peak_idx + offset)
}

/// Measure the spike whose peak is at `peak_idx`.
///
/// `None` if the pressure never falls back to ambient before the series ends.
pub fn measure_spike(
    series: &Series,
    peak_idx: usize,
    kind: SpikeKind,
    config: &DetectorConfig,
) -> Option<Spike> {
    let peak = series.get(peak_idx)?;
    let ambient = ambient_pressure(series, peak_idx, config.ambient_lookback_ms)?;

    let Some(crossing_idx) = crossing_index(series, peak_idx, ambient) else {
        debug!(
            "{kind} peak at {:.1} ms ({:.1} mbar) never returns to {ambient:.1} mbar; dropped",
            peak.time, peak.pressure
        );
        return None;
    };
    let crossing_time = series.times[crossing_idx];

    Some(Spike {
        peak_idx,
        peak_time: peak.time,
        peak_pressure: peak.pressure,
        ambient_pressure: ambient,
        crossing_time,
        duration: crossing_time - peak.time,
        kind,
    })
}

/// Find high and low spikes in `series`.
///
/// High spikes come first, then low spikes, each in time order.
pub fn find_spikes(series: &Series, config: &DetectorConfig) -> Vec<Spike> {
    if series.is_empty() {
        return Vec::new();
    }
    let pressures = &series.pressures;

    let high_peaks = find_peaks(
        pressures,
        &PeakOptions {
            min_height: Some(config.high_threshold),
            min_distance: config.min_distance,
        },
    );

    let low_peaks: Vec<usize> = find_peaks(
        pressures,
        &PeakOptions {
            min_height: Some(config.low_threshold),
            min_distance: config.min_distance,
        },
    )
    .into_iter()
    .filter(|&p| pressures[p] < config.high_threshold)
    .collect();

    debug!(
        "{} high and {} low candidate peak(s)",
        high_peaks.len(),
        low_peaks.len()
    );

    let high = high_peaks.into_iter().map(|p| (p, SpikeKind::High));
    let low = low_peaks.into_iter().map(|p| (p, SpikeKind::Low));

    high.chain(low)
        .filter_map(|(p, kind)| measure_spike(series, p, kind, config))
        .collect()
}

/// Order spikes for display: high, low, high, low, ... then leftovers.
pub fn interleave_for_display(spikes: &[Spike]) -> Vec<Spike> {
    let high: Vec<&Spike> = spikes.iter().filter(|s| s.kind == SpikeKind::High).collect();
    let low: Vec<&Spike> = spikes.iter().filter(|s| s.kind == SpikeKind::Low).collect();

    let mut sorted = Vec::with_capacity(spikes.len());
    for i in 0..high.len().max(low.len()) {
        if let Some(s) = high.get(i) {
            sorted.push(**s);
        }
        if let Some(s) = low.get(i) {
            sorted.push(**s);
        }
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    /// `n` samples 1 ms apart at `base`, with `pulses` overwritten.
    fn series_with(n: usize, base: f64, pulses: &[(usize, f64)]) -> Series {
        let times = (0..n).map(|i| i as f64).collect();
        let mut pressures = vec![base; n];
        for &(i, p) in pulses {
            pressures[i] = p;
        }
        Series::from_pressures(times, pressures)
    }

    #[test]
    fn empty_series_has_no_spikes() {
        assert!(find_spikes(&Series::default(), &DetectorConfig::default()).is_empty());
    }

    #[test]
    fn flat_series_has_no_spikes() {
        let series = series_with(5000, 1300.0, &[]);
        assert!(find_spikes(&series, &DetectorConfig::default()).is_empty());
    }

    #[test]
    fn isolated_high_pulse() {
        // Pulse above the 800 mbar baseline for samples 500..=504.
        let pulses: Vec<(usize, f64)> = vec![
            (500, 1000.0),
            (501, 1150.0),
            (502, 1250.0),
            (503, 1100.0),
            (504, 900.0),
        ];
        let series = series_with(2000, 800.0, &pulses);

        let spikes = find_spikes(&series, &DetectorConfig::default());
        assert_eq!(spikes.len(), 1);

        let spike = spikes[0];
        assert_eq!(spike.kind, SpikeKind::High);
        assert_eq!(spike.peak_idx, 502);
        assert_approx_eq!(spike.peak_pressure, 1250.0);
        assert_approx_eq!(spike.ambient_pressure, 800.0);
        assert_approx_eq!(spike.crossing_time, 505.0);
        // 502, 503, 504 stay above baseline.
        assert_approx_eq!(spike.duration, 3.0);
    }

    #[test]
    fn low_and_high_are_exclusive() {
        let series = series_with(5000, 800.0, &[(1000, 1250.0), (3000, 880.0)]);
        let spikes = find_spikes(&series, &DetectorConfig::default());

        assert_eq!(spikes.len(), 2);
        assert_eq!(spikes[0].kind, SpikeKind::High);
        assert_eq!(spikes[0].peak_idx, 1000);
        assert_eq!(spikes[1].kind, SpikeKind::Low);
        assert_eq!(spikes[1].peak_idx, 3000);
    }

    #[test]
    fn below_low_threshold_is_ignored() {
        let series = series_with(3000, 800.0, &[(1000, 839.0)]);
        assert!(find_spikes(&series, &DetectorConfig::default()).is_empty());
    }

    #[test]
    fn close_peaks_collapse_to_the_taller() {
        let series = series_with(3000, 800.0, &[(1000, 1250.0), (1500, 1300.0)]);
        let spikes = find_spikes(&series, &DetectorConfig::default());

        assert_eq!(spikes.len(), 1);
        assert_eq!(spikes[0].peak_idx, 1500);
        assert_approx_eq!(spikes[0].peak_pressure, 1300.0);
    }

    #[test]
    fn high_peak_suppresses_nearby_low_peak() {
        // The low pass sees both peaks; the taller one wins then gets filtered out.
        let series = series_with(3000, 800.0, &[(1000, 1250.0), (1500, 900.0)]);
        let spikes = find_spikes(&series, &DetectorConfig::default());

        assert_eq!(spikes.len(), 1);
        assert_eq!(spikes[0].kind, SpikeKind::High);
    }

    #[test]
    fn spike_that_never_returns_is_dropped() {
        let mut series = series_with(1500, 800.0, &[]);
        for p in &mut series.pressures[1000..1499] {
            *p = 1210.0;
        }
        series.pressures[1000] = 1250.0;
        series.pressures[1499] = 1205.0;
        assert!(find_spikes(&series, &DetectorConfig::default()).is_empty());
    }

    #[test]
    fn ambient_uses_nearest_sample_to_lookback() {
        // Samples every 30 ms: peak at 300 → target 200, nearest sample is 210.
        let times: Vec<f64> = (0..12).map(|i| i as f64 * 30.0).collect();
        let mut pressures: Vec<f64> = (0..12).map(|i| 800.0 + i as f64).collect();
        pressures[10] = 1250.0;
        let series = Series::from_pressures(times, pressures);

        assert_eq!(ambient_pressure(&series, 10, 100.0), Some(807.0));
    }

    #[test]
    fn ambient_tie_takes_earlier_sample() {
        let series = Series::from_pressures(vec![0.0, 10.0, 20.0], vec![1.0, 2.0, 3.0]);
        // Target 5 ms is equally far from 0 and 10.
        assert_eq!(ambient_pressure(&series, 2, 15.0), Some(1.0));
    }

    #[test]
    fn ambient_before_series_start_clamps_to_first_sample() {
        let series = Series::from_pressures(
            vec![1.0, 2.0, 3.0, 4.0],
            vec![800.0, 800.0, 1250.0, 800.0],
        );
        assert_eq!(ambient_pressure(&series, 2, 100.0), Some(800.0));
    }

    #[test]
    fn crossing_scan_starts_at_peak() {
        let series = Series::from_pressures(vec![0.0, 1.0, 2.0], vec![5.0, 9.0, 4.0]);
        assert_eq!(crossing_index(&series, 1, 5.0), Some(2));
        assert_eq!(crossing_index(&series, 1, 9.0), Some(1));
        assert_eq!(crossing_index(&series, 1, 3.0), None);
    }

    #[test]
    fn custom_thresholds() {
        let series = series_with(100, 10.0, &[(20, 30.0), (60, 15.0)]);
        let config = DetectorConfig {
            high_threshold: 25.0,
            low_threshold: 12.0,
            min_distance: 10,
            ambient_lookback_ms: 5.0,
        };
        let spikes = find_spikes(&series, &config);
        let kinds: Vec<SpikeKind> = spikes.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SpikeKind::High, SpikeKind::Low]);
        assert!(spikes.iter().all(|s| s.duration >= 0.0));
    }

    #[test]
    fn interleave_alternates_kinds() {
        let spike = |idx: usize, kind| Spike {
            peak_idx: idx,
            peak_time: idx as f64,
            peak_pressure: 0.0,
            ambient_pressure: 0.0,
            crossing_time: idx as f64,
            duration: 0.0,
            kind,
        };
        let spikes = vec![
            spike(1, SpikeKind::High),
            spike(2, SpikeKind::High),
            spike(3, SpikeKind::High),
            spike(10, SpikeKind::Low),
        ];

        let order: Vec<usize> = interleave_for_display(&spikes)
            .iter()
            .map(|s| s.peak_idx)
            .collect();
        assert_eq!(order, vec![1, 10, 2, 3]);
    }

    #[test]
    fn spike_serialises_with_type_tag() {
        let series = series_with(2000, 800.0, &[(1000, 1250.0)]);
        let spikes = find_spikes(&series, &DetectorConfig::default());
        let json = serde_json::to_value(spikes[0]).unwrap();
        assert_eq!(json["type"], "high");
        assert_eq!(json["peak_idx"], 1000);
    }
}
