use clap::Args;

use crate::spikes::DetectorConfig;

/// Spike detection thresholds, shared by the binaries that detect spikes.
#[derive(Debug, Clone, Args)]
pub struct DetectorArgs {
    /// Peaks at or above this pressure (mbar) are high spikes.
    #[clap(long, default_value_t = 1200.0)]
    pub high_threshold: f64,

    /// Peaks at or above this pressure (mbar), and below the high threshold, are low spikes.
    #[clap(long, default_value_t = 840.0)]
    pub low_threshold: f64,

    /// Minimum separation between peaks, in samples.
    #[clap(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    pub min_distance: u64,

    /// The ambient pressure is read this many ms before each peak.
    #[clap(long, default_value_t = 100.0)]
    pub lookback_ms: f64,
}

impl From<&DetectorArgs> for DetectorConfig {
    fn from(args: &DetectorArgs) -> Self {
        DetectorConfig {
            high_threshold: args.high_threshold,
            low_threshold: args.low_threshold,
            min_distance: args.min_distance as usize,
            ambient_lookback_ms: args.lookback_ms,
        }
    }
}
