use log::{info, warn};

use crate::data::loader::{self, LoadError, LoadedSeries};
use crate::spikes::{find_spikes, interleave_for_display, DetectorConfig, Spike};

// ---------------------------------------------------------------------------
// One spike-analysis run
// ---------------------------------------------------------------------------

/// Everything produced by analysing one recording, independent of output.
#[derive(Debug, Clone)]
pub struct SpikeAnalysis {
    /// Recording prefix (`<base>_*.csv`).
    pub base: String,

    /// The concatenated input.
    pub loaded: LoadedSeries,

    /// Detected spikes: high first, then low.
    pub spikes: Vec<Spike>,
}

impl SpikeAnalysis {
    /// Load `base` and detect its spikes.
    pub fn run(base: &str, config: &DetectorConfig) -> Result<Self, LoadError> {
        let loaded = loader::load_series(base)?;
        Ok(Self::from_loaded(base, loaded, config))
    }

    /// Detect spikes in an already loaded recording.
    pub fn from_loaded(base: &str, loaded: LoadedSeries, config: &DetectorConfig) -> Self {
        if loaded.series.is_empty() {
            warn!("'{base}' contains no samples");
        }
        let spikes = find_spikes(&loaded.series, config);
        info!("'{base}': {} spike(s) found", spikes.len());

        SpikeAnalysis {
            base: base.to_string(),
            loaded,
            spikes,
        }
    }

    /// Spikes in chart order.
    pub fn display_order(&self) -> Vec<Spike> {
        interleave_for_display(&self.spikes)
    }

    pub fn is_empty(&self) -> bool {
        self.spikes.is_empty()
    }

    /// Default chart file name for this run.
    pub fn chart_stem(&self) -> String {
        format!("{}_spike_analysis", self.base)
    }
}
