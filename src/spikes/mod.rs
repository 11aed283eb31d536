//! Pressure spike detection.
//!
//! `peaks` finds candidate maxima, `detector` turns them into [`Spike`]
//! records with an ambient baseline and a return-to-ambient duration.

pub mod detector;
pub mod peaks;

pub use detector::{find_spikes, interleave_for_display, DetectorConfig, Spike, SpikeKind};
