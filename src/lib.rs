//! Pressure/temperature sensor log analysis.
//!
//! Recordings are sequences of `<base>_<seq>.csv` files whose rows carry a
//! time delta, pressure and temperature, all scaled ×100. The [`data`] layer
//! rebuilds one continuous series from them, [`spikes`] finds pressure
//! excursions and how long they take to settle, and [`chart`] draws the
//! results.

pub mod analysis;
pub mod chart;
pub mod cli;
pub mod color;
pub mod data;
pub mod report;
pub mod spikes;
