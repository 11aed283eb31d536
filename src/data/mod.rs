/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  <base>_001.csv  <base>_002.csv  ...
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  glob + sort, parse rows, fold running time → Series
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Series   │  times / pressures / temperatures (ms, mbar, °C)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  inclusive time window → sub-series
///   └──────────┘
/// ```

pub mod convert;
pub mod filter;
pub mod loader;
pub mod model;

pub use loader::{LoadError, LoadedSeries};
pub use model::{Sample, Series};
