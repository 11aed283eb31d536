//! Chart rendering with `plotters`.
//!
//! Each chart implements [`Chart`] against any drawing backend. Files are
//! written as SVG; tests render into an in-memory SVG string.

mod overview;
mod spikes;

use std::fmt::Display;
use std::path::{Path, PathBuf};

use log::info;
use plotters::coord::Shift;
use plotters::prelude::{DrawingArea, DrawingBackend, IntoDrawingArea, SVGBackend};
use thiserror::Error;

pub use overview::{OverviewChart, Trace, XTicks};
pub use spikes::SpikeGrid;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("nothing to draw: {0}")]
    Empty(&'static str),

    #[error("drawing {what}: {message}")]
    Draw { what: &'static str, message: String },
}

/// Attach what was being drawn to a `plotters` error.
pub(crate) trait DrawResultExt<T> {
    fn drawing(self, what: &'static str) -> Result<T, ChartError>;
}

impl<T, E: Display> DrawResultExt<T> for Result<T, E> {
    fn drawing(self, what: &'static str) -> Result<T, ChartError> {
        self.map_err(|e| ChartError::Draw {
            what,
            message: e.to_string(),
        })
    }
}

/// Extension of every chart file written by [`save`].
pub const EXTENSION: &str = "svg";

/// `<stem>.svg`
pub fn file_name(stem: &str) -> PathBuf {
    PathBuf::from(format!("{stem}.{EXTENSION}"))
}

/// Something that can draw itself onto a drawing area.
pub trait Chart {
    /// Preferred image size in pixels.
    fn size(&self) -> (u32, u32);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), ChartError>;
}

/// Render `chart` to an SVG file at `path`.
pub fn save<C: Chart>(chart: &C, path: &Path) -> Result<(), ChartError> {
    {
        let root = SVGBackend::new(path, chart.size()).into_drawing_area();
        chart.draw(&root)?;
        root.present().drawing("svg file")?;
    }
    info!("chart written to {}", path.display());
    Ok(())
}

/// Render `chart` to an SVG document in memory.
pub fn render_svg<C: Chart>(chart: &C) -> Result<String, ChartError> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, chart.size()).into_drawing_area();
        chart.draw(&root)?;
        root.present().drawing("svg string")?;
    }
    Ok(buf)
}

/// Multiples of `step` from `first` up to `last`, inclusive, as axis key points.
pub(crate) fn tick_points(first: f64, last: f64, step: f64) -> Vec<f64> {
    if !(first.is_finite() && last.is_finite() && step > 0.0) || last < first {
        return Vec::new();
    }
    let count = ((last - first) / step + 1e-9).floor() as usize;
    (0..=count).map(|i| first + i as f64 * step).collect()
}

/// A round tick step giving about `target` ticks over `span`: 1, 2 or 5 times a power of ten.
pub(crate) fn nice_step(span: f64, target: usize) -> f64 {
    if !(span > 0.0 && span.is_finite()) || target == 0 {
        return 1.0;
    }
    let raw = span / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|&s| s >= raw)
        .unwrap_or(10.0 * magnitude)
}

/// Pad a `min..max` range so it is never empty.
pub(crate) fn padded_range(min: f64, max: f64, fraction: f64) -> (f64, f64) {
    if !(min.is_finite() && max.is_finite()) {
        return (0.0, 1.0);
    }
    let span = max - min;
    if span <= 0.0 {
        return (min - 1.0, max + 1.0);
    }
    (min - span * fraction, max + span * fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_svg() {
        assert_eq!(
            file_name("run_spike_analysis"),
            PathBuf::from("run_spike_analysis.svg")
        );
    }

    #[test]
    fn ticks_are_multiples_of_the_step() {
        assert_eq!(tick_points(0.0, 350.0, 100.0), vec![0.0, 100.0, 200.0, 300.0]);
        assert_eq!(tick_points(100.0, 1100.0, 500.0), vec![100.0, 600.0, 1100.0]);
        assert!(tick_points(10.0, 0.0, 1.0).is_empty());
        assert!(tick_points(0.0, 10.0, 0.0).is_empty());
    }

    #[test]
    fn long_spans_keep_every_tick() {
        assert_eq!(tick_points(0.0, 12_000.0, 100.0).len(), 121);
    }

    #[test]
    fn nice_steps() {
        assert_eq!(nice_step(10.0, 10), 1.0);
        assert_eq!(nice_step(30.0, 10), 5.0);
        assert_eq!(nice_step(150.0, 10), 20.0);
        assert_eq!(nice_step(0.0, 10), 1.0);
    }

    #[test]
    fn padded_ranges_are_never_empty() {
        assert_eq!(padded_range(5.0, 5.0, 0.05), (4.0, 6.0));
        assert_eq!(padded_range(0.0, 10.0, 0.1), (-1.0, 11.0));
        assert_eq!(padded_range(f64::INFINITY, f64::NEG_INFINITY, 0.1), (0.0, 1.0));
    }
}
