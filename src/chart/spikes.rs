use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use super::{tick_points, Chart, ChartError, DrawResultExt};
use crate::data::Series;
use crate::spikes::{Spike, SpikeKind};

const PANEL_WIDTH: u32 = 900;
const PANEL_HEIGHT: u32 = 600;
const FOOTER_HEIGHT: u32 = 70;
const TICK_MS: f64 = 100.0;

/// Per-spike close-up panels, two per row, with an analysis footer.
pub struct SpikeGrid<'a> {
    pub base: &'a str,
    pub series: &'a Series,
    /// Spikes in the order the panels are laid out.
    pub spikes: &'a [Spike],
}

impl<'a> SpikeGrid<'a> {
    pub fn new(base: &'a str, series: &'a Series, spikes: &'a [Spike]) -> Self {
        SpikeGrid {
            base,
            series,
            spikes,
        }
    }

    fn columns(&self) -> usize {
        self.spikes.len().clamp(1, 2)
    }

    fn rows(&self) -> usize {
        self.spikes.len().div_ceil(2).max(1)
    }
}

/// The time range shown around one spike, and its samples re-based to start at 0.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SpikeWindow {
    pub start: f64,
    pub end: f64,
    pub points: Vec<(f64, f64)>,
}

impl SpikeWindow {
    pub(crate) fn around(series: &Series, spike: &Spike) -> Self {
        let half = spike.kind.window_ms();
        let t_max = series.max_time().unwrap_or(spike.crossing_time);
        let start = (spike.peak_time - half).max(0.0);
        let end = t_max.min(spike.crossing_time + half);

        let points = series
            .iter()
            .filter(|s| start <= s.time && s.time <= end)
            .map(|s| (s.time - start, s.pressure))
            .collect();

        SpikeWindow { start, end, points }
    }

    /// Width of the x axis, at least one tick.
    fn width(&self) -> f64 {
        let max_x = self
            .points
            .iter()
            .map(|&(t, _)| t)
            .fold(self.end - self.start, f64::max);
        max_x.max(TICK_MS)
    }
}

/// Y range of a spike panel: fixed ceilings per kind, floor just under ambient.
pub(crate) fn pressure_range(spike: &Spike) -> (f64, f64) {
    let (below, top): (f64, f64) = match spike.kind {
        SpikeKind::High => (20.0, 1300.0),
        SpikeKind::Low => (10.0, 900.0),
    };
    let bottom = spike.ambient_pressure - below;
    (bottom, top.max(bottom + 1.0))
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    series: &Series,
    spike: &Spike,
    number: usize,
) -> Result<(), ChartError> {
    let window = SpikeWindow::around(series, spike);
    let width = window.width();
    let (y_min, y_max) = pressure_range(spike);
    let ticks = tick_points(0.0, width, TICK_MS);
    let labels = ticks.len().max(2);

    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("{} Pressure Spike {number}", spike.kind),
            ("sans-serif", 24).into_font(),
        )
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d((0.0..width).with_key_points(ticks), y_min..y_max)
        .drawing("spike panel")?;

    chart
        .configure_mesh()
        .x_desc("Time (milliseconds)")
        .y_desc("Pressure (mbar)")
        .x_labels(labels)
        .x_label_formatter(&|x| format!("{x:.0}"))
        .bold_line_style(BLACK.mix(0.1).stroke_width(1))
        .light_line_style(ShapeStyle::from(&WHITE))
        .draw()
        .drawing("spike mesh")?;

    chart
        .draw_series(LineSeries::new(
            window.points.iter().copied(),
            BLUE.stroke_width(2),
        ))
        .drawing("pressure trace")?;

    let peak_x = spike.peak_time - window.start;
    let crossing_x = spike.crossing_time - window.start;

    let peak_style = RED.mix(0.5).stroke_width(2);
    chart
        .draw_series(DashedLineSeries::new(
            vec![(peak_x, y_min), (peak_x, y_max)],
            8,
            5,
            peak_style,
        ))
        .drawing("peak marker")?
        .label("Peak")
        .legend(move |(x, y)| PathElement::new(vec![(x - 10, y), (x + 10, y)], peak_style));

    let crossing_style = GREEN.mix(0.5).stroke_width(2);
    chart
        .draw_series(DashedLineSeries::new(
            vec![(crossing_x, y_min), (crossing_x, y_max)],
            8,
            5,
            crossing_style,
        ))
        .drawing("crossing marker")?
        .label("Ambient Crossing")
        .legend(move |(x, y)| PathElement::new(vec![(x - 10, y), (x + 10, y)], crossing_style));

    let ambient_style = BLACK.mix(0.3).stroke_width(1);
    chart
        .draw_series(DashedLineSeries::new(
            vec![(0.0, spike.ambient_pressure), (width, spike.ambient_pressure)],
            8,
            5,
            ambient_style,
        ))
        .drawing("ambient marker")?
        .label(format!("Ambient ({:.1} mbar)", spike.ambient_pressure))
        .legend(move |(x, y)| PathElement::new(vec![(x - 10, y), (x + 10, y)], ambient_style));

    // Annotation box between the peak and the crossing, pointing at the peak.
    let note_x = crossing_x - (crossing_x - peak_x) * 0.3;
    let note_y = (spike.peak_pressure + spike.ambient_pressure) / 2.0;
    chart
        .draw_series(LineSeries::new(
            vec![(note_x, note_y), (peak_x, spike.peak_pressure)],
            BLACK.stroke_width(1),
        ))
        .drawing("annotation arrow")?;

    let font = ("sans-serif", 16).into_font().color(&BLACK);
    chart
        .draw_series(std::iter::once(
            EmptyElement::at((note_x, note_y))
                + Rectangle::new([(-80, -22), (80, 22)], YELLOW.mix(0.5).filled())
                + Text::new(
                    format!("Duration: {:.1} ms", spike.duration),
                    (-72, -16),
                    font.clone(),
                )
                + Text::new(
                    format!("Peak: {:.1} mbar", spike.peak_pressure),
                    (-72, 4),
                    font,
                ),
        ))
        .drawing("annotation")?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8).filled())
        .border_style(BLACK.mix(0.3).stroke_width(1))
        .draw()
        .drawing("legend")?;

    Ok(())
}

impl Chart for SpikeGrid<'_> {
    fn size(&self) -> (u32, u32) {
        (
            PANEL_WIDTH * self.columns() as u32,
            PANEL_HEIGHT * self.rows() as u32 + FOOTER_HEIGHT,
        )
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), ChartError> {
        if self.spikes.is_empty() {
            return Err(ChartError::Empty("no spikes"));
        }
        root.fill(&WHITE).drawing("background")?;

        let (_, height) = root.dim_in_pixel();
        let (grid, footer) = root.split_vertically(height.saturating_sub(FOOTER_HEIGHT));

        let panels = grid.split_evenly((self.rows(), self.columns()));
        for (i, (spike, area)) in self.spikes.iter().zip(panels.iter()).enumerate() {
            draw_panel(area, self.series, spike, i + 1)?;
        }

        let font = ("monospace", 16).into_font().color(&BLACK);
        footer
            .draw(&Rectangle::new(
                [(10, 5), (420, FOOTER_HEIGHT as i32 - 10)],
                ShapeStyle::from(&BLACK).stroke_width(1),
            ))
            .drawing("footer box")?;
        footer
            .draw(&Text::new("Analysis Parameters:", (20, 14), font.clone()))
            .drawing("footer")?;
        footer
            .draw(&Text::new(
                format!("Base Filename: {}", self.base),
                (20, 36),
                font,
            ))
            .drawing("footer")?;

        Ok(())
    }
}
