use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use super::{nice_step, padded_range, tick_points, Chart, ChartError, DrawResultExt};
use crate::data::Series;
use crate::report::float_label;

const WIDTH: u32 = 1800;
const PANEL_HEIGHT: u32 = 540;
const FOOTER_HEIGHT: u32 = 110;

/// Where x ticks go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum XTicks {
    /// Round steps chosen from the span.
    Auto,
    /// Every `step`, starting from the first multiple of `align` inside the data.
    Every { step: f64, align: f64 },
}

impl XTicks {
    pub fn points(self, min: f64, max: f64) -> Vec<f64> {
        match self {
            XTicks::Auto => {
                let step = nice_step(max - min, 10);
                tick_points((min / step).ceil() * step, max, step)
            }
            XTicks::Every { step, align } => {
                let first = (min / align).ceil() * align;
                let last = (max / align).floor() * align;
                tick_points(first, last, step)
            }
        }
    }
}

/// One recording drawn as a line.
pub struct Trace<'a> {
    pub label: String,
    pub color: RGBColor,
    pub series: &'a Series,
}

/// Pressure and temperature over time, one panel each, stacked.
pub struct OverviewChart<'a> {
    pub traces: Vec<Trace<'a>>,
    /// Appended to both panel titles.
    pub title_suffix: String,
    pub x_desc: &'static str,
    /// Vertical markers between chained recordings.
    pub separators: Vec<f64>,
    pub x_ticks: XTicks,
    pub label_decimals: usize,
    /// Lines of the parameter box under the panels; no box when empty.
    pub footer: Vec<String>,
}

impl<'a> OverviewChart<'a> {
    /// Several recordings chained end to end, time in hours.
    pub fn combined(traces: Vec<Trace<'a>>, separators: Vec<f64>) -> Self {
        OverviewChart {
            traces,
            title_suffix: String::new(),
            x_desc: "Time (hours)",
            separators,
            x_ticks: XTicks::Auto,
            label_decimals: 2,
            footer: Vec::new(),
        }
    }

    /// One recording restricted to `[start_s, end_s]`, time in ms.
    pub fn window(trace: Trace<'a>, start_s: f64, end_s: f64) -> Self {
        let footer = vec![
            "Input Parameters:".to_string(),
            format!("Base Filename: {}", trace.label),
            format!("Start Time: {} seconds", float_label(start_s)),
            format!("End Time: {} seconds", float_label(end_s)),
        ];
        OverviewChart {
            traces: vec![trace],
            title_suffix: format!(
                " ({} to {} seconds)",
                float_label(start_s),
                float_label(end_s)
            ),
            x_desc: "Time (milliseconds)",
            separators: Vec::new(),
            x_ticks: XTicks::Every {
                step: 500.0,
                align: 100.0,
            },
            label_decimals: 0,
            footer,
        }
    }

    fn time_range(&self) -> (f64, f64) {
        let (min, max) = self
            .traces
            .iter()
            .flat_map(|t| t.series.times.iter().copied())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
                (lo.min(t), hi.max(t))
            });
        padded_range(min, max, 0.0)
    }

    fn value_range(&self, values: fn(&Series) -> &[f64]) -> (f64, f64) {
        let (min, max) = self
            .traces
            .iter()
            .flat_map(|t| values(t.series).iter().copied())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        padded_range(min, max, 0.05)
    }

    fn draw_panel<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        title: &str,
        y_desc: &str,
        values: fn(&Series) -> &[f64],
    ) -> Result<(), ChartError> {
        let (x_min, x_max) = self.time_range();
        let (y_min, y_max) = self.value_range(values);
        let ticks = self.x_ticks.points(x_min, x_max);
        let labels = ticks.len().max(2);

        let mut chart = ChartBuilder::on(area)
            .caption(
                format!("{title}{}", self.title_suffix),
                ("sans-serif", 26).into_font(),
            )
            .margin(10)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d((x_min..x_max).with_key_points(ticks), y_min..y_max)
            .drawing("overview panel")?;

        let decimals = self.label_decimals;
        chart
            .configure_mesh()
            .x_desc(self.x_desc)
            .y_desc(y_desc)
            .x_labels(labels)
            .x_label_formatter(&|x| format!("{x:.decimals$}"))
            .bold_line_style(BLACK.mix(0.1).stroke_width(1))
            .light_line_style(ShapeStyle::from(&WHITE))
            .draw()
            .drawing("overview mesh")?;

        for trace in &self.traces {
            let color = trace.color;
            let points = trace
                .series
                .times
                .iter()
                .copied()
                .zip(values(trace.series).iter().copied());
            chart
                .draw_series(LineSeries::new(points, color.stroke_width(1)))
                .drawing("trace")?
                .label(trace.label.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x - 10, y), (x + 10, y)], color.stroke_width(2))
                });
        }

        let separator_style = RED.mix(0.2).stroke_width(1);
        for &sep in &self.separators {
            chart
                .draw_series(DashedLineSeries::new(
                    vec![(sep, y_min), (sep, y_max)],
                    6,
                    4,
                    separator_style,
                ))
                .drawing("separator")?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8).filled())
            .border_style(BLACK.mix(0.3).stroke_width(1))
            .draw()
            .drawing("legend")?;

        Ok(())
    }

    fn draw_footer<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
    ) -> Result<(), ChartError> {
        let font = ("monospace", 16).into_font().color(&BLACK);
        let bottom = 12 + 20 * self.footer.len() as i32;
        area.draw(&Rectangle::new(
            [(10, 5), (460, bottom)],
            ShapeStyle::from(&BLACK).stroke_width(1),
        ))
        .drawing("footer box")?;

        for (i, line) in self.footer.iter().enumerate() {
            area.draw(&Text::new(line.as_str(), (20, 12 + 20 * i as i32), font.clone()))
                .drawing("footer")?;
        }
        Ok(())
    }
}

impl Chart for OverviewChart<'_> {
    fn size(&self) -> (u32, u32) {
        let footer = if self.footer.is_empty() { 0 } else { FOOTER_HEIGHT };
        (WIDTH, 2 * PANEL_HEIGHT + footer)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), ChartError> {
        if self.traces.iter().all(|t| t.series.is_empty()) {
            return Err(ChartError::Empty("no samples"));
        }
        root.fill(&WHITE).drawing("background")?;

        let panels_area = if self.footer.is_empty() {
            root.clone()
        } else {
            let (_, height) = root.dim_in_pixel();
            let (upper, lower) = root.split_vertically(height.saturating_sub(FOOTER_HEIGHT));
            self.draw_footer(&lower)?;
            upper
        };

        let panels = panels_area.split_evenly((2, 1));
        if let [pressure, temperature] = panels.as_slice() {
            self.draw_panel(pressure, "Pressure over Time", "Pressure (mbar)", |s| {
                s.pressures.as_slice()
            })?;
            self.draw_panel(
                temperature,
                "Temperature over Time",
                "Temperature (°C)",
                |s| s.temperatures.as_slice(),
            )?;
        }
        Ok(())
    }
}
