use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;

use pressure_spikes::chart::{self, OverviewChart, Trace};
use pressure_spikes::color::SeriesColors;
use pressure_spikes::data::{loader, Series};
use pressure_spikes::report;

/// Plot pressure and temperature for several recordings, chained end to end.
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Recording prefixes, plotted in the order given.
    #[clap(required = true)]
    bases: Vec<String>,

    /// Chart path [default: combined_plot_<BASE>_<BASE>...svg]
    #[clap(long, short)]
    output: Option<PathBuf>,
}

/// Each recording starts where the previous one ended. Returns the shifted
/// series (time in hours) and the boundaries between them.
fn chain(recordings: Vec<Series>) -> (Vec<Series>, Vec<f64>) {
    let count = recordings.len();
    let mut offset = 0.0;
    let mut separators = Vec::new();
    let mut chained = Vec::with_capacity(count);

    for (i, series) in recordings.into_iter().enumerate() {
        let series = series.in_hours().shifted(offset);
        if let Some(end) = series.end_time() {
            if i + 1 < count {
                separators.push(end);
                offset = end;
            }
        }
        chained.push(series);
    }
    (chained, separators)
}

/// `combined_plot_<a>_<b>...svg` in the working directory, using each base's file name.
fn default_output(bases: &[String]) -> PathBuf {
    let names: Vec<&str> = bases
        .iter()
        .map(|b| {
            Path::new(b)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(b.as_str())
        })
        .collect();
    chart::file_name(&format!("combined_plot_{}", names.join("_")))
}

/// One coloured trace per recording that has samples.
fn plotted_traces<'a>(bases: &[String], chained: &'a [Series]) -> Vec<Trace<'a>> {
    let plotted: Vec<(&String, &Series)> = bases
        .iter()
        .zip(chained)
        .filter(|(_, series)| !series.is_empty())
        .collect();
    let names: Vec<&str> = plotted.iter().map(|(base, _)| base.as_str()).collect();
    let colors = SeriesColors::new(&names);

    colors
        .legend_entries()
        .iter()
        .zip(plotted)
        .map(|((label, color), (_, series))| Trace {
            label: label.clone(),
            color: *color,
            series,
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let mut recordings = Vec::with_capacity(args.bases.len());
    let mut total_kib = 0.0;
    for base in &args.bases {
        let loaded =
            loader::load_series(base).with_context(|| format!("loading recording '{base}'"))?;
        if loaded.series.is_empty() {
            warn!("'{base}' contains no samples");
        }
        total_kib += loaded.size_kib();
        recordings.push(loaded.series);
    }

    let (chained, separators) = chain(recordings);
    let traces = plotted_traces(&args.bases, &chained);

    let path = args.output.unwrap_or_else(|| default_output(&args.bases));
    let overview = OverviewChart::combined(traces, separators);
    chart::save(&overview, &path).with_context(|| format!("saving {}", path.display()))?;

    println!("Plot saved as '{}'", path.display());
    println!("{}", report::size_line(total_kib));
    Ok(())
}
