use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use plotters::style::BLUE;

use pressure_spikes::chart::{self, OverviewChart, Trace};
use pressure_spikes::data::filter::{restrict, TimeWindow};
use pressure_spikes::data::loader;
use pressure_spikes::data::model::seconds_to_ms;
use pressure_spikes::report::{self, float_label};

/// Plot pressure and temperature for part of one recording.
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Recording prefix; every `<BASE>_*.csv` is read in filename order.
    base: String,

    /// Window start, in seconds from the beginning of the recording.
    #[clap(allow_negative_numbers = true)]
    start: f64,

    /// Window end, in seconds (inclusive).
    #[clap(allow_negative_numbers = true)]
    end: f64,

    /// Chart path [default: <BASE>_<START>to<END>seconds.svg]
    #[clap(long, short)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let loaded = loader::load_series(&args.base)
        .with_context(|| format!("loading recording '{}'", args.base))?;
    let window = TimeWindow::new(seconds_to_ms(args.start), seconds_to_ms(args.end));
    let series = restrict(&loaded.series, &window);

    if series.is_empty() {
        println!(
            "No data points found in the specified time range for {}.",
            args.base
        );
        return Ok(());
    }

    let path = args.output.unwrap_or_else(|| {
        chart::file_name(&format!(
            "{}_{}to{}seconds",
            args.base,
            float_label(args.start),
            float_label(args.end)
        ))
    });
    let trace = Trace {
        label: args.base.clone(),
        color: BLUE,
        series: &series,
    };
    let overview = OverviewChart::window(trace, args.start, args.end);
    chart::save(&overview, &path).with_context(|| format!("saving {}", path.display()))?;

    println!("Plot saved as '{}'", path.display());
    println!("{}", report::size_line(loaded.size_kib()));
    Ok(())
}
