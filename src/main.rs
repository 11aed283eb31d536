use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;

use pressure_spikes::analysis::SpikeAnalysis;
use pressure_spikes::chart::{self, SpikeGrid};
use pressure_spikes::cli::DetectorArgs;
use pressure_spikes::report;
use pressure_spikes::spikes::DetectorConfig;

/// Measure how long pressure spikes take to return to ambient.
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Recording prefix; every `<BASE>_*.csv` is read in filename order.
    base: String,

    #[clap(flatten)]
    detector: DetectorArgs,

    /// Chart path [default: <BASE>_spike_analysis.svg]
    #[clap(long, short)]
    output: Option<PathBuf>,

    /// Also write the detected spikes as JSON to this path.
    #[clap(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();
    let config = DetectorConfig::from(&args.detector);

    let analysis = SpikeAnalysis::run(&args.base, &config)
        .with_context(|| format!("loading recording '{}'", args.base))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if analysis.is_empty() {
        warn!("no spikes in '{}', chart not written", args.base);
    } else {
        let path = args
            .output
            .unwrap_or_else(|| chart::file_name(&analysis.chart_stem()));
        let order = analysis.display_order();
        let grid = SpikeGrid::new(&analysis.base, &analysis.loaded.series, &order);
        chart::save(&grid, &path).with_context(|| format!("saving {}", path.display()))?;
        writeln!(out, "Plot saved as '{}'", path.display())?;
    }

    report::write_summary(&mut out, &analysis.spikes)?;

    if let Some(path) = &args.json {
        report::write_json(path, &analysis.spikes)?;
    }
    Ok(())
}
