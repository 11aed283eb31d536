use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use pressure_spikes::data::convert::{cumulative_column, real_time_path};

/// Replace a CSV's per-row time deltas with cumulative real time.
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// CSV file with a header row.
    input: PathBuf,

    /// Output path [default: <INPUT stem>_real_time.csv]
    #[clap(long, short)]
    output: Option<PathBuf>,

    /// Name of the delta column.
    #[clap(long, default_value = "Time")]
    column: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();
    let output = args.output.unwrap_or_else(|| real_time_path(&args.input));

    let reader = File::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?;
    let writer =
        File::create(&output).with_context(|| format!("creating {}", output.display()))?;

    let rows = cumulative_column(BufReader::new(reader), BufWriter::new(writer), &args.column)
        .with_context(|| format!("converting {}", args.input.display()))?;
    info!("{rows} row(s) converted");

    println!(
        "{} column converted to cumulative real time and saved to {}.",
        args.column,
        output.display()
    );
    Ok(())
}
