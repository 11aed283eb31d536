use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::report::float_label;

/// Round to two decimals, halves to even.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

/// Default output path: `<stem>_real_time.csv` next to the input.
pub fn real_time_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("data");
    input.with_file_name(format!("{stem}_real_time.csv"))
}

/// Copy a CSV, replacing the delta column `column` with its running sum.
///
/// Other columns are copied unchanged. An all-integer column stays integer;
/// otherwise sums are rounded to two decimals. Returns the number of data
/// rows written.
pub fn cumulative_column<R: Read, W: Write>(
    reader: R,
    writer: W,
    column: &str,
) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut writer = csv::Writer::from_writer(writer);

    let headers = reader.headers().context("reading CSV headers")?.clone();
    let idx = headers
        .iter()
        .position(|h| h.trim() == column)
        .with_context(|| format!("CSV missing '{column}' column"))?;
    writer.write_record(&headers).context("writing CSV headers")?;

    let records = reader
        .records()
        .enumerate()
        .map(|(row_no, result)| result.with_context(|| format!("CSV row {row_no}")))
        .collect::<Result<Vec<_>>>()?;
    let fields: Vec<&str> = records
        .iter()
        .map(|r| r.get(idx).unwrap_or("").trim())
        .collect();

    let sums = match integer_sums(&fields) {
        Some(sums) => sums,
        None => float_sums(&fields, column)?,
    };

    for (row_no, (record, value)) in records.iter().zip(&sums).enumerate() {
        let out = record
            .iter()
            .enumerate()
            .map(|(i, f)| if i == idx { value.as_str() } else { f });
        writer
            .write_record(out)
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }

    writer.flush().context("flushing CSV output")?;
    Ok(records.len())
}

/// Running sums as integers, or `None` if any field is not an integer.
fn integer_sums(fields: &[&str]) -> Option<Vec<String>> {
    let mut cumulative: i64 = 0;
    fields
        .iter()
        .map(|field| {
            cumulative = cumulative.checked_add(field.parse::<i64>().ok()?)?;
            Some(cumulative.to_string())
        })
        .collect()
}

fn float_sums(fields: &[&str], column: &str) -> Result<Vec<String>> {
    let mut cumulative = 0.0;
    fields
        .iter()
        .enumerate()
        .map(|(row_no, field)| {
            let delta: f64 = field
                .parse()
                .with_context(|| format!("Row {row_no}, {column}: '{field}' is not a number"))?;
            cumulative += delta;
            Ok(float_label(round2(cumulative)))
        })
        .collect()
}
