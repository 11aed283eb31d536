use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use super::model::{RawRow, Sample, Series};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid file pattern '{pattern}'")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("no files match '{pattern}'")]
    NoFiles { pattern: String },

    #[error("cannot access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// A series together with where it came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedSeries {
    pub series: Series,
    /// Files read, in the order they were concatenated.
    pub files: Vec<PathBuf>,
    /// Total size of `files` in bytes.
    pub bytes: u64,
}

impl LoadedSeries {
    /// Total input size in KiB, as reported to the user.
    pub fn size_kib(&self) -> f64 {
        self.bytes as f64 / 1024.0
    }
}

/// Glob pattern matching every file of the recording `base`.
pub fn file_pattern(base: &str) -> String {
    format!("{base}_*.csv")
}

/// Find every `<base>_*.csv`, sorted by filename.
pub fn discover_files(base: &str) -> Result<Vec<PathBuf>, LoadError> {
    let pattern = file_pattern(base);
    let paths = glob::glob(&pattern).map_err(|source| LoadError::Pattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => files.push(path),
            Err(err) => {
                let path = err.path().to_path_buf();
                return Err(LoadError::Io {
                    path,
                    source: err.into(),
                });
            }
        }
    }

    if files.is_empty() {
        return Err(LoadError::NoFiles { pattern });
    }
    files.sort();
    info!("{} file(s) match '{pattern}'", files.len());
    Ok(files)
}

/// Load and concatenate the recording `base`.
pub fn load_series(base: &str) -> Result<LoadedSeries, LoadError> {
    let files = discover_files(base)?;
    load_files(&files)
}

/// Concatenate `files` in the given order.
///
/// The running time offset carries across file boundaries, so the result
/// is one continuous series.
pub fn load_files(files: &[PathBuf]) -> Result<LoadedSeries, LoadError> {
    let mut loaded = LoadedSeries::default();
    let mut cumulative_ms = 0.0;

    for path in files {
        loaded.bytes += std::fs::metadata(path)
            .map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?
            .len();

        let rows = read_rows(path)?;
        debug!("{}: {} row(s)", path.display(), rows.len());

        cumulative_ms = append_rows(&mut loaded.series, &rows, cumulative_ms);
        loaded.files.push(path.clone());
    }

    info!(
        "loaded {} sample(s) from {} file(s), {:.2} KB",
        loaded.series.len(),
        loaded.files.len(),
        loaded.size_kib()
    );
    Ok(loaded)
}

/// Decode `rows` onto the end of `series`, starting from `start_ms`.
/// Returns the cumulative time after the last row.
pub fn append_rows(series: &mut Series, rows: &[RawRow], start_ms: f64) -> f64 {
    rows.iter().fold(start_ms, |cumulative, row| {
        let time = cumulative + row.delta_ms();
        series.push(Sample::from_raw(*row, time));
        time
    })
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// CSV layout: one header row, then `time_raw,pressure_raw,temperature_raw`.
/// Any row that is not exactly three numbers is an error.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>, LoadError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    parse_rows(reader).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_rows<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<RawRow>, csv::Error> {
    reader.deserialize::<RawRow>().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    fn base_in(dir: &Path, name: &str) -> String {
        dir.join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn rows_are_scaled_and_accumulated() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "run_001.csv",
            "Time,Pressure,Temperature\n100,80000,2500\n150,80100,2510\n",
        );

        let loaded = load_series(&base_in(dir.path(), "run")).unwrap();
        assert_eq!(loaded.series.times, vec![1.0, 2.5]);
        assert_eq!(loaded.series.pressures, vec![800.0, 801.0]);
        assert_eq!(loaded.series.temperatures, vec![25.0, 25.1]);
        assert_eq!(loaded.files.len(), 1);
        assert!(loaded.bytes > 0);
    }

    #[test]
    fn time_offset_carries_across_files() {
        let dir = tempfile::tempdir().unwrap();
        // Written out of order; lexicographic order decides.
        write(dir.path(), "run_002.csv", "t,p,c\n100,90000,0\n100,90000,0\n");
        write(dir.path(), "run_001.csv", "t,p,c\n200,80000,0\n200,80000,0\n");

        let loaded = load_series(&base_in(dir.path(), "run")).unwrap();
        assert_eq!(loaded.series.times, vec![2.0, 4.0, 5.0, 6.0]);
        assert_eq!(loaded.series.pressures, vec![800.0, 800.0, 900.0, 900.0]);
        assert!(loaded.series.times.windows(2).all(|w| w[0] <= w[1]));
        assert!(loaded.files[0].ends_with("run_001.csv"));
    }

    #[test]
    fn other_recordings_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "run_001.csv", "t,p,c\n100,80000,0\n");
        write(dir.path(), "other_001.csv", "t,p,c\n100,99999,0\n");
        write(dir.path(), "run_001.txt", "t,p,c\n100,99999,0\n");

        let loaded = load_series(&base_in(dir.path(), "run")).unwrap();
        assert_eq!(loaded.series.len(), 1);
    }

    #[test]
    fn missing_files_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_series(&base_in(dir.path(), "absent")).unwrap_err();
        assert!(matches!(err, LoadError::NoFiles { .. }));
    }

    #[test]
    fn non_numeric_field_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bad_1.csv", "t,p,c\n100,80000,0\n100,oops,0\n");

        let err = load_series(&base_in(dir.path(), "bad")).unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
        assert!(err.to_string().contains("bad_1.csv"));
    }

    #[test]
    fn short_row_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "short_1.csv", "t,p,c\n100,80000\n");

        let err = load_series(&base_in(dir.path(), "short")).unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
    }

    #[test]
    fn header_only_file_is_empty_series() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "empty_1.csv", "t,p,c\n");

        let loaded = load_series(&base_in(dir.path(), "empty")).unwrap();
        assert!(loaded.series.is_empty());
    }
}
