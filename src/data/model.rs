use serde::Deserialize;

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// Every numeric field in the logger's CSV output is stored ×100.
pub const RAW_SCALE: f64 = 100.0;

/// Convert a cumulative time in milliseconds to hours.
pub fn ms_to_hours(ms: f64) -> f64 {
    ms / (1000.0 * 60.0 * 60.0)
}

/// Convert seconds (as typed on the command line) to milliseconds.
pub fn seconds_to_ms(seconds: f64) -> f64 {
    seconds * 1000.0
}

// ---------------------------------------------------------------------------
// RawRow – one undecoded CSV row
// ---------------------------------------------------------------------------

/// One data row as written by the logger: `time_raw,pressure_raw,temperature_raw`.
///
/// `time_raw` is the delta since the previous row, not an absolute timestamp.
/// Deserialised positionally, so the header names don't matter.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RawRow(pub f64, pub f64, pub f64);

impl RawRow {
    /// Time delta in milliseconds.
    pub fn delta_ms(&self) -> f64 {
        self.0 / RAW_SCALE
    }

    /// Pressure in mbar.
    pub fn pressure(&self) -> f64 {
        self.1 / RAW_SCALE
    }

    /// Temperature in °C.
    pub fn temperature(&self) -> f64 {
        self.2 / RAW_SCALE
    }
}

// ---------------------------------------------------------------------------
// Sample – one decoded point in time
// ---------------------------------------------------------------------------

/// A decoded reading at a cumulative time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Cumulative time since the first row of the series, in ms.
    pub time: f64,
    /// Pressure in mbar.
    pub pressure: f64,
    /// Temperature in °C.
    pub temperature: f64,
}

impl Sample {
    /// Decode `row` at cumulative time `time_ms` (the delta already added).
    pub fn from_raw(row: RawRow, time_ms: f64) -> Self {
        Sample {
            time: time_ms,
            pressure: row.pressure(),
            temperature: row.temperature(),
        }
    }
}

// ---------------------------------------------------------------------------
// Series – the concatenated recording
// ---------------------------------------------------------------------------

/// An ordered recording stored column-wise.
///
/// All three vectors have the same length and `times` is non-decreasing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    /// Cumulative time (ms).
    pub times: Vec<f64>,
    /// Pressure (mbar).
    pub pressures: Vec<f64>,
    /// Temperature (°C).
    pub temperatures: Vec<f64>,
}

impl Series {
    pub fn with_capacity(n: usize) -> Self {
        Series {
            times: Vec::with_capacity(n),
            pressures: Vec::with_capacity(n),
            temperatures: Vec::with_capacity(n),
        }
    }

    /// Build a series from parallel time/pressure columns.
    /// Temperatures are left at zero; handy for synthetic data.
    pub fn from_pressures(times: Vec<f64>, pressures: Vec<f64>) -> Self {
        let temperatures = vec![0.0; times.len()];
        Series {
            times,
            pressures,
            temperatures,
        }
    }

    pub fn push(&mut self, sample: Sample) {
        self.times.push(sample.time);
        self.pressures.push(sample.pressure);
        self.temperatures.push(sample.temperature);
    }

    pub fn get(&self, idx: usize) -> Option<Sample> {
        Some(Sample {
            time: *self.times.get(idx)?,
            pressure: *self.pressures.get(idx)?,
            temperature: *self.temperatures.get(idx)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        self.times
            .iter()
            .zip(&self.pressures)
            .zip(&self.temperatures)
            .map(|((&time, &pressure), &temperature)| Sample {
                time,
                pressure,
                temperature,
            })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the series is empty.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the last sample, if any.
    pub fn end_time(&self) -> Option<f64> {
        self.times.last().copied()
    }

    /// Largest time in the series (equal to `end_time` for a well-formed series).
    pub fn max_time(&self) -> Option<f64> {
        self.times.iter().copied().reduce(f64::max)
    }

    /// Shift every time by `offset` (ms or hours, whatever unit `times` is in).
    pub fn shifted(mut self, offset: f64) -> Self {
        for t in &mut self.times {
            *t += offset;
        }
        self
    }

    /// Same series with times re-expressed in hours.
    pub fn in_hours(mut self) -> Self {
        for t in &mut self.times {
            *t = ms_to_hours(*t);
        }
        self
    }
}

impl FromIterator<Sample> for Series {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut series = Series::with_capacity(iter.size_hint().0);
        for s in iter {
            series.push(s);
        }
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_row_is_scaled_by_hundred() {
        let row = RawRow(100.0, 125000.0, 2500.0);
        assert_eq!(row.delta_ms(), 1.0);
        assert_eq!(row.pressure(), 1250.0);
        assert_eq!(row.temperature(), 25.0);
    }

    #[test]
    fn series_collects_and_iterates_samples() {
        let series: Series = (0..3)
            .map(|i| Sample {
                time: i as f64,
                pressure: 800.0 + i as f64,
                temperature: 20.0,
            })
            .collect();
        assert_eq!(series.len(), 3);
        assert_eq!(series.get(2).map(|s| s.pressure), Some(802.0));
        assert_eq!(series.get(3), None);
        assert_eq!(series.iter().map(|s| s.time).sum::<f64>(), 3.0);
    }

    #[test]
    fn shift_and_hours() {
        let series = Series::from_pressures(vec![0.0, 3_600_000.0], vec![1.0, 1.0]).in_hours();
        assert_eq!(series.times, vec![0.0, 1.0]);
        let series = series.shifted(2.0);
        assert_eq!(series.end_time(), Some(3.0));
        assert_eq!(series.max_time(), Some(3.0));
    }
}
