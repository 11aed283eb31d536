use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::spikes::Spike;

/// Write the per-spike summary, numbered in detection order.
pub fn write_summary<W: Write>(out: &mut W, spikes: &[Spike]) -> std::io::Result<()> {
    if spikes.is_empty() {
        return writeln!(out, "No spikes found.");
    }

    writeln!(out, "\nSpike Durations:")?;
    for (i, spike) in spikes.iter().enumerate() {
        writeln!(out, "{} Spike {}:", spike.kind, i + 1)?;
        writeln!(out, "  Duration: {:.1} ms", spike.duration)?;
        writeln!(out, "  Peak Pressure: {:.1} mbar", spike.peak_pressure)?;
        writeln!(out, "  Ambient Pressure: {:.1} mbar", spike.ambient_pressure)?;
        writeln!(out, "  Peak Time: {:.1} ms", spike.peak_time)?;
    }
    Ok(())
}

/// Dump `spikes` as pretty JSON.
pub fn write_json(path: &Path, spikes: &[Spike]) -> Result<()> {
    let text = serde_json::to_string_pretty(spikes).context("serialising spikes")?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

/// Format `v` the way a float literal is usually written: `5` → `5.0`, `2.5` → `2.5`.
pub fn float_label(v: f64) -> String {
    if v.fract() == 0.0 && v.is_finite() {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// `Total file size processed: X.XX KB`
pub fn size_line(size_kib: f64) -> String {
    format!("Total file size processed: {size_kib:.2} KB")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spikes::SpikeKind;

    fn spike(kind: SpikeKind) -> Spike {
        Spike {
            peak_idx: 2,
            peak_time: 3.0,
            peak_pressure: 1250.0,
            ambient_pressure: 800.0,
            crossing_time: 4.0,
            duration: 1.0,
            kind,
        }
    }

    fn summary(spikes: &[Spike]) -> String {
        let mut buf = Vec::new();
        write_summary(&mut buf, spikes).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_summary() {
        assert_eq!(summary(&[]), "No spikes found.\n");
    }

    #[test]
    fn summary_lists_each_spike() {
        let text = summary(&[spike(SpikeKind::High), spike(SpikeKind::Low)]);
        assert!(text.starts_with("\nSpike Durations:\nHigh Spike 1:\n"));
        assert!(text.contains("  Duration: 1.0 ms\n"));
        assert!(text.contains("  Peak Pressure: 1250.0 mbar\n"));
        assert!(text.contains("  Ambient Pressure: 800.0 mbar\n"));
        assert!(text.contains("  Peak Time: 3.0 ms\n"));
        assert!(text.contains("Low Spike 2:\n"));
    }

    #[test]
    fn json_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spikes.json");
        write_json(&path, &[spike(SpikeKind::Low)]).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["type"], "low");
        assert_eq!(value[0]["duration"], 1.0);
    }

    #[test]
    fn float_labels_keep_one_decimal() {
        assert_eq!(float_label(0.0), "0.0");
        assert_eq!(float_label(5.0), "5.0");
        assert_eq!(float_label(2.5), "2.5");
        assert_eq!(float_label(-1.25), "-1.25");
    }

    #[test]
    fn size_is_two_decimals() {
        assert_eq!(size_line(1.0 / 3.0), "Total file size processed: 0.33 KB");
    }
}
