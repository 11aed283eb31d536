use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// Write a synthetic recording as `<BASE>_<seq>.csv` files.
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Recording prefix to write.
    base: String,

    /// Total number of rows.
    #[clap(long, default_value_t = 20_000)]
    samples: usize,

    /// Rows per file.
    #[clap(long, default_value_t = 5_000, value_parser = clap::value_parser!(u64).range(1..))]
    rows_per_file: u64,

    /// Seed for the noise generator.
    #[clap(long, default_value_t = 42)]
    seed: u64,
}

/// A spike: `(start index, peak mbar above baseline, decay constant in samples)`.
type Pulse = (usize, f64, f64);

const BASELINE_MBAR: f64 = 800.0;
const SAMPLE_MS: f64 = 1.0;

fn pulse_shape(i: usize, pulses: &[Pulse]) -> f64 {
    pulses
        .iter()
        .filter(|&&(start, _, _)| i >= start)
        .map(|&(start, height, tau)| height * (-((i - start) as f64) / tau).exp())
        .sum()
}

fn generate_recording(n: usize, pulses: &[Pulse], rng: &mut SimpleRng) -> Vec<[i64; 3]> {
    (0..n)
        .map(|i| {
            let jitter = rng.gauss(0.0, 0.02).clamp(-0.2, 0.2);
            let time = SAMPLE_MS + jitter;
            let pressure = BASELINE_MBAR + pulse_shape(i, pulses) + rng.gauss(0.0, 0.5);
            let temperature = 25.0 + 0.5 * (i as f64 / n.max(1) as f64) + rng.gauss(0.0, 0.02);
            [
                (time * 100.0).round() as i64,
                (pressure * 100.0).round() as i64,
                (temperature * 100.0).round() as i64,
            ]
        })
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// High and low spikes spread over the recording, well apart.
fn default_pulses(n: usize) -> Vec<Pulse> {
    let slot = n / 5;
    vec![
        (slot, 450.0, 40.0),
        (2 * slot, 80.0, 25.0),
        (3 * slot, 480.0, 60.0),
        (4 * slot, 70.0, 20.0),
    ]
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();
    let mut rng = SimpleRng::new(args.seed);

    let rows = generate_recording(args.samples, &default_pulses(args.samples), &mut rng);

    let mut written: Vec<PathBuf> = Vec::new();
    for (seq, chunk) in rows.chunks(args.rows_per_file as usize).enumerate() {
        let path = PathBuf::from(format!("{}_{:03}.csv", args.base, seq + 1));
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        writer.write_record(["Time", "Pressure", "Temperature"])?;
        for row in chunk {
            writer.serialize(row)?;
        }
        writer.flush()?;
        written.push(path);
    }

    println!(
        "Wrote {} rows across {} file(s) for '{}'",
        rows.len(),
        written.len(),
        args.base
    );
    Ok(())
}
