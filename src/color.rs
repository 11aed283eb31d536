use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Series colours: one per recording
// ---------------------------------------------------------------------------

/// Assigns a distinct colour to each named recording, in order.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    entries: Vec<(String, RGBColor)>,
}

impl SeriesColors {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        let entries = names
            .iter()
            .map(|n| n.as_ref().to_string())
            .zip(generate_palette(names.len()))
            .collect();
        SeriesColors { entries }
    }

    /// Colour of the `i`th recording (falls back to black past the end).
    pub fn color_at(&self, i: usize) -> RGBColor {
        self.entries
            .get(i)
            .map(|(_, c)| *c)
            .unwrap_or(RGBColor(0, 0, 0))
    }

    /// Legend entries (name → colour).
    pub fn legend_entries(&self) -> &[(String, RGBColor)] {
        &self.entries
    }
}
