use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.5);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: answer label → Color32
// ---------------------------------------------------------------------------

/// Assigns each answer of the current chart its own bar colour.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Colours follow the given order, so the top-ranked bar always gets the
    /// first hue.
    pub fn new<'a>(answers: impl IntoIterator<Item = &'a str>) -> Self {
        let answers: Vec<&str> = answers.into_iter().collect();
        let mapping = answers
            .iter()
            .zip(generate_palette(answers.len()))
            .map(|(a, c)| (a.to_string(), c))
            .collect();
        ColorMap { mapping }
    }

    pub fn color_for(&self, answer: &str) -> Color32 {
        self.mapping.get(answer).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_distinct_colours() {
        let palette = generate_palette(6);
        assert_eq!(palette.len(), 6);
        for (i, a) in palette.iter().enumerate() {
            assert!(palette[i + 1..].iter().all(|b| a != b));
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_answers_fall_back_to_gray() {
        let map = ColorMap::new(["Machine learning", "Robotics"]);
        assert_ne!(map.color_for("Machine learning"), map.color_for("Robotics"));
        assert_eq!(map.color_for("Voice recognition"), Color32::GRAY);
    }
}
