use std::collections::HashMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Colour of an uncoloured scatter and of the histogram bars.
pub const BASE_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Hue of [`BASE_COLOR`]; the first category starts here.
const BASE_HUE: f32 = 236.0;

/// `n` distinct colours: evenly spaced hues starting at the base hue, with
/// neighbouring entries alternating lightness so adjacent hues stay apart
/// when there are many categories.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (BASE_HUE + (i as f32 / n as f32) * 360.0) % 360.0;
            let lightness = if i % 2 == 0 { 0.55 } else { 0.42 };
            let rgb: Srgb = Hsl::new(hue, 0.75, lightness).into_color();
            let (r, g, b) = rgb.into_format::<u8>().into_components();
            Color32::from_rgb(r, g, b)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the categories of the colour column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: HashMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Assign colours to `labels` in order.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let labels: Vec<&str> = labels.into_iter().collect();
        let mapping = labels
            .iter()
            .zip(generate_palette(labels.len()))
            .map(|(label, color)| (label.to_string(), color))
            .collect();

        ColorMap {
            mapping,
            default_color: BASE_COLOR,
        }
    }

    /// Look up the colour for a category label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_colors_are_distinct() {
        let palette = generate_palette(6);
        assert_eq!(palette.len(), 6);
        for (i, a) in palette.iter().enumerate() {
            assert!(palette[i + 1..].iter().all(|b| b != a));
        }
    }

    #[test]
    fn test_unknown_label_gets_default() {
        let map = ColorMap::new(["gas", "diesel"]);
        assert_ne!(map.color_for("gas"), map.color_for("diesel"));
        assert_eq!(map.color_for("hybrid"), BASE_COLOR);
    }
}
