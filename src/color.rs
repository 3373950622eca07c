use std::collections::BTreeMap;
use std::sync::Arc;

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
            let hsl = Hsl::new(hue, 0.65, 0.55);
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
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Stable colours for the labels of one dimension.
///
/// Built from the full option list, so a segment keeps its colour while the
/// selection changes.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<Arc<str>, Color32>,
}

impl ColorMap {
    pub fn new(labels: &[Arc<str>]) -> Self {
        let mapping = labels
            .iter()
            .cloned()
            .zip(generate_palette(labels.len()))
            .collect();
        Self { mapping }
    }

    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}
