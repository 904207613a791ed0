use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::{Category, CategoryColumn, category_label};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// `n` distinct colours: evenly spaced hues, with every other slot a little
/// darker so neighbouring groups stay apart when `n` is large.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = 360.0 * i as f32 / n as f32;
            let lightness = if i % 2 == 0 { 0.58 } else { 0.46 };
            let rgb: Srgb = Hsl::new(hue, 0.7, lightness).into_color();
            let [r, g, b]: [u8; 3] = rgb.into_format::<u8>().into();
            Color32::from_rgb(r, g, b)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the values of the colour-by column to distinct colours. Slots follow
/// the clean table's first-appearance order, so filtering never recolours a
/// group and the legend lists groups in the order the data does.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: CategoryColumn,
    order: Vec<Category>,
    mapping: BTreeMap<Category, Color32>,
}

impl ColorMap {
    pub fn new(column: CategoryColumn, values: &[Category]) -> Self {
        let mapping = values.iter().cloned().zip(generate_palette(values.len())).collect();
        ColorMap {
            column,
            order: values.to_vec(),
            mapping,
        }
    }

    /// Gray for values the map has never seen.
    pub fn color_for(&self, value: &Category) -> Color32 {
        self.mapping.get(value).copied().unwrap_or(Color32::GRAY)
    }

    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.order
            .iter()
            .map(|v| (category_label(v).to_string(), self.color_for(v)))
            .collect()
    }
}
