//! Basemap style reference.

use eframe::egui::Color32;
use serde::{Deserialize, Serialize};

/// Reference to the map style document drawn beneath the data layers.
///
/// Only the identity of the style is used: the canvas picks a matching
/// background and graticule color, tiles are not rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasemapStyle {
    pub url: String,
}

impl Default for BasemapStyle {
    fn default() -> Self {
        Self::dark_matter()
    }
}

impl BasemapStyle {
    pub fn dark_matter() -> Self {
        Self {
            url: "https://basemaps.cartocdn.com/gl/dark-matter-gl-style/style.json".to_string(),
        }
    }

    /// Whether this is a light style (positron and similar).
    pub fn is_light(&self) -> bool {
        let url = self.url.to_ascii_lowercase();
        url.contains("positron") || url.contains("light") || url.contains("voyager")
    }

    /// Short style name taken from the URL path.
    pub fn name(&self) -> &str {
        self.url
            .trim_end_matches('/')
            .trim_end_matches("style.json")
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.url)
    }

    pub fn background_color(&self) -> Color32 {
        if self.is_light() {
            Color32::from_rgb(250, 250, 248)
        } else {
            Color32::from_rgb(14, 14, 18)
        }
    }

    pub fn graticule_color(&self) -> Color32 {
        if self.is_light() {
            Color32::from_rgb(220, 220, 215)
        } else {
            Color32::from_rgb(38, 38, 46)
        }
    }
}
