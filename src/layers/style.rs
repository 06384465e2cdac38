//! Fixed per-category layer styling.

use eframe::egui::Color32;

/// Visual parameters of a layer.
///
/// Radii and widths are in meters and multiplied by their scale factor
/// before being converted to screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    /// Fill color for points and polygons
    pub fill_color: Color32,
    /// Stroke color for lines and polygon outlines
    pub line_color: Color32,
    /// Layer opacity (0.0 - 1.0), applied on top of color alpha
    pub opacity: f32,
    /// Draw outlines / line geometry
    pub stroked: bool,
    /// Fill points and polygons
    pub filled: bool,
    /// Point radius in meters
    pub point_radius: f32,
    pub point_radius_scale: f32,
    /// Line width in meters
    pub line_width: f32,
    pub line_width_scale: f32,
    /// Dash and gap lengths in pixels for outlines, if dashed
    pub dash_array: Option<[f32; 2]>,
    /// Highlight the hovered feature
    pub auto_highlight: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            fill_color: Color32::BLACK,
            line_color: Color32::BLACK,
            opacity: 1.0,
            stroked: true,
            filled: true,
            point_radius: 1.0,
            point_radius_scale: 1.0,
            line_width: 1.0,
            line_width_scale: 1.0,
            dash_array: None,
            auto_highlight: false,
        }
    }
}

impl StyleConfig {
    /// Small green filled circles.
    pub fn substations() -> Self {
        Self {
            fill_color: Color32::from_rgb(79, 167, 70),
            opacity: 0.8,
            stroked: false,
            point_radius: 400.0,
            point_radius_scale: 30.0,
            ..Default::default()
        }
    }

    /// Larger blue filled circles.
    pub fn buses() -> Self {
        Self {
            fill_color: Color32::from_rgb(72, 123, 182),
            opacity: 0.8,
            stroked: false,
            point_radius: 500.0,
            point_radius_scale: 100.0,
            ..Default::default()
        }
    }

    /// Red strokes with a fixed width scale.
    pub fn lines() -> Self {
        Self {
            fill_color: Color32::from_rgb(227, 26, 28),
            line_color: Color32::from_rgb(227, 26, 28),
            opacity: 0.8,
            line_width: 1000.0,
            line_width_scale: 20.0,
            auto_highlight: true,
            ..Default::default()
        }
    }

    /// Semi-transparent fills with a dashed outline.
    pub fn offshore_polygon() -> Self {
        Self {
            fill_color: Color32::from_rgb(225, 75, 75),
            line_color: Color32::from_rgba_unmultiplied(225, 75, 75, 51),
            opacity: 0.4,
            line_width: 2.0,
            dash_array: Some([10.0, 5.0]),
            ..Default::default()
        }
    }

    /// Effective point radius in meters.
    pub fn radius_meters(&self) -> f32 {
        self.point_radius * self.point_radius_scale
    }

    /// Effective line width in meters.
    pub fn width_meters(&self) -> f32 {
        self.line_width * self.line_width_scale
    }

    /// Fill color with layer opacity applied.
    pub fn effective_fill(&self) -> Color32 {
        self.fill_color.gamma_multiply(self.opacity)
    }

    /// Line color with layer opacity applied.
    pub fn effective_line(&self) -> Color32 {
        self.line_color.gamma_multiply(self.opacity)
    }
}
