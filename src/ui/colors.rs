//! Centralized color constants for the UI.
//!
//! This module provides consistent colors across all UI panels.

use eframe::egui::Color32;

/// General UI colors for labels and values.
pub mod ui {
    use super::Color32;

    /// Muted gray for labels.
    pub const LABEL: Color32 = Color32::from_rgb(120, 120, 130);
    /// Slightly brighter for values.
    pub const VALUE: Color32 = Color32::from_rgb(170, 170, 180);
    /// Emphasized color for active states.
    pub const ACTIVE: Color32 = Color32::from_rgb(100, 180, 255);
    /// Success/positive indicator.
    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    /// Failure indicator.
    pub const ERROR: Color32 = Color32::from_rgb(255, 90, 90);
}

/// Colors for the map canvas.
pub mod canvas {
    use super::Color32;

    /// Overlay text (viewport info).
    pub const OVERLAY_TEXT: Color32 = Color32::from_rgb(200, 200, 220);
    /// Tooltip title (layer id).
    pub const TOOLTIP_TITLE: Color32 = Color32::from_rgb(255, 220, 120);
}
