//! Top bar UI: app title, status and basemap.

use super::colors;
use crate::config::BasemapStyle;
use crate::state::AppState;
use eframe::egui::{self, Color32, RichText, Visuals};
use egui_phosphor::regular as icons;

pub fn render_top_bar(ctx: &egui::Context, state: &AppState, basemap: &BasemapStyle) {
    egui::TopBottomPanel::top("top_bar")
        .exact_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                // App title
                ui.label(
                    RichText::new(format!("{} Grid Map Dashboard", icons::LIGHTNING))
                        .strong()
                        .size(16.0)
                        .color(title_color(ui.visuals())),
                );

                ui.separator();

                // Status text
                ui.label(
                    RichText::new(&state.status_message)
                        .size(13.0)
                        .color(ui.visuals().weak_text_color()),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new(basemap.name())
                            .monospace()
                            .size(12.0)
                            .color(colors::ui::VALUE),
                    )
                    .on_hover_text(&basemap.url);
                    ui.label(
                        RichText::new(format!("{} Basemap:", icons::MAP_TRIFOLD))
                            .size(12.0)
                            .color(colors::ui::LABEL),
                    );
                });
            });
        });
}

/// Title color readable on the active light or dark theme.
fn title_color(visuals: &Visuals) -> Color32 {
    visuals.strong_text_color()
}
