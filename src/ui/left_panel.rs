//! Left panel UI: regions and their layers.

use super::colors;
use crate::config::DashboardConfig;
use crate::state::{AppState, LayerEntry, LayerStatus};
use eframe::egui::{self, RichText, ScrollArea, Sense, Vec2};
use egui_phosphor::regular as icons;

pub fn render_left_panel(ctx: &egui::Context, state: &mut AppState, config: &DashboardConfig) {
    egui::SidePanel::left("left_panel")
        .resizable(true)
        .default_width(260.0)
        .min_width(200.0)
        .max_width(400.0)
        .show(ctx, |ui| {
            ui.heading(format!("{} Layers", icons::STACK));
            ui.separator();

            render_summary(ui, state);
            ui.add_space(5.0);

            ScrollArea::vertical().show(ui, |ui| {
                let region_ids: Vec<String> = state
                    .layer_state
                    .region_ids()
                    .into_iter()
                    .map(str::to_string)
                    .collect();

                for region_id in &region_ids {
                    let name = config
                        .region(region_id)
                        .map(|r| r.display_name())
                        .unwrap_or(region_id.as_str());
                    render_region_section(ui, state, region_id, name);
                    ui.add_space(5.0);
                }
            });
        });
}

fn render_summary(ui: &mut egui::Ui, state: &AppState) {
    let (loaded, failed, total) = state.layer_state.progress();
    ui.horizontal(|ui| {
        ui.label(RichText::new("Loaded:").small().color(colors::ui::LABEL));
        ui.label(
            RichText::new(format!("{}/{}", loaded, total))
                .small()
                .color(colors::ui::VALUE),
        );
        if failed > 0 {
            ui.label(
                RichText::new(format!("{} failed", failed))
                    .small()
                    .color(colors::ui::ERROR),
            );
        }
    });
    ui.horizontal(|ui| {
        ui.label(RichText::new("Features:").small().color(colors::ui::LABEL));
        ui.label(
            RichText::new(state.layer_state.total_features().to_string())
                .small()
                .color(colors::ui::VALUE),
        );
    });
}

fn render_region_section(ui: &mut egui::Ui, state: &mut AppState, region_id: &str, name: &str) {
    egui::CollapsingHeader::new(RichText::new(format!("{} ({})", name, region_id)).strong())
        .id_salt(("region", region_id))
        .default_open(true)
        .show(ui, |ui| {
            let mut all_visible = state
                .layer_state
                .entries
                .iter()
                .filter(|e| e.descriptor.region_id == region_id)
                .all(|e| e.visible);

            let bounds = state.layer_state.region_bounds(region_id);

            ui.horizontal(|ui| {
                if ui.checkbox(&mut all_visible, "Show region").changed() {
                    state.layer_state.set_region_visible(region_id, all_visible);
                }
                let zoom = ui
                    .add_enabled(
                        bounds.is_some(),
                        egui::Button::new(format!("{} Zoom to", icons::MAGNIFYING_GLASS_PLUS))
                            .small(),
                    )
                    .on_hover_text("Fit the map to this region's loaded features");
                if zoom.clicked() {
                    state.pending_fit = bounds;
                }
            });

            let hovered_layer = state.hover.as_ref().map(|h| h.layer_id.clone());
            for entry in state.layer_state.region_entries_mut(region_id) {
                let hovered = hovered_layer.as_deref() == Some(entry.descriptor.layer_id.as_str());
                render_layer_row(ui, entry, hovered);
            }
        });
}

fn render_layer_row(ui: &mut egui::Ui, entry: &mut LayerEntry, hovered: bool) {
    ui.horizontal(|ui| {
        ui.checkbox(&mut entry.visible, "");

        // Color swatch
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(10.0), Sense::hover());
        ui.painter()
            .rect_filled(rect, 2.0, entry.descriptor.style.fill_color);

        // Layer under the map pointer is emphasized
        let label = RichText::new(entry.descriptor.category.label());
        let label = if hovered {
            label.strong().color(colors::ui::ACTIVE)
        } else {
            label
        };
        ui.label(label)
            .on_hover_text(&entry.descriptor.data_source);

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            render_status(ui, &entry.status);
        });
    });
}

fn render_status(ui: &mut egui::Ui, status: &LayerStatus) {
    match status {
        LayerStatus::Pending => {
            ui.label(RichText::new(status.label()).small().color(colors::ui::LABEL));
        }
        LayerStatus::Loading => {
            ui.spinner();
        }
        LayerStatus::Loaded { elapsed_ms, .. } => {
            ui.label(
                RichText::new(status.label())
                    .small()
                    .color(colors::ui::SUCCESS),
            )
            .on_hover_text(format!("Fetched in {:.0} ms", elapsed_ms));
        }
        LayerStatus::Failed(msg) => {
            ui.label(
                RichText::new(format!("{} {}", icons::WARNING, status.label()))
                    .small()
                    .color(colors::ui::ERROR),
            )
            .on_hover_text(msg);
        }
    }
}
