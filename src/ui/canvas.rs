//! Central canvas UI: basemap, grid layers and viewport interaction.

use super::colors;
use crate::config::BasemapStyle;
use crate::geo::{pick_feature, render_grid_layers, Highlight, MapFeature, MapProjection};
use crate::layers::LayerDescriptor;
use crate::state::{AppState, HoverState};
use eframe::egui::{self, Painter, Pos2, Rect, RichText, Sense, Stroke, Vec2};
use geo_types::coord;

/// Zoom levels per scroll pixel.
const SCROLL_ZOOM_RATE: f32 = 0.002;
/// Properties shown in the hover tooltip.
const MAX_TOOLTIP_PROPERTIES: usize = 12;

/// Renders the map canvas with all visible grid layers.
pub fn render_canvas(ctx: &egui::Context, state: &mut AppState, basemap: &BasemapStyle) {
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            let available_size = ui.available_size();

            // Allocate the full available space for the canvas
            let (response, painter) =
                ui.allocate_painter(available_size, Sense::click_and_drag());

            let rect = response.rect;

            // Basemap
            painter.rect_filled(rect, 0.0, basemap.background_color());

            if let Some(bounds) = state.pending_fit.take() {
                state.view_state.fit_bounds(bounds, rect);
            }

            let projection = state.view_state.projection(rect);
            render_graticule(&painter, &projection, basemap);

            let pointer = response.hover_pos().filter(|_| !response.dragged());

            let hover = {
                let layers = state.layer_state.renderable();

                let hover = pointer
                    .and_then(|pos| pick_feature(&layers, &projection, pos))
                    .map(|pick| HoverState {
                        layer_id: layers[pick.layer_index].0.layer_id.clone(),
                        feature_index: pick.feature_index,
                    });

                let highlight = hover.as_ref().map(|h| Highlight {
                    layer_id: &h.layer_id,
                    feature_index: h.feature_index,
                });
                render_grid_layers(&painter, &layers, &projection, highlight);

                if let Some(h) = &hover {
                    let hovered = state.layer_state.get(&h.layer_id).and_then(|entry| {
                        let feature = entry.features.as_ref()?.features.get(h.feature_index)?;
                        Some((&entry.descriptor, feature))
                    });
                    if let Some((descriptor, feature)) = hovered {
                        show_feature_tooltip(&response, descriptor, feature);
                    }
                }

                hover
            };
            state.hover = hover;

            draw_overlay_info(ui, &rect, state, &projection, response.hover_pos());

            handle_canvas_interaction(&response, &rect, &projection, state);
        });
}

/// Draws meridians and parallels at a spacing suited to the zoom level.
fn render_graticule(painter: &Painter, projection: &MapProjection, basemap: &BasemapStyle) {
    let step = match projection.zoom {
        z if z < 3.0 => 30.0,
        z if z < 5.0 => 10.0,
        z if z < 7.0 => 5.0,
        _ => 1.0,
    };
    let stroke = Stroke::new(1.0, basemap.graticule_color());
    let (min_lon, min_lat, max_lon, max_lat) = projection.visible_bounds();

    let min_lat = min_lat.max(-80.0);
    let max_lat = max_lat.min(80.0);
    let min_lon = min_lon.max(-180.0);
    let max_lon = max_lon.min(180.0);

    let mut lon = (min_lon / step).floor() * step;
    while lon <= max_lon {
        let a = projection.geo_to_screen(coord! { x: lon, y: min_lat });
        let b = projection.geo_to_screen(coord! { x: lon, y: max_lat });
        painter.line_segment([a, b], stroke);
        lon += step;
    }

    let mut lat = (min_lat / step).floor() * step;
    while lat <= max_lat {
        let a = projection.geo_to_screen(coord! { x: min_lon, y: lat });
        let b = projection.geo_to_screen(coord! { x: max_lon, y: lat });
        painter.line_segment([a, b], stroke);
        lat += step;
    }
}

fn show_feature_tooltip(
    response: &egui::Response,
    descriptor: &LayerDescriptor,
    feature: &MapFeature,
) {
    response.clone().on_hover_ui_at_pointer(|ui| {
        ui.label(
            RichText::new(&descriptor.layer_id)
                .strong()
                .color(colors::canvas::TOOLTIP_TITLE),
        );
        if let Some(label) = feature.label() {
            ui.label(RichText::new(label).strong());
        }
        ui.separator();

        egui::Grid::new("feature_properties")
            .num_columns(2)
            .spacing([8.0, 2.0])
            .show(ui, |ui| {
                for (key, value) in feature.properties.iter().take(MAX_TOOLTIP_PROPERTIES) {
                    ui.label(RichText::new(key).small().color(colors::ui::LABEL));
                    ui.label(RichText::new(value).small().monospace());
                    ui.end_row();
                }
            });

        let hidden = feature
            .properties
            .len()
            .saturating_sub(MAX_TOOLTIP_PROPERTIES);
        if hidden > 0 {
            ui.label(
                RichText::new(format!("+{} more", hidden))
                    .small()
                    .color(colors::ui::LABEL),
            );
        }
    });
}

fn draw_overlay_info(
    ui: &mut egui::Ui,
    rect: &Rect,
    state: &AppState,
    projection: &MapProjection,
    pointer: Option<Pos2>,
) {
    let overlay_pos = rect.left_top() + Vec2::new(10.0, 10.0);
    let overlay_rect = Rect::from_min_size(overlay_pos, Vec2::new(220.0, 90.0));
    let view = &state.view_state;

    let line = |ui: &mut egui::Ui, text: String| {
        ui.label(
            RichText::new(text)
                .monospace()
                .size(12.0)
                .color(colors::canvas::OVERLAY_TEXT),
        );
    };

    ui.scope_builder(egui::UiBuilder::new().max_rect(overlay_rect), |ui| {
        ui.vertical(|ui| {
            line(
                ui,
                format!("Center: {:.3}, {:.3}", view.latitude, view.longitude),
            );
            line(
                ui,
                format!(
                    "Zoom: {:.2}  Pitch: {:.0}  Bearing: {:.0}",
                    view.zoom, view.pitch, view.bearing
                ),
            );
            if let Some(pos) = pointer.filter(|p| rect.contains(*p)) {
                let geo = projection.screen_to_geo(pos);
                line(ui, format!("Cursor: {:.3}, {:.3}", geo.y, geo.x));
            }
        });
    });
}

fn handle_canvas_interaction(
    response: &egui::Response,
    rect: &Rect,
    projection: &MapProjection,
    state: &mut AppState,
) {
    // Handle dragging for panning
    if response.dragged() {
        let delta = response.drag_delta();
        if delta != Vec2::ZERO {
            let to = response.interact_pointer_pos().unwrap_or(rect.center());
            state.view_state.pan(projection, to - delta, to);
        }
    }

    // Handle scroll and pinch for zooming relative to cursor position
    if response.hovered() {
        let (scroll_delta, pinch) = response
            .ctx
            .input(|i| (i.raw_scroll_delta, i.zoom_delta()));

        let mut zoom_delta = scroll_delta.y * SCROLL_ZOOM_RATE;
        if pinch != 1.0 {
            zoom_delta += pinch.log2();
        }

        if zoom_delta != 0.0 {
            let anchor = response.hover_pos().unwrap_or(rect.center());
            state.view_state.zoom_around(*rect, anchor, zoom_delta);
        }
    }

    // Reset view on double-click
    if response.double_clicked() {
        state.view_state.reset();
    }
}
