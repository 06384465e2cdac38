#![warn(clippy::all)]

//! Grid Map Dashboard - power-grid infrastructure on an interactive map.
//!
//! Every configured region contributes substations, buses, transmission lines
//! and an offshore polygon, each fetched as GeoJSON from a GeoServer WFS
//! endpoint and drawn over a dark basemap.

mod config;
mod fetch;
mod geo;
mod layers;
mod state;
mod ui;

use config::DashboardConfig;
use eframe::egui;
use fetch::FeatureFetchChannel;
use state::{AppState, LayerStatus};

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "Grid Map Dashboard",
        native_options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document available");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("app_canvas")
            .and_then(|el| el.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        else {
            log::error!("Failed to find app_canvas");
            return;
        };

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(DashboardApp::new(cc)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    log::error!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Main application state and logic.
pub struct DashboardApp {
    /// Regions, GeoServer endpoint and initial view
    config: DashboardConfig,

    /// Application state containing all sub-states
    state: AppState,

    /// Channel for async GeoJSON fetches
    fetch_channel: FeatureFetchChannel,

    /// Monotonic instant of last URL push (for throttling to ~1/sec).
    last_url_push: web_time::Instant,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let config = DashboardConfig::load();
        if config.basemap.is_light() {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
        } else {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
        }

        let mut state = AppState::new(&config);

        // Apply URL parameters (lat/lon/zoom)
        let url_params = state::url_state::parse_from_url();
        state.apply_url_params(&url_params);

        log::info!(
            "Composed {} layer(s) for {} region(s)",
            state.layer_state.entries.len(),
            config.regions.len()
        );

        let fetch_channel = FeatureFetchChannel::new();
        let requests: Vec<(String, String)> = state
            .layer_state
            .entries
            .iter()
            .map(|e| {
                (
                    e.descriptor.layer_id.clone(),
                    e.descriptor.data_source.clone(),
                )
            })
            .collect();
        for (layer_id, source) in requests {
            state.layer_state.mark_loading(&layer_id);
            fetch_channel.fetch(cc.egui_ctx.clone(), layer_id, source);
        }
        state.status_message = "Loading layers...".to_string();

        Self {
            config,
            state,
            fetch_channel,
            last_url_push: web_time::Instant::now(),
        }
    }

    /// Drains completed fetches into layer state.
    fn poll_fetches(&mut self) {
        let mut changed = false;

        while let Some(result) = self.fetch_channel.try_recv() {
            match &result.outcome {
                Ok(features) => log::info!(
                    "Loaded {} feature(s) for {} in {:.0} ms",
                    features.len(),
                    result.layer_id,
                    result.elapsed_ms
                ),
                Err(e) => log::error!("Failed to load {}: {}", result.layer_id, e),
            }

            let layer_id = result.layer_id.clone();
            if !self.state.layer_state.apply_fetch_result(result) {
                log::warn!("Dropping result for unknown layer {}", layer_id);
            }
            changed = true;
        }

        if changed {
            self.state.status_message = self.status_summary();
        }
    }

    fn status_summary(&self) -> String {
        let layer_state = &self.state.layer_state;
        let (loaded, failed, total) = layer_state.progress();
        let pending = layer_state
            .entries
            .iter()
            .filter(|e| matches!(e.status, LayerStatus::Pending | LayerStatus::Loading))
            .count();

        if pending > 0 {
            format!("Loading layers ({}/{})", loaded + failed, total)
        } else if failed > 0 {
            format!("{} of {} layer(s) failed to load", failed, total)
        } else {
            format!("Loaded {} features", layer_state.total_features())
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_fetches();

        // Push current view to URL (throttled to once per second)
        {
            let now = web_time::Instant::now();
            if now.duration_since(self.last_url_push).as_secs_f64() >= 1.0 {
                self.last_url_push = now;
                let view = &self.state.view_state;
                state::url_state::push_to_url(view.latitude, view.longitude, view.zoom);
            }
        }

        // Side and top panels must be rendered before CentralPanel
        ui::render_top_bar(ctx, &self.state, &self.config.basemap);
        ui::render_left_panel(ctx, &mut self.state, &self.config);
        ui::render_canvas(ctx, &mut self.state, &self.config.basemap);
    }
}
