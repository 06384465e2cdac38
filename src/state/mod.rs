//! Application state management.
//!
//! State is organized into the viewport, the per-layer runtime state and the
//! transient hover selection.

mod layer;
pub mod url_state;
mod view;

pub use layer::{LayerEntry, LayerState, LayerStatus};
pub use view::ViewState;

use crate::config::DashboardConfig;
use crate::layers::compose_layers;

/// Feature currently under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverState {
    pub layer_id: String,
    pub feature_index: usize,
}

/// Root application state containing all sub-states.
#[derive(Default)]
pub struct AppState {
    /// Map camera
    pub view_state: ViewState,

    /// Composed layers with load status and visibility
    pub layer_state: LayerState,

    /// Hovered feature, if any
    pub hover: Option<HoverState>,

    /// Bounds to fit on the next canvas frame
    pub pending_fit: Option<geo_types::Rect<f64>>,

    /// Application status message displayed in top bar
    pub status_message: String,
}

impl AppState {
    /// Builds the initial state from configuration.
    pub fn new(config: &DashboardConfig) -> Self {
        let descriptors = compose_layers(&config.region_sources());

        Self {
            view_state: ViewState::from_initial(&config.initial_view),
            layer_state: LayerState::from_descriptors(descriptors),
            hover: None,
            pending_fit: None,
            status_message: "Ready".to_string(),
        }
    }

    /// Applies view parameters restored from the URL.
    pub fn apply_url_params(&mut self, params: &url_state::UrlParams) {
        if let (Some(lat), Some(lon)) = (params.lat, params.lon) {
            self.view_state.set_center(lat, lon);
        }
        if let Some(zoom) = params.zoom {
            self.view_state.set_zoom(zoom);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_composes_all_regions() {
        let config = DashboardConfig::default();
        let state = AppState::new(&config);

        assert_eq!(state.layer_state.entries.len(), config.regions.len() * 4);
        let ids: HashSet<&str> = state
            .layer_state
            .entries
            .iter()
            .map(|e| e.descriptor.layer_id.as_str())
            .collect();
        assert_eq!(ids.len(), state.layer_state.entries.len());
        assert!(state
            .layer_state
            .entries
            .iter()
            .all(|e| e.status == LayerStatus::Pending));
    }

    #[test]
    fn test_apply_url_params() {
        let mut state = AppState::new(&DashboardConfig::default());
        state.apply_url_params(&url_state::parse_query("?lat=4.6&lon=-74.1&zoom=40"));
        assert_eq!(state.view_state.latitude, 4.6);
        assert_eq!(state.view_state.longitude, -74.1);
        assert_eq!(state.view_state.zoom, state.view_state.max_zoom);

        // A lone latitude does not move the map
        let mut state = AppState::new(&DashboardConfig::default());
        state.apply_url_params(&url_state::parse_query("?lat=10"));
        assert_eq!(state.view_state.latitude, 49.254);

        // Non-finite values never reach the viewport
        let mut state = AppState::new(&DashboardConfig::default());
        state.apply_url_params(&url_state::parse_query("?lat=NaN&lon=inf&zoom=NaN"));
        assert_eq!(state.view_state.latitude, 49.254);
        assert_eq!(state.view_state.longitude, -123.13);
        assert_eq!(state.view_state.zoom, 2.0);
    }
}
