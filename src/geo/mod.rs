//! Geographic feature handling for the grid map.
//!
//! This module parses fetched GeoJSON into renderable features, projects
//! them onto the canvas, draws them with their layer style and resolves
//! hover picks.

mod features;
mod pick;
mod projection;
mod renderer;

pub use features::{union_bounds, FeatureSet, GeoFeature, GeoJsonError, MapFeature};
pub use pick::pick_feature;
pub use projection::{MapProjection, MAX_LATITUDE};
pub use renderer::{render_grid_layers, Highlight};
