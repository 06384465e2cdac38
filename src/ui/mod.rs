//! UI modules for the grid map dashboard.
//!
//! The UI is split into distinct panels:
//! - Top bar: Title, status and basemap
//! - Left panel: Regions and their layers
//! - Central canvas: Map with grid layers

mod canvas;
mod colors;
mod left_panel;
mod top_bar;

pub use canvas::render_canvas;
pub use left_panel::render_left_panel;
pub use top_bar::render_top_bar;
