//! Grid infrastructure layer descriptors.
//!
//! Each configured region contributes four layers (substations, buses,
//! transmission lines and offshore polygons). The builder turns a region's
//! data sources into descriptors; composition concatenates them across
//! regions in draw order.

mod builder;
mod style;
mod types;

pub use builder::{build_region_layers, compose_layers};
pub use style::StyleConfig;
pub use types::{LayerCategory, LayerDescriptor, RegionDataSources};
