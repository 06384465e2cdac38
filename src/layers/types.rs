//! Layer descriptor data structures.

use super::StyleConfig;

/// Category of grid infrastructure drawn by a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerCategory {
    Substations,
    Buses,
    Lines,
    OffshorePolygon,
}

impl LayerCategory {
    /// All categories in draw order (back to front).
    pub fn all() -> &'static [LayerCategory] {
        &[
            LayerCategory::Substations,
            LayerCategory::Buses,
            LayerCategory::Lines,
            LayerCategory::OffshorePolygon,
        ]
    }

    /// Short name used as the prefix of layer ids.
    pub fn name(&self) -> &'static str {
        match self {
            LayerCategory::Substations => "substations",
            LayerCategory::Buses => "buses",
            LayerCategory::Lines => "lines",
            LayerCategory::OffshorePolygon => "polygon",
        }
    }

    /// Human readable label for the layer panel.
    pub fn label(&self) -> &'static str {
        match self {
            LayerCategory::Substations => "Substations",
            LayerCategory::Buses => "Buses",
            LayerCategory::Lines => "Transmission lines",
            LayerCategory::OffshorePolygon => "Offshore shapes",
        }
    }

    /// Fixed style for this category.
    pub fn style(&self) -> StyleConfig {
        match self {
            LayerCategory::Substations => StyleConfig::substations(),
            LayerCategory::Buses => StyleConfig::buses(),
            LayerCategory::Lines => StyleConfig::lines(),
            LayerCategory::OffshorePolygon => StyleConfig::offshore_polygon(),
        }
    }

    /// Builds the layer id for this category within a region.
    pub fn layer_id(&self, region_id: &str) -> String {
        format!("{}-{}", self.name(), region_id)
    }
}

/// Locators of the four feature collections published for one region.
///
/// Created once at startup from configuration and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionDataSources {
    /// Region identifier (e.g. "US"), unique across the configuration
    pub region_id: String,
    pub substations_source: String,
    pub buses_source: String,
    pub lines_source: String,
    pub polygon_source: String,
}

impl RegionDataSources {
    pub fn new(
        region_id: impl Into<String>,
        substations_source: impl Into<String>,
        buses_source: impl Into<String>,
        lines_source: impl Into<String>,
        polygon_source: impl Into<String>,
    ) -> Self {
        Self {
            region_id: region_id.into(),
            substations_source: substations_source.into(),
            buses_source: buses_source.into(),
            lines_source: lines_source.into(),
            polygon_source: polygon_source.into(),
        }
    }

    /// Builds this region's layer descriptors.
    pub fn build_layers(&self) -> Vec<LayerDescriptor> {
        super::build_region_layers(
            &self.region_id,
            &self.substations_source,
            &self.buses_source,
            &self.lines_source,
            &self.polygon_source,
        )
    }
}

/// A renderable layer: identity, data reference and fixed style.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDescriptor {
    /// Reconciliation key, unique across the composed layer list
    pub layer_id: String,
    /// Region this layer belongs to
    pub region_id: String,
    pub category: LayerCategory,
    /// Locator of the feature collection to draw
    pub data_source: String,
    pub style: StyleConfig,
    /// Whether features can be picked by hovering
    pub interactive: bool,
}
