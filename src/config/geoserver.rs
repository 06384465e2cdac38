//! GeoServer WFS endpoint settings.

use crate::layers::RegionDataSources;
use serde::{Deserialize, Serialize};

/// GeoServer publishing the grid feature collections over WFS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoServerConfig {
    /// Base URL of the GeoServer instance, without trailing slash
    pub base_url: String,
    /// Workspace containing the published layers
    pub workspace: String,
    /// Upper bound on features returned per request
    pub max_features: u32,
}

impl Default for GeoServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://34.31.13.149:8000/geoserver".to_string(),
            workspace: "PyPSAEarthDashboard".to_string(),
            max_features: 10_000,
        }
    }
}

impl GeoServerConfig {
    /// WFS GetFeature URL returning a GeoJSON feature collection.
    pub fn feature_url(&self, type_name: &str) -> String {
        format!(
            "{}/{}/ows?service=WFS&version=1.0.0&request=GetFeature&typeName={}%3A{}&maxFeatures={}&outputFormat=application%2Fjson",
            self.base_url.trim_end_matches('/'),
            self.workspace,
            self.workspace,
            type_name,
            self.max_features
        )
    }

    /// Derives the four locators published for a region.
    pub fn region_sources(&self, region_id: &str) -> RegionDataSources {
        RegionDataSources::new(
            region_id,
            self.feature_url(&format!("geojson_all_clean_substations_{}", region_id)),
            self.feature_url(&format!("geojson_Buses_geojson_data_{}", region_id)),
            self.feature_url(&format!("geojson_network_lines_view_{}", region_id)),
            self.feature_url(&format!("geojson_offshore_shapes_{}", region_id)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_url_format() {
        let config = GeoServerConfig::default();
        assert_eq!(
            config.feature_url("geojson_offshore_shapes_US"),
            "http://34.31.13.149:8000/geoserver/PyPSAEarthDashboard/ows?service=WFS&version=1.0.0&request=GetFeature&typeName=PyPSAEarthDashboard%3Ageojson_offshore_shapes_US&maxFeatures=10000&outputFormat=application%2Fjson"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = GeoServerConfig {
            base_url: "https://maps.example.org/geoserver/".to_string(),
            workspace: "Grid".to_string(),
            max_features: 50,
        };
        assert!(config
            .feature_url("x")
            .starts_with("https://maps.example.org/geoserver/Grid/ows?"));
        assert!(config.feature_url("x").contains("maxFeatures=50"));
    }

    #[test]
    fn test_region_sources_are_distinct() {
        let sources = GeoServerConfig::default().region_sources("CO");
        assert_eq!(sources.region_id, "CO");
        assert!(sources
            .substations_source
            .contains("geojson_all_clean_substations_CO"));
        assert!(sources.buses_source.contains("geojson_Buses_geojson_data_CO"));
        assert!(sources.lines_source.contains("geojson_network_lines_view_CO"));
        assert!(sources.polygon_source.contains("geojson_offshore_shapes_CO"));
    }
}
