//! Dashboard configuration.
//!
//! The configuration is loaded once at startup and treated as immutable
//! afterwards. It names the GeoServer publishing the grid feature
//! collections, the regions to display, the initial viewport and the
//! basemap style.

mod basemap;
mod geoserver;

pub use basemap::BasemapStyle;
pub use geoserver::GeoServerConfig;

use crate::layers::RegionDataSources;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The configuration could not be read.
    Unavailable(String),
    /// The configuration is not valid JSON for [`DashboardConfig`].
    Parse(String),
    /// No regions are configured.
    NoRegions,
    /// A region has an empty identifier.
    EmptyRegionId,
    /// A region identifier contains characters other than ASCII letters,
    /// digits or `_`.
    InvalidRegionId(String),
    /// Two regions share an identifier, which would collide layer ids.
    DuplicateRegion(String),
    /// The initial view has non-finite values or inverted zoom bounds.
    InvalidView(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Unavailable(msg) => write!(f, "Config unavailable: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
            ConfigError::NoRegions => write!(f, "No regions configured"),
            ConfigError::EmptyRegionId => write!(f, "Region id must not be empty"),
            ConfigError::InvalidRegionId(id) => write!(f, "Invalid region id: {:?}", id),
            ConfigError::DuplicateRegion(id) => write!(f, "Duplicate region id: {}", id),
            ConfigError::InvalidView(msg) => write!(f, "Invalid initial view: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A region and, optionally, explicit locators for its layers.
///
/// Locators left unset are derived from the GeoServer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Region identifier, also the suffix of the published type names
    pub id: String,
    /// Display name (e.g. "United States")
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub substations: Option<String>,
    #[serde(default)]
    pub buses: Option<String>,
    #[serde(default)]
    pub lines: Option<String>,
    #[serde(default)]
    pub offshore: Option<String>,
}

impl RegionConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            substations: None,
            buses: None,
            lines: None,
            offshore: None,
        }
    }

    /// Display name, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Resolves this region's data sources against a GeoServer.
    pub fn data_sources(&self, geoserver: &GeoServerConfig) -> RegionDataSources {
        let derived = geoserver.region_sources(&self.id);
        RegionDataSources {
            region_id: self.id.clone(),
            substations_source: self
                .substations
                .clone()
                .unwrap_or(derived.substations_source),
            buses_source: self.buses.clone().unwrap_or(derived.buses_source),
            lines_source: self.lines.clone().unwrap_or(derived.lines_source),
            polygon_source: self.offshore.clone().unwrap_or(derived.polygon_source),
        }
    }
}

/// Initial camera of the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f32,
    #[serde(default = "InitialViewState::default_min_zoom")]
    pub min_zoom: f32,
    #[serde(default = "InitialViewState::default_max_zoom")]
    pub max_zoom: f32,
    /// Camera tilt in degrees (informational on the flat canvas)
    #[serde(default)]
    pub pitch: f32,
    /// Map rotation in degrees clockwise from north
    #[serde(default)]
    pub bearing: f32,
}

impl InitialViewState {
    fn default_min_zoom() -> f32 {
        0.0
    }

    fn default_max_zoom() -> f32 {
        16.0
    }
}

impl InitialViewState {
    /// Checks that every value is finite and the zoom range is ordered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = self.latitude.is_finite()
            && self.longitude.is_finite()
            && [self.zoom, self.min_zoom, self.max_zoom, self.pitch, self.bearing]
                .iter()
                .all(|v| v.is_finite());
        if !finite {
            return Err(ConfigError::InvalidView(
                "values must be finite numbers".to_string(),
            ));
        }
        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::InvalidView(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        Ok(())
    }
}

impl Default for InitialViewState {
    fn default() -> Self {
        Self {
            latitude: 49.254,
            longitude: -123.13,
            zoom: 2.0,
            min_zoom: Self::default_min_zoom(),
            max_zoom: Self::default_max_zoom(),
            pitch: 5.0,
            bearing: 0.0,
        }
    }
}

/// Root dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub geoserver: GeoServerConfig,
    pub regions: Vec<RegionConfig>,
    #[serde(default)]
    pub initial_view: InitialViewState,
    #[serde(default)]
    pub basemap: BasemapStyle,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            geoserver: GeoServerConfig::default(),
            regions: vec![
                RegionConfig::new("US", "United States"),
                RegionConfig::new("CO", "Colombia"),
                RegionConfig::new("NG", "Nigeria"),
            ],
            initial_view: InitialViewState::default(),
            basemap: BasemapStyle::default(),
        }
    }
}

impl DashboardConfig {
    /// Environment variable naming a JSON config file (native only).
    pub const CONFIG_ENV_VAR: &'static str = "GRIDMAP_CONFIG";

    /// localStorage key holding a JSON config (WASM only).
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "gridmap_config";

    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks region ids (present, URL-safe, unique) and the initial view.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.initial_view.validate()?;

        if self.regions.is_empty() {
            return Err(ConfigError::NoRegions);
        }

        let mut seen = HashSet::new();
        for region in &self.regions {
            if region.id.trim().is_empty() {
                return Err(ConfigError::EmptyRegionId);
            }
            if !region
                .id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(ConfigError::InvalidRegionId(region.id.clone()));
            }
            if !seen.insert(region.id.as_str()) {
                return Err(ConfigError::DuplicateRegion(region.id.clone()));
            }
        }

        Ok(())
    }

    /// Data sources for every configured region, in configuration order.
    pub fn region_sources(&self) -> Vec<RegionDataSources> {
        self.regions
            .iter()
            .map(|region| region.data_sources(&self.geoserver))
            .collect()
    }

    /// Looks up a region by id.
    pub fn region(&self, id: &str) -> Option<&RegionConfig> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Loads the configuration, falling back to defaults on any failure.
    pub fn load() -> Self {
        match Self::load_raw() {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!(
                        "Loaded dashboard config with {} region(s)",
                        config.regions.len()
                    );
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring invalid dashboard config: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using built-in dashboard config");
                Self::default()
            }
            Err(e) => {
                log::warn!("{}, using built-in dashboard config", e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_raw() -> Result<Option<String>, ConfigError> {
        let Ok(path) = std::env::var(Self::CONFIG_ENV_VAR) else {
            return Ok(None);
        };

        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| ConfigError::Unavailable(format!("{}: {}", path, e)))
    }

    #[cfg(target_arch = "wasm32")]
    fn load_raw() -> Result<Option<String>, ConfigError> {
        let window = web_sys::window()
            .ok_or_else(|| ConfigError::Unavailable("no window".to_string()))?;

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return Ok(None),
        };

        storage
            .get_item(Self::STORAGE_KEY)
            .map_err(|e| ConfigError::Unavailable(format!("{:?}", e)))
    }
}
