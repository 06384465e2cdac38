//! Per-layer load status and visibility.

use crate::fetch::FetchResult;
use crate::geo::{union_bounds, FeatureSet};
use geo_types::Rect;
use crate::layers::LayerDescriptor;

/// Load status of a layer's feature collection.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerStatus {
    /// Not requested yet
    Pending,
    /// Fetch in flight
    Loading,
    /// Features loaded
    Loaded { features: usize, elapsed_ms: f64 },
    /// Fetch or parse failed
    Failed(String),
}

impl LayerStatus {
    pub fn label(&self) -> String {
        match self {
            LayerStatus::Pending => "Pending".to_string(),
            LayerStatus::Loading => "Loading...".to_string(),
            LayerStatus::Loaded { features, .. } => format!("{} features", features),
            LayerStatus::Failed(_) => "Failed".to_string(),
        }
    }
}

/// A layer descriptor together with its runtime state.
#[derive(Debug, Clone)]
pub struct LayerEntry {
    pub descriptor: LayerDescriptor,
    pub status: LayerStatus,
    pub features: Option<FeatureSet>,
    pub visible: bool,
}

impl LayerEntry {
    pub fn new(descriptor: LayerDescriptor) -> Self {
        Self {
            descriptor,
            status: LayerStatus::Pending,
            features: None,
            visible: true,
        }
    }
}

/// Runtime state of the composed layer list, in draw order.
#[derive(Debug, Clone, Default)]
pub struct LayerState {
    pub entries: Vec<LayerEntry>,
}

impl LayerState {
    pub fn from_descriptors(descriptors: Vec<LayerDescriptor>) -> Self {
        Self {
            entries: descriptors.into_iter().map(LayerEntry::new).collect(),
        }
    }

    pub fn get(&self, layer_id: &str) -> Option<&LayerEntry> {
        self.entries
            .iter()
            .find(|e| e.descriptor.layer_id == layer_id)
    }

    pub fn get_mut(&mut self, layer_id: &str) -> Option<&mut LayerEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.descriptor.layer_id == layer_id)
    }

    /// Marks a layer as fetching.
    pub fn mark_loading(&mut self, layer_id: &str) {
        if let Some(entry) = self.get_mut(layer_id) {
            entry.status = LayerStatus::Loading;
        }
    }

    /// Stores a completed fetch. Returns false if the layer is unknown.
    pub fn apply_fetch_result(&mut self, result: FetchResult) -> bool {
        let Some(entry) = self.get_mut(&result.layer_id) else {
            return false;
        };

        match result.outcome {
            Ok(features) => {
                entry.status = LayerStatus::Loaded {
                    features: features.len(),
                    elapsed_ms: result.elapsed_ms,
                };
                entry.features = Some(features);
            }
            Err(e) => {
                entry.status = LayerStatus::Failed(e.to_string());
                entry.features = None;
            }
        }
        true
    }

    /// Layers with loaded features that are currently visible, in draw order.
    pub fn renderable(&self) -> Vec<(&LayerDescriptor, &FeatureSet)> {
        self.entries
            .iter()
            .filter(|e| e.visible)
            .filter_map(|e| e.features.as_ref().map(|f| (&e.descriptor, f)))
            .collect()
    }

    /// Region ids in first-appearance order.
    pub fn region_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for entry in &self.entries {
            let id = entry.descriptor.region_id.as_str();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Entries belonging to a region.
    pub fn region_entries_mut<'a>(
        &'a mut self,
        region_id: &'a str,
    ) -> impl Iterator<Item = &'a mut LayerEntry> + 'a {
        self.entries
            .iter_mut()
            .filter(move |e| e.descriptor.region_id == region_id)
    }

    /// Shows or hides every layer of a region.
    pub fn set_region_visible(&mut self, region_id: &str, visible: bool) {
        for entry in self.region_entries_mut(region_id) {
            entry.visible = visible;
        }
    }

    /// Bounding box of every loaded feature in a region.
    pub fn region_bounds(&self, region_id: &str) -> Option<Rect<f64>> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.region_id == region_id)
            .filter_map(|e| e.features.as_ref()?.bounds())
            .reduce(union_bounds)
    }

    /// (loaded, failed, total) layer counts.
    pub fn progress(&self) -> (usize, usize, usize) {
        let loaded = self
            .entries
            .iter()
            .filter(|e| matches!(e.status, LayerStatus::Loaded { .. }))
            .count();
        let failed = self
            .entries
            .iter()
            .filter(|e| matches!(e.status, LayerStatus::Failed(_)))
            .count();
        (loaded, failed, self.entries.len())
    }

    /// Total number of loaded features across layers.
    pub fn total_features(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|e| e.features.as_ref())
            .map(FeatureSet::len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use crate::layers::{compose_layers, RegionDataSources};

    fn state() -> LayerState {
        let regions = [
            RegionDataSources::new("US", "a", "b", "c", "d"),
            RegionDataSources::new("CO", "e", "f", "g", "h"),
        ];
        LayerState::from_descriptors(compose_layers(&regions))
    }

    fn features() -> FeatureSet {
        FeatureSet::from_geojson_str(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}, "properties": {}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [3.0, 4.0]}, "properties": {}}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_apply_success_and_failure() {
        let mut state = state();
        state.mark_loading("buses-US");
        assert_eq!(state.get("buses-US").unwrap().status, LayerStatus::Loading);

        assert!(state.apply_fetch_result(FetchResult {
            layer_id: "buses-US".to_string(),
            outcome: Ok(features()),
            elapsed_ms: 12.0,
        }));
        assert!(state.apply_fetch_result(FetchResult {
            layer_id: "lines-CO".to_string(),
            outcome: Err(FetchError::Status(404)),
            elapsed_ms: 3.0,
        }));
        assert!(!state.apply_fetch_result(FetchResult {
            layer_id: "lines-XX".to_string(),
            outcome: Err(FetchError::Status(404)),
            elapsed_ms: 3.0,
        }));

        assert_eq!(state.progress(), (1, 1, 8));
        assert_eq!(state.total_features(), 2);
        assert_eq!(
            state.get("lines-CO").unwrap().status,
            LayerStatus::Failed("Server returned HTTP 404".to_string())
        );
    }

    #[test]
    fn test_renderable_respects_visibility_and_order() {
        let mut state = state();
        for id in ["polygon-CO", "substations-US"] {
            state.apply_fetch_result(FetchResult {
                layer_id: id.to_string(),
                outcome: Ok(features()),
                elapsed_ms: 1.0,
            });
        }

        let ids: Vec<&str> = state
            .renderable()
            .iter()
            .map(|(d, _)| d.layer_id.as_str())
            .collect();
        assert_eq!(ids, vec!["substations-US", "polygon-CO"]);

        state.set_region_visible("US", false);
        assert_eq!(state.renderable().len(), 1);
    }

    #[test]
    fn test_region_bounds() {
        let mut state = state();
        assert_eq!(state.region_bounds("US"), None);

        state.apply_fetch_result(FetchResult {
            layer_id: "buses-US".to_string(),
            outcome: Ok(features()),
            elapsed_ms: 1.0,
        });
        state.apply_fetch_result(FetchResult {
            layer_id: "lines-US".to_string(),
            outcome: Ok(FeatureSet::from_geojson_str(
                r#"{"type": "LineString", "coordinates": [[-2.0, 0.0], [0.0, 5.0]]}"#,
            )
            .unwrap()),
            elapsed_ms: 1.0,
        });

        let bounds = state.region_bounds("US").unwrap();
        assert_eq!(bounds.min(), geo_types::coord! { x: -2.0, y: 0.0 });
        assert_eq!(bounds.max(), geo_types::coord! { x: 3.0, y: 5.0 });
        assert_eq!(state.region_bounds("CO"), None);
    }

    #[test]
    fn test_region_ids() {
        assert_eq!(state().region_ids(), vec!["US", "CO"]);
    }
}
