//! Region layer construction and composition.

use super::{LayerCategory, LayerDescriptor, RegionDataSources};

/// Builds the four layer descriptors for a region.
///
/// Descriptors are returned in draw order: substations, buses, lines,
/// offshore polygon. Layer ids are `{category}-{region_id}`, so outputs for
/// distinct regions never collide. Locators are passed through unchecked.
pub fn build_region_layers(
    region_id: &str,
    substations_source: &str,
    buses_source: &str,
    lines_source: &str,
    polygon_source: &str,
) -> Vec<LayerDescriptor> {
    let sources = [
        substations_source,
        buses_source,
        lines_source,
        polygon_source,
    ];

    LayerCategory::all()
        .iter()
        .zip(sources)
        .map(|(&category, source)| LayerDescriptor {
            layer_id: category.layer_id(region_id),
            region_id: region_id.to_string(),
            category,
            data_source: source.to_string(),
            style: category.style(),
            interactive: true,
        })
        .collect()
}

/// Builds layers for every region and concatenates them in region order.
pub fn compose_layers(regions: &[RegionDataSources]) -> Vec<LayerDescriptor> {
    regions
        .iter()
        .flat_map(RegionDataSources::build_layers)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::StyleConfig;
    use std::collections::HashSet;

    fn region(id: &str) -> RegionDataSources {
        RegionDataSources::new(
            id,
            format!("sub-{}", id),
            format!("bus-{}", id),
            format!("lines-{}", id),
            format!("poly-{}", id),
        )
    }

    #[test]
    fn test_build_example_region() {
        let layers = build_region_layers("US", "src-sub", "src-bus", "src-lines", "src-poly");

        let ids: Vec<&str> = layers.iter().map(|l| l.layer_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["substations-US", "buses-US", "lines-US", "polygon-US"]
        );

        let sources: Vec<&str> = layers.iter().map(|l| l.data_source.as_str()).collect();
        assert_eq!(sources, vec!["src-sub", "src-bus", "src-lines", "src-poly"]);
        assert!(layers.iter().all(|l| l.interactive && l.region_id == "US"));
    }

    #[test]
    fn test_fixed_category_order() {
        let layers = region("CO").build_layers();
        assert_eq!(layers.len(), 4);

        let categories: Vec<LayerCategory> = layers.iter().map(|l| l.category).collect();
        assert_eq!(
            categories,
            vec![
                LayerCategory::Substations,
                LayerCategory::Buses,
                LayerCategory::Lines,
                LayerCategory::OffshorePolygon,
            ]
        );
    }

    #[test]
    fn test_build_is_idempotent() {
        let first = region("NG").build_layers();
        let second = region("NG").build_layers();
        assert_eq!(first, second);
    }

    #[test]
    fn test_style_independent_of_source() {
        let a = build_region_layers("US", "a", "b", "c", "d");
        let b = build_region_layers("US", "", "http://x/y?z", "not a url", "\u{1F50C}");

        for (left, right) in a.iter().zip(&b) {
            assert_eq!(left.style, right.style);
            assert_eq!(left.style, left.category.style());
        }

        assert_eq!(a[0].style, StyleConfig::substations());
        assert_eq!(a[1].style, StyleConfig::buses());
        assert_eq!(a[2].style, StyleConfig::lines());
        assert_eq!(a[3].style, StyleConfig::offshore_polygon());
    }

    #[test]
    fn test_category_styles() {
        let substations = StyleConfig::substations();
        assert!(substations.filled && !substations.stroked);
        assert_eq!(substations.radius_meters(), 12_000.0);

        let buses = StyleConfig::buses();
        assert!(buses.radius_meters() > substations.radius_meters());

        let lines = StyleConfig::lines();
        assert!(lines.stroked && lines.auto_highlight);
        assert_eq!(lines.width_meters(), 20_000.0);

        let polygon = StyleConfig::offshore_polygon();
        assert_eq!(polygon.dash_array, Some([10.0, 5.0]));
        assert!(polygon.opacity < lines.opacity);
    }

    #[test]
    fn test_compose_two_regions() {
        let layers = compose_layers(&[region("US"), region("CO")]);
        assert_eq!(layers.len(), 8);

        let ids: HashSet<&str> = layers.iter().map(|l| l.layer_id.as_str()).collect();
        assert_eq!(ids.len(), 8);

        // Region order is preserved
        assert!(layers[..4].iter().all(|l| l.region_id == "US"));
        assert!(layers[4..].iter().all(|l| l.region_id == "CO"));
    }

    #[test]
    fn test_compose_empty() {
        assert!(compose_layers(&[]).is_empty());
    }
}
