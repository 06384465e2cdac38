//! GeoJSON feature collections prepared for rendering.

use geo_types::{coord, Coord, Rect};
use geojson::{Feature, GeoJson, Geometry, JsonObject, Value};

/// Error raised when a GeoJSON document cannot be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonError(pub String);

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse GeoJSON: {}", self.0)
    }
}

impl std::error::Error for GeoJsonError {}

/// Geometry of a feature in lon/lat coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoFeature {
    Point(Coord<f64>),
    MultiPoint(Vec<Coord<f64>>),
    LineString(Vec<Coord<f64>>),
    MultiLineString(Vec<Vec<Coord<f64>>>),
    Polygon {
        exterior: Vec<Coord<f64>>,
        holes: Vec<Vec<Coord<f64>>>,
    },
    MultiPolygon(Vec<(Vec<Coord<f64>>, Vec<Vec<Coord<f64>>>)>),
}

impl GeoFeature {
    fn coords(&self) -> Box<dyn Iterator<Item = &Coord<f64>> + '_> {
        match self {
            GeoFeature::Point(c) => Box::new(std::iter::once(c)),
            GeoFeature::MultiPoint(points) | GeoFeature::LineString(points) => {
                Box::new(points.iter())
            }
            GeoFeature::MultiLineString(lines) => Box::new(lines.iter().flatten()),
            GeoFeature::Polygon { exterior, .. } => Box::new(exterior.iter()),
            GeoFeature::MultiPolygon(polygons) => {
                Box::new(polygons.iter().flat_map(|(exterior, _)| exterior.iter()))
            }
        }
    }

    /// Bounding box of the geometry, `None` if it has no coordinates.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        let mut coords = self.coords();
        let first = *coords.next()?;
        let (min, max) = coords.fold((first, first), |(min, max), c| {
            (
                coord! { x: min.x.min(c.x), y: min.y.min(c.y) },
                coord! { x: max.x.max(c.x), y: max.y.max(c.y) },
            )
        });
        Some(Rect::new(min, max))
    }
}

/// A feature with its display properties.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFeature {
    pub geometry: GeoFeature,
    /// Property name/value pairs, stringified for display
    pub properties: Vec<(String, String)>,
    pub bounds: Rect<f64>,
}

impl MapFeature {
    /// Returns the feature's name, if it has one.
    pub fn label(&self) -> Option<&str> {
        self.properties
            .iter()
            .find(|(key, _)| matches!(key.as_str(), "name" | "NAME" | "Name"))
            .map(|(_, value)| value.as_str())
    }
}

/// All features of one fetched layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSet {
    pub features: Vec<MapFeature>,
}

impl FeatureSet {
    /// Parses a GeoJSON document (collection, feature or bare geometry).
    ///
    /// Features without geometry are skipped and geometry collections are
    /// flattened into one feature per member.
    pub fn from_geojson_str(geojson_str: &str) -> Result<Self, GeoJsonError> {
        let geojson: GeoJson = geojson_str
            .parse()
            .map_err(|e: geojson::Error| GeoJsonError(e.to_string()))?;

        let mut set = Self::default();
        match geojson {
            GeoJson::FeatureCollection(fc) => {
                for feature in &fc.features {
                    set.push_feature(feature);
                }
            }
            GeoJson::Feature(f) => set.push_feature(&f),
            GeoJson::Geometry(g) => set.push_geometry(&g, &[]),
        }

        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MapFeature> {
        self.features.iter()
    }

    /// Bounding box over all features.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.features.iter().map(|f| f.bounds).reduce(union_bounds)
    }

    fn push_feature(&mut self, feature: &Feature) {
        let properties = feature
            .properties
            .as_ref()
            .map(stringify_properties)
            .unwrap_or_default();

        if let Some(geometry) = &feature.geometry {
            self.push_geometry(geometry, &properties);
        }
    }

    fn push_geometry(&mut self, geometry: &Geometry, properties: &[(String, String)]) {
        if let Value::GeometryCollection(members) = &geometry.value {
            for member in members {
                self.push_geometry(member, properties);
            }
            return;
        }

        let Some(geometry) = convert_value(&geometry.value) else {
            return;
        };
        let Some(bounds) = geometry.bounding_rect() else {
            return;
        };

        self.features.push(MapFeature {
            geometry,
            properties: properties.to_vec(),
            bounds,
        });
    }
}

/// Smallest rectangle containing both `a` and `b`.
pub fn union_bounds(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
        coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
    )
}

fn stringify_properties(properties: &JsonObject) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = properties
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let text = match value.as_str() {
                Some(s) => s.to_string(),
                None => value.to_string(),
            };
            (key.clone(), text)
        })
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs
}

fn to_coord(position: &[f64]) -> Option<Coord<f64>> {
    match position {
        [x, y, ..] => Some(coord! { x: *x, y: *y }),
        _ => None,
    }
}

fn to_ring(positions: &[Vec<f64>]) -> Vec<Coord<f64>> {
    positions.iter().filter_map(|p| to_coord(p)).collect()
}

fn to_polygon(rings: &[Vec<Vec<f64>>]) -> Option<(Vec<Coord<f64>>, Vec<Vec<Coord<f64>>>)> {
    let (exterior, holes) = rings.split_first()?;
    let exterior = to_ring(exterior);
    if exterior.len() < 3 {
        return None;
    }
    let holes = holes.iter().map(|ring| to_ring(ring)).collect();
    Some((exterior, holes))
}

fn convert_value(value: &Value) -> Option<GeoFeature> {
    match value {
        Value::Point(position) => to_coord(position).map(GeoFeature::Point),
        Value::MultiPoint(points) => {
            let points = to_ring(points);
            (!points.is_empty()).then_some(GeoFeature::MultiPoint(points))
        }
        Value::LineString(line) => {
            let line = to_ring(line);
            (line.len() >= 2).then_some(GeoFeature::LineString(line))
        }
        Value::MultiLineString(lines) => {
            let lines: Vec<Vec<Coord<f64>>> = lines
                .iter()
                .map(|line| to_ring(line))
                .filter(|line| line.len() >= 2)
                .collect();
            (!lines.is_empty()).then_some(GeoFeature::MultiLineString(lines))
        }
        Value::Polygon(rings) => {
            to_polygon(rings).map(|(exterior, holes)| GeoFeature::Polygon { exterior, holes })
        }
        Value::MultiPolygon(polygons) => {
            let polygons: Vec<_> = polygons.iter().filter_map(|p| to_polygon(p)).collect();
            (!polygons.is_empty()).then_some(GeoFeature::MultiPolygon(polygons))
        }
        Value::GeometryCollection(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-74.1, 4.6]},
                "properties": {"name": "Bogota 230kV", "voltage": 230, "tag": null}
            },
            {
                "type": "Feature",
                "geometry": {"type": "LineString", "coordinates": [[-75.0, 6.2], [-74.1, 4.6]]},
                "properties": {"circuits": 2}
            },
            {
                "type": "Feature",
                "geometry": null,
                "properties": {"name": "orphan"}
            },
            {
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-77.0, 8.0], [-76.0, 8.0], [-76.0, 9.0], [-77.0, 8.0]]]
                },
                "properties": {}
            }
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let set = FeatureSet::from_geojson_str(SAMPLE).unwrap();
        assert_eq!(set.len(), 3);

        assert!(matches!(set.features[0].geometry, GeoFeature::Point(_)));
        assert!(matches!(set.features[1].geometry, GeoFeature::LineString(_)));
        assert!(matches!(set.features[2].geometry, GeoFeature::Polygon { .. }));
    }

    #[test]
    fn test_properties_stringified() {
        let set = FeatureSet::from_geojson_str(SAMPLE).unwrap();
        let substation = &set.features[0];

        assert_eq!(substation.label(), Some("Bogota 230kV"));
        assert_eq!(
            substation.properties,
            vec![
                ("name".to_string(), "Bogota 230kV".to_string()),
                ("voltage".to_string(), "230".to_string()),
            ]
        );
        assert_eq!(set.features[1].label(), None);
    }

    #[test]
    fn test_bounds() {
        let set = FeatureSet::from_geojson_str(SAMPLE).unwrap();
        let bounds = set.bounds().unwrap();
        assert_eq!(bounds.min(), coord! { x: -77.0, y: 4.6 });
        assert_eq!(bounds.max(), coord! { x: -74.1, y: 9.0 });
        assert!(FeatureSet::default().bounds().is_none());
    }

    #[test]
    fn test_geometry_collection_flattened() {
        let json = r#"{
            "type": "Feature",
            "geometry": {
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "Point", "coordinates": [1.0, 2.0]},
                    {"type": "MultiPoint", "coordinates": [[3.0, 4.0], [5.0, 6.0]]}
                ]
            },
            "properties": {"id": "x"}
        }"#;
        let set = FeatureSet::from_geojson_str(json).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.iter().all(|f| f.properties.len() == 1));
    }

    #[test]
    fn test_degenerate_geometries_skipped() {
        let json = r#"{"type": "LineString", "coordinates": [[1.0, 2.0]]}"#;
        assert!(FeatureSet::from_geojson_str(json).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_document() {
        assert!(FeatureSet::from_geojson_str("{\"type\": \"Nope\"}").is_err());
        assert!(FeatureSet::from_geojson_str("<html>502</html>").is_err());
    }
}
