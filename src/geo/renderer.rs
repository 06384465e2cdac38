//! Grid layer rendering.
//!
//! Renders fetched features to the egui canvas using each layer's style.

use super::{FeatureSet, GeoFeature, MapFeature, MapProjection};
use crate::layers::{LayerDescriptor, StyleConfig};
use eframe::egui::{Color32, Mesh, Painter, Pos2, Shape, Stroke};
use geo_types::Coord;

/// Smallest on-screen point radius in pixels.
pub const MIN_POINT_PIXELS: f32 = 1.0;
/// Smallest on-screen line width in pixels.
pub const MIN_LINE_PIXELS: f32 = 1.0;

/// A feature to draw highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight<'a> {
    pub layer_id: &'a str,
    pub feature_index: usize,
}

/// Color used for auto-highlighted features.
fn highlight_color() -> Color32 {
    Color32::from_rgba_unmultiplied(255, 255, 0, 200)
}

/// Renders layers in order (later layers paint over earlier ones).
pub fn render_grid_layers(
    painter: &Painter,
    layers: &[(&LayerDescriptor, &FeatureSet)],
    projection: &MapProjection,
    highlight: Option<Highlight<'_>>,
) {
    for (descriptor, features) in layers {
        let highlighted = highlight
            .filter(|h| h.layer_id == descriptor.layer_id && descriptor.style.auto_highlight)
            .map(|h| h.feature_index);
        render_layer(painter, &descriptor.style, features, projection, highlighted);
    }
}

/// Renders a single layer.
fn render_layer(
    painter: &Painter,
    style: &StyleConfig,
    features: &FeatureSet,
    projection: &MapProjection,
    highlighted: Option<usize>,
) {
    let paint = LayerPaint::new(style, projection);

    for (index, feature) in features.iter().enumerate() {
        if !feature_visible(feature, projection) {
            continue;
        }
        if highlighted == Some(index) {
            render_feature(painter, &feature.geometry, projection, &paint.highlighted());
        } else {
            render_feature(painter, &feature.geometry, projection, &paint);
        }
    }
}

fn feature_visible(feature: &MapFeature, projection: &MapProjection) -> bool {
    let b = feature.bounds;
    projection.bbox_visible(b.min().x, b.min().y, b.max().x, b.max().y)
}

/// Resolved screen-space paint parameters for one layer.
#[derive(Debug, Clone)]
pub(crate) struct LayerPaint {
    pub fill: Option<Color32>,
    pub stroke: Option<Stroke>,
    pub radius: f32,
    pub dash: Option<[f32; 2]>,
}

impl LayerPaint {
    pub fn new(style: &StyleConfig, projection: &MapProjection) -> Self {
        let width = projection.meters_to_pixels(style.width_meters(), MIN_LINE_PIXELS);
        Self {
            fill: style.filled.then(|| style.effective_fill()),
            stroke: style
                .stroked
                .then(|| Stroke::new(width, style.effective_line())),
            radius: projection.meters_to_pixels(style.radius_meters(), MIN_POINT_PIXELS),
            dash: style.dash_array,
        }
    }

    fn highlighted(&self) -> Self {
        Self {
            fill: self.fill.map(|_| highlight_color()),
            stroke: self.stroke.map(|s| Stroke::new(s.width + 1.0, highlight_color())),
            ..self.clone()
        }
    }
}

fn render_feature(
    painter: &Painter,
    feature: &GeoFeature,
    projection: &MapProjection,
    paint: &LayerPaint,
) {
    match feature {
        GeoFeature::Point(coord) => render_point(painter, *coord, projection, paint),
        GeoFeature::MultiPoint(points) => {
            for coord in points {
                render_point(painter, *coord, projection, paint);
            }
        }
        GeoFeature::LineString(coords) => {
            render_line_string(painter, coords, projection, paint);
        }
        GeoFeature::MultiLineString(lines) => {
            for coords in lines {
                render_line_string(painter, coords, projection, paint);
            }
        }
        GeoFeature::Polygon { exterior, holes } => {
            render_polygon(painter, exterior, holes, projection, paint);
        }
        GeoFeature::MultiPolygon(polygons) => {
            for (exterior, holes) in polygons {
                render_polygon(painter, exterior, holes, projection, paint);
            }
        }
    }
}

/// Renders a point feature as a circle.
fn render_point(painter: &Painter, coord: Coord<f64>, projection: &MapProjection, paint: &LayerPaint) {
    let pos = projection.geo_to_screen(coord);
    if !painter.clip_rect().expand(paint.radius).contains(pos) {
        return;
    }

    if let Some(fill) = paint.fill {
        painter.circle_filled(pos, paint.radius, fill);
    }
    if let Some(stroke) = paint.stroke {
        painter.circle_stroke(pos, paint.radius, stroke);
    }
}

/// Renders a line string with the layer's stroke.
///
/// Lines are drawn even when the layer is not stroked, using the fill
/// color, matching how filled-only line layers appear.
fn render_line_string(
    painter: &Painter,
    coords: &[Coord<f64>],
    projection: &MapProjection,
    paint: &LayerPaint,
) {
    let stroke = match (paint.stroke, paint.fill) {
        (Some(stroke), _) => stroke,
        (None, Some(fill)) => Stroke::new(MIN_LINE_PIXELS, fill),
        (None, None) => return,
    };

    let points = screen_points(coords, projection);
    if points.len() < 2 {
        return;
    }

    match paint.dash {
        Some([dash, gap]) => painter.extend(Shape::dashed_line(&points, stroke, dash, gap)),
        None => {
            painter.add(Shape::line(points, stroke));
        }
    }
}

/// Renders a polygon's fill and outline.
fn render_polygon(
    painter: &Painter,
    exterior: &[Coord<f64>],
    holes: &[Vec<Coord<f64>>],
    projection: &MapProjection,
    paint: &LayerPaint,
) {
    let exterior = ring_points(exterior, projection);
    if exterior.len() < 3 {
        return;
    }
    let holes: Vec<Vec<Pos2>> = holes
        .iter()
        .map(|hole| ring_points(hole, projection))
        .filter(|hole| hole.len() >= 3)
        .collect();

    if let Some(fill) = paint.fill {
        if let Some(mesh) = fill_mesh(&exterior, &holes, fill) {
            painter.add(mesh);
        }
    }

    if let Some(stroke) = paint.stroke {
        for ring in std::iter::once(&exterior).chain(holes.iter()) {
            let mut closed = ring.clone();
            closed.push(ring[0]);
            match paint.dash {
                Some([dash, gap]) => {
                    painter.extend(Shape::dashed_line(&closed, stroke, dash, gap))
                }
                None => {
                    painter.add(Shape::line(closed, stroke));
                }
            }
        }
    }
}

/// Projects a ring and drops its closing vertex.
fn ring_points(coords: &[Coord<f64>], projection: &MapProjection) -> Vec<Pos2> {
    let mut points = screen_points(coords, projection);
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Triangulates a ring with holes into a filled mesh.
///
/// Returns `None` if the rings cannot be triangulated.
fn fill_mesh(exterior: &[Pos2], holes: &[Vec<Pos2>], color: Color32) -> Option<Mesh> {
    let mut points: Vec<Pos2> = exterior.to_vec();
    let mut hole_indices = Vec::with_capacity(holes.len());
    for hole in holes {
        hole_indices.push(points.len());
        points.extend_from_slice(hole);
    }

    let data: Vec<f32> = points.iter().flat_map(|p| [p.x, p.y]).collect();
    let indices = match earcutr::earcut(&data, &hole_indices, 2) {
        Ok(indices) => indices,
        Err(e) => {
            log::debug!("Skipping polygon fill: {:?}", e);
            return None;
        }
    };
    if indices.is_empty() {
        return None;
    }

    let mut mesh = Mesh::default();
    for p in &points {
        mesh.colored_vertex(*p, color);
    }
    for tri in indices.chunks_exact(3) {
        mesh.add_triangle(tri[0] as u32, tri[1] as u32, tri[2] as u32);
    }
    Some(mesh)
}

/// Projects coordinates, dropping consecutive sub-pixel duplicates.
pub(crate) fn screen_points(coords: &[Coord<f64>], projection: &MapProjection) -> Vec<Pos2> {
    let mut points: Vec<Pos2> = Vec::with_capacity(coords.len());
    for coord in coords {
        let pos = projection.geo_to_screen(*coord);
        if let Some(last) = points.last() {
            if last.distance_sq(pos) < 0.25 {
                continue;
            }
        }
        points.push(pos);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{Rect, Vec2};
    use geo_types::coord;

    fn projection() -> MapProjection {
        let mut p = MapProjection::new(0.0, 0.0, 4.0);
        p.update(0.0, Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)));
        p
    }

    #[test]
    fn test_layer_paint_from_style() {
        let p = projection();

        let substations = LayerPaint::new(&StyleConfig::substations(), &p);
        assert!(substations.fill.is_some());
        assert!(substations.stroke.is_none());
        assert!(substations.radius >= MIN_POINT_PIXELS);

        let polygon = LayerPaint::new(&StyleConfig::offshore_polygon(), &p);
        assert_eq!(polygon.dash, Some([10.0, 5.0]));
        assert_eq!(polygon.stroke.map(|s| s.width), Some(MIN_LINE_PIXELS));
    }

    #[test]
    fn test_buses_larger_than_substations() {
        let p = projection();
        let substations = LayerPaint::new(&StyleConfig::substations(), &p);
        let buses = LayerPaint::new(&StyleConfig::buses(), &p);
        assert!(buses.radius > substations.radius);
    }

    fn mesh_area(mesh: &Mesh) -> f32 {
        mesh.indices
            .chunks_exact(3)
            .map(|t| {
                let [a, b, c] = [t[0], t[1], t[2]].map(|i| mesh.vertices[i as usize].pos);
                ((b - a).x * (c - a).y - (b - a).y * (c - a).x).abs() / 2.0
            })
            .sum()
    }

    #[test]
    fn test_fill_mesh_concave_ring() {
        // L-shape: 10x10 square minus a 6x6 bay
        let ring = [
            Pos2::new(0.0, 0.0),
            Pos2::new(10.0, 0.0),
            Pos2::new(10.0, 4.0),
            Pos2::new(4.0, 4.0),
            Pos2::new(4.0, 10.0),
            Pos2::new(0.0, 10.0),
        ];
        let mesh = fill_mesh(&ring, &[], Color32::RED).unwrap();
        assert_eq!(mesh.indices.len(), 4 * 3);
        assert!((mesh_area(&mesh) - 64.0).abs() < 1e-3);
    }

    #[test]
    fn test_fill_mesh_with_hole() {
        let ring = [
            Pos2::new(0.0, 0.0),
            Pos2::new(10.0, 0.0),
            Pos2::new(10.0, 10.0),
            Pos2::new(0.0, 10.0),
        ];
        let hole = vec![
            Pos2::new(3.0, 3.0),
            Pos2::new(3.0, 7.0),
            Pos2::new(7.0, 7.0),
            Pos2::new(7.0, 3.0),
        ];
        let mesh = fill_mesh(&ring, &[hole], Color32::RED).unwrap();
        assert!((mesh_area(&mesh) - 84.0).abs() < 1e-3);
        assert!(mesh.vertices.iter().all(|v| v.color == Color32::RED));
    }

    #[test]
    fn test_ring_points_open() {
        let p = projection();
        let ring = [
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 5.0, y: 0.0 },
            coord! { x: 5.0, y: 5.0 },
            coord! { x: 0.0, y: 0.0 },
        ];
        assert_eq!(ring_points(&ring, &p).len(), 3);
    }

    #[test]
    fn test_screen_points_dedup() {
        let p = projection();
        let coords = [
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 1.0, y: 1.0 },
        ];
        assert_eq!(screen_points(&coords, &p).len(), 2);
    }
}
