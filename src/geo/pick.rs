//! Hover picking of rendered features.

use super::renderer::{screen_points, LayerPaint};
use super::{FeatureSet, GeoFeature, MapProjection};
use crate::layers::LayerDescriptor;
use eframe::egui::Pos2;
use geo_types::Coord;

/// Extra pixels of tolerance around points and lines.
const PICK_TOLERANCE: f32 = 3.0;

/// A feature found under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickInfo {
    /// Index into the rendered layer list
    pub layer_index: usize,
    /// Index of the feature within its layer
    pub feature_index: usize,
}

/// Finds the topmost interactive feature under `pointer`.
///
/// Layers are searched from last drawn to first, and features within a layer
/// from last to first, so the hit matches what is visible on top.
pub fn pick_feature(
    layers: &[(&LayerDescriptor, &FeatureSet)],
    projection: &MapProjection,
    pointer: Pos2,
) -> Option<PickInfo> {
    for (layer_index, (descriptor, features)) in layers.iter().enumerate().rev() {
        if !descriptor.interactive {
            continue;
        }
        let paint = LayerPaint::new(&descriptor.style, projection);
        let half_width = paint.stroke.map(|s| s.width / 2.0).unwrap_or(0.5);

        let hit = features.features.iter().enumerate().rev().find(|(_, feature)| {
            hits_feature(
                &feature.geometry,
                projection,
                pointer,
                paint.radius,
                half_width,
            )
        });

        if let Some((feature_index, _)) = hit {
            return Some(PickInfo {
                layer_index,
                feature_index,
            });
        }
    }
    None
}

fn hits_feature(
    feature: &GeoFeature,
    projection: &MapProjection,
    pointer: Pos2,
    radius: f32,
    half_width: f32,
) -> bool {
    let near_point = |coord: Coord<f64>| {
        projection.geo_to_screen(coord).distance(pointer) <= radius + PICK_TOLERANCE
    };
    let near_line = |coords: &[Coord<f64>]| {
        let points = screen_points(coords, projection);
        distance_to_polyline(pointer, &points) <= half_width + PICK_TOLERANCE
    };
    let inside = |exterior: &[Coord<f64>], holes: &[Vec<Coord<f64>>]| {
        point_in_ring(pointer, &screen_points(exterior, projection))
            && !holes
                .iter()
                .any(|hole| point_in_ring(pointer, &screen_points(hole, projection)))
    };

    match feature {
        GeoFeature::Point(coord) => near_point(*coord),
        GeoFeature::MultiPoint(points) => points.iter().any(|c| near_point(*c)),
        GeoFeature::LineString(coords) => near_line(coords.as_slice()),
        GeoFeature::MultiLineString(lines) => lines.iter().any(|l| near_line(l.as_slice())),
        GeoFeature::Polygon { exterior, holes } => inside(exterior.as_slice(), holes.as_slice()),
        GeoFeature::MultiPolygon(polygons) => polygons
            .iter()
            .any(|(e, h)| inside(e.as_slice(), h.as_slice())),
    }
}

/// Shortest distance from `p` to a polyline, `f32::INFINITY` if empty.
pub fn distance_to_polyline(p: Pos2, points: &[Pos2]) -> f32 {
    match points {
        [] => f32::INFINITY,
        [only] => only.distance(p),
        _ => points
            .windows(2)
            .map(|w| distance_to_segment(p, w[0], w[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Even-odd ray casting test.
pub fn point_in_ring(p: Pos2, ring: &[Pos2]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}
