//! Map projection and coordinate transformation.
//!
//! Handles converting between geographic coordinates (lon/lat) and screen
//! coordinates using a Web Mercator projection with 512 px tiles.

use eframe::egui::{Pos2, Rect, Vec2};
use geo_types::{coord, Coord, Rect as GeoRect};

/// World size in pixels at zoom 0.
const TILE_SIZE: f64 = 512.0;
/// Latitude limit of the Web Mercator projection.
pub const MAX_LATITUDE: f64 = 85.051_128_78;
/// Equatorial circumference in meters.
const EARTH_CIRCUMFERENCE: f64 = 40_075_016.686;

/// Map projection for converting geographic to screen coordinates.
#[derive(Debug, Clone)]
pub struct MapProjection {
    /// Center latitude of the view
    pub center_lat: f64,
    /// Center longitude of the view
    pub center_lon: f64,
    /// Zoom level (world is `512 * 2^zoom` pixels wide)
    pub zoom: f32,
    /// Rotation in degrees clockwise from north
    pub bearing: f32,
    /// Screen rectangle for the canvas
    pub screen_rect: Rect,
}

impl Default for MapProjection {
    fn default() -> Self {
        Self {
            center_lat: 0.0,
            center_lon: 0.0,
            zoom: 1.0,
            bearing: 0.0,
            screen_rect: Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
        }
    }
}

impl MapProjection {
    /// Creates a new projection centered on a location.
    pub fn new(center_lat: f64, center_lon: f64, zoom: f32) -> Self {
        Self {
            center_lat,
            center_lon,
            zoom,
            ..Default::default()
        }
    }

    /// Updates the projection with the canvas rectangle and rotation.
    pub fn update(&mut self, bearing: f32, screen_rect: Rect) {
        self.bearing = bearing;
        self.screen_rect = screen_rect;
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom as f64)
    }

    /// Projects lon/lat to world pixels at the current zoom.
    fn project(&self, coord: Coord<f64>) -> Coord<f64> {
        let world = self.world_size();
        let lat = coord.y.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = (coord.x + 180.0) / 360.0 * world;
        let y = (1.0 - (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln() / std::f64::consts::PI)
            / 2.0
            * world;
        coord! { x: x, y: y }
    }

    /// Inverse of [`Self::project`].
    fn unproject(&self, world_xy: Coord<f64>) -> Coord<f64> {
        let world = self.world_size();
        let lon = world_xy.x / world * 360.0 - 180.0;
        let n = std::f64::consts::PI * (1.0 - 2.0 * world_xy.y / world);
        let lat = n.sinh().atan().to_degrees();
        coord! { x: lon, y: lat }
    }

    fn center_world(&self) -> Coord<f64> {
        self.project(coord! { x: self.center_lon, y: self.center_lat })
    }

    /// Converts geographic coordinates (lon, lat) to screen position.
    pub fn geo_to_screen(&self, coord: Coord<f64>) -> Pos2 {
        let p = self.project(coord);
        let c = self.center_world();
        let offset = rotate(
            Vec2::new((p.x - c.x) as f32, (p.y - c.y) as f32),
            -self.bearing,
        );
        self.screen_rect.center() + offset
    }

    /// Converts screen position to geographic coordinates (lon, lat).
    pub fn screen_to_geo(&self, pos: Pos2) -> Coord<f64> {
        let offset = rotate(pos - self.screen_rect.center(), self.bearing);
        let c = self.center_world();
        self.unproject(coord! { x: c.x + offset.x as f64, y: c.y + offset.y as f64 })
    }

    /// Center (lon, lat) that places `coord` at screen position `anchor`.
    pub fn center_placing(&self, coord: Coord<f64>, anchor: Pos2) -> Coord<f64> {
        let offset = rotate(anchor - self.screen_rect.center(), self.bearing);
        let p = self.project(coord);
        self.unproject(coord! { x: p.x - offset.x as f64, y: p.y - offset.y as f64 })
    }

    /// Center and zoom that fit a lon/lat box inside `screen_rect`, leaving
    /// `padding` pixels on every side.
    ///
    /// Degenerate boxes (a single point) yield an unbounded zoom; callers clamp.
    pub fn fit_bounds(bounds: GeoRect<f64>, screen_rect: Rect, padding: f32) -> (Coord<f64>, f32) {
        let unit = Self::new(0.0, 0.0, 0.0);
        let top_left = unit.project(coord! { x: bounds.min().x, y: bounds.max().y });
        let bottom_right = unit.project(coord! { x: bounds.max().x, y: bounds.min().y });

        let span_x = (bottom_right.x - top_left.x).max(f64::EPSILON);
        let span_y = (bottom_right.y - top_left.y).max(f64::EPSILON);
        let width = (screen_rect.width() - 2.0 * padding).max(1.0) as f64;
        let height = (screen_rect.height() - 2.0 * padding).max(1.0) as f64;
        let zoom = (width / span_x).min(height / span_y).log2() as f32;

        let center = unit.unproject(coord! {
            x: (top_left.x + bottom_right.x) / 2.0,
            y: (top_left.y + bottom_right.y) / 2.0,
        });
        (center, zoom)
    }

    /// Ground resolution at the view center in meters per screen pixel.
    pub fn meters_per_pixel(&self) -> f64 {
        let lat = self.center_lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        EARTH_CIRCUMFERENCE * lat.to_radians().cos() / self.world_size()
    }

    /// Converts a length in meters to screen pixels, with a lower bound.
    pub fn meters_to_pixels(&self, meters: f32, min_pixels: f32) -> f32 {
        ((meters as f64 / self.meters_per_pixel()) as f32).max(min_pixels)
    }

    /// Returns the visible geographic bounds as (min_lon, min_lat, max_lon, max_lat).
    pub fn visible_bounds(&self) -> (f64, f64, f64, f64) {
        let r = self.screen_rect;
        let corners = [
            r.left_top(),
            r.right_top(),
            r.left_bottom(),
            r.right_bottom(),
        ]
        .map(|p| self.screen_to_geo(p));

        corners.iter().fold(
            (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
            |(min_lon, min_lat, max_lon, max_lat), c| {
                (
                    min_lon.min(c.x),
                    min_lat.min(c.y),
                    max_lon.max(c.x),
                    max_lat.max(c.y),
                )
            },
        )
    }

    /// Checks if a bounding box intersects with the visible bounds.
    pub fn bbox_visible(&self, min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> bool {
        let (vis_min_lon, vis_min_lat, vis_max_lon, vis_max_lat) = self.visible_bounds();

        // Margin in degrees so thick strokes and large points at the edge still draw
        let margin = 0.5;
        !(max_lon < vis_min_lon - margin
            || min_lon > vis_max_lon + margin
            || max_lat < vis_min_lat - margin
            || min_lat > vis_max_lat + margin)
    }
}

/// Rotates a screen vector by `degrees` clockwise.
fn rotate(v: Vec2, degrees: f32) -> Vec2 {
    if degrees == 0.0 {
        return v;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> MapProjection {
        let mut p = MapProjection::new(4.6, -74.1, 5.0);
        p.update(0.0, Rect::from_min_size(Pos2::ZERO, Vec2::new(1000.0, 800.0)));
        p
    }

    #[test]
    fn test_center_maps_to_screen_center() {
        let p = projection();
        let pos = p.geo_to_screen(coord! { x: -74.1, y: 4.6 });
        assert!((pos.x - 500.0).abs() < 0.01);
        assert!((pos.y - 400.0).abs() < 0.01);
    }

    #[test]
    fn test_round_trip() {
        let mut p = projection();
        p.bearing = 30.0;
        let original = coord! { x: -73.5, y: 5.2 };
        let back = p.screen_to_geo(p.geo_to_screen(original));
        assert!((back.x - original.x).abs() < 1e-4);
        assert!((back.y - original.y).abs() < 1e-4);
    }

    #[test]
    fn test_center_placing() {
        let p = projection();
        let target = coord! { x: -72.0, y: 7.0 };
        let anchor = Pos2::new(120.0, 640.0);
        let center = p.center_placing(target, anchor);

        let moved = MapProjection {
            center_lat: center.y,
            center_lon: center.x,
            ..p.clone()
        };
        let pos = moved.geo_to_screen(target);
        assert!((pos.x - anchor.x).abs() < 0.01);
        assert!((pos.y - anchor.y).abs() < 0.01);
    }

    #[test]
    fn test_north_is_up() {
        let p = projection();
        let north = p.geo_to_screen(coord! { x: -74.1, y: 6.0 });
        let east = p.geo_to_screen(coord! { x: -73.0, y: 4.6 });
        assert!(north.y < 400.0);
        assert!(east.x > 500.0);
    }

    #[test]
    fn test_meters_per_pixel_halves_per_zoom() {
        let mut p = projection();
        let coarse = p.meters_per_pixel();
        p.zoom += 1.0;
        let fine = p.meters_per_pixel();
        assert!((coarse / fine - 2.0).abs() < 1e-9);
        assert_eq!(p.meters_to_pixels(0.0, 1.0), 1.0);
    }

    #[test]
    fn test_bbox_visibility() {
        let p = projection();
        assert!(p.bbox_visible(-75.0, 4.0, -73.0, 5.0));
        assert!(!p.bbox_visible(100.0, 40.0, 110.0, 50.0));
    }

    #[test]
    fn test_fit_bounds_contains_box() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));
        let bounds = GeoRect::new(coord! { x: -80.0, y: -5.0 }, coord! { x: -70.0, y: 10.0 });
        let (center, zoom) = MapProjection::fit_bounds(bounds, rect, 20.0);

        let mut p = MapProjection::new(center.y, center.x, zoom);
        p.update(0.0, rect);
        let top_left = p.geo_to_screen(coord! { x: -80.0, y: 10.0 });
        let bottom_right = p.geo_to_screen(coord! { x: -70.0, y: -5.0 });

        assert!(top_left.x >= 19.9 && top_left.y >= 19.9);
        assert!(bottom_right.x <= 780.1 && bottom_right.y <= 580.1);
        // The taller side fills the padded height
        assert!((bottom_right.y - top_left.y - 560.0).abs() < 0.5);
    }
}
