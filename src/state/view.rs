//! Map viewport state (center, zoom, pitch, bearing).

use crate::config::InitialViewState;
use crate::geo::{MapProjection, MAX_LATITUDE};
use eframe::egui::{Pos2, Rect};
use geo_types::Rect as GeoRect;

/// Screen margin in pixels kept around fitted bounds.
const FIT_PADDING: f32 = 40.0;

/// Current camera of the map canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub pitch: f32,
    pub bearing: f32,
    /// Camera to return to on reset
    initial: InitialViewState,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::from_initial(&InitialViewState::default())
    }
}

impl ViewState {
    pub fn from_initial(initial: &InitialViewState) -> Self {
        Self {
            latitude: initial.latitude,
            longitude: initial.longitude,
            zoom: clamp_zoom(initial.zoom, initial.min_zoom, initial.max_zoom),
            min_zoom: initial.min_zoom,
            max_zoom: initial.max_zoom,
            pitch: initial.pitch,
            bearing: initial.bearing,
            initial: initial.clone(),
        }
    }

    /// Projection for the given canvas rectangle.
    pub fn projection(&self, rect: Rect) -> MapProjection {
        let mut projection = MapProjection::new(self.latitude, self.longitude, self.zoom);
        projection.update(self.bearing, rect);
        projection
    }

    /// Moves the center so the map follows a drag of `from` to `to`.
    pub fn pan(&mut self, projection: &MapProjection, from: Pos2, to: Pos2) {
        let grabbed = projection.screen_to_geo(from);
        let center = projection.center_placing(grabbed, to);
        self.set_center(center.y, center.x);
    }

    /// Zooms by `delta` levels keeping the location under `anchor` fixed.
    pub fn zoom_around(&mut self, rect: Rect, anchor: Pos2, delta: f32) {
        let new_zoom = clamp_zoom(self.zoom + delta, self.min_zoom, self.max_zoom);
        if !delta.is_finite() || new_zoom == self.zoom {
            return;
        }

        let anchored = self.projection(rect).screen_to_geo(anchor);
        self.zoom = new_zoom;
        let center = self.projection(rect).center_placing(anchored, anchor);
        self.set_center(center.y, center.x);
    }

    /// Centers and zooms so `bounds` fills the canvas, within the zoom limits.
    pub fn fit_bounds(&mut self, bounds: GeoRect<f64>, rect: Rect) {
        let (center, zoom) = MapProjection::fit_bounds(bounds, rect, FIT_PADDING);
        self.set_center(center.y, center.x);
        self.set_zoom(zoom);
    }

    /// Sets the center, clamping latitude and wrapping longitude.
    ///
    /// Non-finite coordinates leave the center unchanged.
    pub fn set_center(&mut self, latitude: f64, longitude: f64) {
        if !latitude.is_finite() || !longitude.is_finite() {
            log::warn!("Ignoring non-finite map center {}, {}", latitude, longitude);
            return;
        }
        self.latitude = latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        self.longitude = wrap_longitude(longitude);
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = clamp_zoom(zoom, self.min_zoom, self.max_zoom);
        }
    }

    /// Restores the initial camera.
    pub fn reset(&mut self) {
        *self = Self::from_initial(&self.initial);
    }
}

/// Clamps without panicking on inverted or NaN bounds.
fn clamp_zoom(zoom: f32, min_zoom: f32, max_zoom: f32) -> f32 {
    zoom.min(max_zoom).max(min_zoom)
}

fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::Vec2;

    fn rect() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_initial_view() {
        let view = ViewState::default();
        assert_eq!(view.latitude, 49.254);
        assert_eq!(view.longitude, -123.13);
        assert_eq!(view.zoom, 2.0);
        assert_eq!(view.pitch, 5.0);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut view = ViewState::default();
        view.zoom_around(rect(), rect().center(), 100.0);
        assert_eq!(view.zoom, view.max_zoom);
        view.set_zoom(-5.0);
        assert_eq!(view.zoom, view.min_zoom);
    }

    #[test]
    fn test_zoom_keeps_anchor() {
        let mut view = ViewState::default();
        let anchor = Pos2::new(600.0, 200.0);
        let before = view.projection(rect()).screen_to_geo(anchor);
        view.zoom_around(rect(), anchor, 1.5);
        let after = view.projection(rect()).screen_to_geo(anchor);
        assert!((before.x - after.x).abs() < 1e-3);
        assert!((before.y - after.y).abs() < 1e-3);
    }

    #[test]
    fn test_pan_moves_center_opposite_to_drag() {
        let mut view = ViewState::default();
        let projection = view.projection(rect());
        let lon = view.longitude;
        view.pan(&projection, Pos2::new(400.0, 300.0), Pos2::new(500.0, 300.0));
        assert!(view.longitude < lon);
    }

    #[test]
    fn test_non_finite_input_ignored() {
        let mut view = ViewState::default();
        view.set_center(f64::NAN, 10.0);
        view.set_center(10.0, f64::INFINITY);
        view.set_zoom(f32::NAN);
        view.zoom_around(rect(), rect().center(), f32::INFINITY);
        assert_eq!(view, ViewState::default());
    }

    #[test]
    fn test_inverted_zoom_bounds_do_not_panic() {
        let initial = InitialViewState {
            min_zoom: 5.0,
            max_zoom: 3.0,
            ..InitialViewState::default()
        };
        let mut view = ViewState::from_initial(&initial);
        assert!(view.zoom.is_finite());
        view.set_zoom(10.0);
        assert!(view.zoom.is_finite());
    }

    #[test]
    fn test_fit_bounds() {
        use geo_types::coord;

        let mut view = ViewState::default();
        let bounds = GeoRect::new(coord! { x: -79.0, y: -4.2 }, coord! { x: -67.0, y: 12.5 });
        view.fit_bounds(bounds, rect());
        assert!(view.longitude > -79.0 && view.longitude < -67.0);
        assert!(view.latitude > -4.2 && view.latitude < 12.5);
        assert!(view.zoom > 2.0 && view.zoom < view.max_zoom);

        // A single point zooms in as far as allowed
        let point = GeoRect::new(coord! { x: 7.5, y: 9.1 }, coord! { x: 7.5, y: 9.1 });
        view.fit_bounds(point, rect());
        assert_eq!(view.zoom, view.max_zoom);
        assert!((view.longitude - 7.5).abs() < 1e-6);
    }

    #[test]
    fn test_reset_and_wrap() {
        let mut view = ViewState::default();
        view.set_center(95.0, 190.0);
        assert_eq!(view.latitude, MAX_LATITUDE);
        assert!((view.longitude - -170.0).abs() < 1e-9);

        view.reset();
        assert_eq!(view, ViewState::default());
    }
}
