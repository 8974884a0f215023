//! View transform and the render surface contract.

use crate::scene::Scene;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 3.0;

/// Pan and zoom of the canvas.
///
/// `screen = world * zoom + scroll`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Clamp a zoom level to the supported range. Non-finite values reset to 1.
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        1.0
    }
}

impl Viewport {
    pub fn new(scroll_x: f64, scroll_y: f64, zoom: f64) -> Self {
        Self {
            scroll_x,
            scroll_y,
            zoom: clamp_zoom(zoom),
        }
    }

    fn scroll(&self) -> Vec2 {
        Vec2::new(self.scroll_x, self.scroll_y)
    }

    /// World to screen.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.scroll()) * Affine::scale(self.zoom)
    }

    /// Screen to world.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.scroll())
    }

    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.scroll_x += delta.x;
        self.scroll_y += delta.y;
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    /// Zoom by `factor`, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = clamp_zoom(self.zoom * factor);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        let world_point = self.screen_to_world(screen_point);
        self.zoom = new_zoom;
        let drift = screen_point - self.world_to_screen(world_point);
        self.pan(drift);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Center `bounds` in a `viewport` of the given pixel size.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, padding: f64) {
        if bounds.is_zero_area() {
            self.reset();
            return;
        }
        let usable = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );
        self.zoom = clamp_zoom((usable.width / bounds.width()).min(usable.height / bounds.height()));
        let center = bounds.center();
        self.scroll_x = viewport.width / 2.0 - center.x * self.zoom;
        self.scroll_y = viewport.height / 2.0 - center.y * self.zoom;
    }

    /// World-space area visible in a viewport of the given pixel size.
    pub fn visible_world_rect(&self, viewport: Size) -> Rect {
        Rect::from_points(
            self.screen_to_world(Point::ZERO),
            self.screen_to_world(Point::new(viewport.width, viewport.height)),
        )
    }
}

/// A drawing backend.
///
/// Receives the scene by shared reference; drawing never mutates the model.
pub trait RenderSurface {
    type Error;

    fn render(&mut self, scene: &Scene, viewport: &Viewport) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::default();
        assert_eq!(viewport.scroll_x, 0.0);
        assert!((viewport.zoom - 1.0).abs() < f64::EPSILON);
        let p = Point::new(100.0, 200.0);
        assert_eq!(viewport.screen_to_world(p), p);
    }

    #[test]
    fn test_screen_to_world_with_scroll_and_zoom() {
        let viewport = Viewport::new(50.0, 100.0, 2.0);
        let world = viewport.screen_to_world(Point::new(150.0, 300.0));
        assert!((world.x - 50.0).abs() < f64::EPSILON);
        assert!((world.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let viewport = Viewport::new(30.0, -20.0, 1.5);
        let original = Point::new(123.0, 456.0);
        let back = viewport.world_to_screen(viewport.screen_to_world(original));
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = Viewport::default();
        viewport.zoom_at(Point::ZERO, 0.001);
        assert!((viewport.zoom - MIN_ZOOM).abs() < f64::EPSILON);
        viewport.zoom_at(Point::ZERO, 1000.0);
        assert!((viewport.zoom - MAX_ZOOM).abs() < f64::EPSILON);
        assert!((Viewport::new(0.0, 0.0, f64::NAN).zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_at_keeps_anchor() {
        let mut viewport = Viewport::new(10.0, 20.0, 1.0);
        let anchor = Point::new(300.0, 200.0);
        let world = viewport.screen_to_world(anchor);
        viewport.zoom_at(anchor, 2.0);
        let back = viewport.world_to_screen(world);
        assert!((back.x - anchor.x).abs() < 1e-10);
        assert!((back.y - anchor.y).abs() < 1e-10);
    }

    #[test]
    fn test_fit_to_bounds() {
        let mut viewport = Viewport::default();
        viewport.fit_to_bounds(Rect::new(0.0, 0.0, 200.0, 100.0), Size::new(440.0, 440.0), 20.0);
        assert!((viewport.zoom - 2.0).abs() < f64::EPSILON);
        let center = viewport.world_to_screen(Point::new(100.0, 50.0));
        assert!((center.x - 220.0).abs() < 1e-10);
        assert!((center.y - 220.0).abs() < 1e-10);
    }

    #[test]
    fn test_serde_field_names() {
        let json = serde_json::to_value(Viewport::new(1.0, 2.0, 1.5)).unwrap();
        assert_eq!(json["scrollX"], 1.0);
        assert_eq!(json["zoom"], 1.5);
    }

    struct CountingSurface(usize);

    impl RenderSurface for CountingSurface {
        type Error = std::convert::Infallible;

        fn render(&mut self, scene: &Scene, _viewport: &Viewport) -> Result<(), Self::Error> {
            self.0 += scene.len();
            Ok(())
        }
    }

    #[test]
    fn test_render_surface_reads_scene() {
        let mut surface = CountingSurface(0);
        let scene = Scene::new();
        surface.render(&scene, &Viewport::default()).unwrap();
        assert_eq!(surface.0, 0);
    }
}
