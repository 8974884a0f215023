//! Resize and rotate handle geometry.
//!
//! Handle offsets are given in screen pixels and divided by the zoom, so
//! handles keep a constant on-screen size.

use super::group::GroupBounds;
use super::resize::ResizeHandle;
use crate::config::EngineConfig;
use crate::elements::ElementBase;
use crate::geometry::rotate_point;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Gap between the element box and its resize handles, in pixels.
pub const HANDLE_MARGIN: f64 = 10.0;
/// Distance of the rotate handle above the top edge, in pixels.
pub const ROTATE_HANDLE_DISTANCE: f64 = 50.0;
/// Pick radius around a handle, in pixels.
pub const HANDLE_RADIUS: f64 = 8.0;

/// Type of transform handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Resize(ResizeHandle),
    Rotate,
}

/// A transform handle with its world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a world point is within `tolerance` of this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// Pixel sizes used to lay out and pick handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleMetrics {
    pub margin: f64,
    pub rotate_distance: f64,
    pub radius: f64,
}

impl Default for HandleMetrics {
    fn default() -> Self {
        Self {
            margin: HANDLE_MARGIN,
            rotate_distance: ROTATE_HANDLE_DISTANCE,
            radius: HANDLE_RADIUS,
        }
    }
}

impl From<&EngineConfig> for HandleMetrics {
    fn from(config: &EngineConfig) -> Self {
        Self {
            margin: config.handle_margin,
            rotate_distance: config.rotate_handle_distance,
            radius: config.handle_radius,
        }
    }
}

impl HandleMetrics {
    /// The same metrics in world units at `zoom`. Non-positive zoom counts as 1.
    fn at_zoom(&self, zoom: f64) -> Self {
        let zoom = if zoom > 0.0 { zoom } else { 1.0 };
        Self {
            margin: self.margin / zoom,
            rotate_distance: self.rotate_distance / zoom,
            radius: self.radius / zoom,
        }
    }
}

/// Unrotated handle positions around a box, resize handles first.
fn box_handles(x: f64, y: f64, w: f64, h: f64, m: &HandleMetrics) -> Vec<Handle> {
    let (left, right) = (x - m.margin, x + w + m.margin);
    let (top, bottom) = (y - m.margin, y + h + m.margin);
    let (mid_x, mid_y) = (x + w / 2.0, y + h / 2.0);

    let mut handles: Vec<Handle> = ResizeHandle::ALL
        .iter()
        .map(|&handle| {
            let position = match handle {
                ResizeHandle::NW => Point::new(left, top),
                ResizeHandle::N => Point::new(mid_x, top),
                ResizeHandle::NE => Point::new(right, top),
                ResizeHandle::E => Point::new(right, mid_y),
                ResizeHandle::SE => Point::new(right, bottom),
                ResizeHandle::S => Point::new(mid_x, bottom),
                ResizeHandle::SW => Point::new(left, bottom),
                ResizeHandle::W => Point::new(left, mid_y),
            };
            Handle::new(position, HandleKind::Resize(handle))
        })
        .collect();
    handles.push(Handle::new(
        Point::new(mid_x, y - m.rotate_distance),
        HandleKind::Rotate,
    ));
    handles
}

/// Eight resize handles plus the rotate handle, turned with the element.
pub fn get_transform_handles(base: &ElementBase, zoom: f64, metrics: &HandleMetrics) -> Vec<Handle> {
    let m = metrics.at_zoom(zoom);
    let mut handles = box_handles(base.x, base.y, base.width, base.height, &m);
    if base.angle != 0.0 {
        let center = base.center();
        for handle in &mut handles {
            handle.position = rotate_point(handle.position, center, base.angle);
        }
    }
    handles
}

/// First handle of `base` within the pick radius of `point`.
pub fn handle_at(base: &ElementBase, point: Point, zoom: f64, metrics: &HandleMetrics) -> Option<Handle> {
    let radius = metrics.at_zoom(zoom).radius;
    get_transform_handles(base, zoom, metrics)
        .into_iter()
        .find(|h| h.hit_test(point, radius))
}

/// Handles around a multi-selection. Group boxes are never rotated.
pub fn get_group_transform_handles(bounds: &GroupBounds, zoom: f64, metrics: &HandleMetrics) -> Vec<Handle> {
    let m = metrics.at_zoom(zoom);
    let r = bounds.rect;
    box_handles(r.x0, r.y0, r.width(), r.height(), &m)
}

pub fn group_handle_at(bounds: &GroupBounds, point: Point, zoom: f64, metrics: &HandleMetrics) -> Option<Handle> {
    let radius = metrics.at_zoom(zoom).radius;
    get_group_transform_handles(bounds, zoom, metrics)
        .into_iter()
        .find(|h| h.hit_test(point, radius))
}

/// Pointer shape shown over a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorKind {
    NsResize,
    NeswResize,
    EwResize,
    NwseResize,
    Grab,
}

impl CursorKind {
    /// CSS cursor name.
    pub fn css_name(self) -> &'static str {
        match self {
            Self::NsResize => "ns-resize",
            Self::NeswResize => "nesw-resize",
            Self::EwResize => "ew-resize",
            Self::NwseResize => "nwse-resize",
            Self::Grab => "grab",
        }
    }
}

/// Resize cursor for a handle on an element turned by `angle` radians.
pub fn cursor_for_handle(kind: HandleKind, angle: f64) -> CursorKind {
    let HandleKind::Resize(handle) = kind else {
        return CursorKind::Grab;
    };
    let total = (handle.bearing() + angle.to_degrees()).rem_euclid(360.0);
    // Opposite bearings share a cursor; fold into [0, 180).
    match total.rem_euclid(180.0) {
        t if t < 22.5 || t >= 157.5 => CursorKind::NsResize,
        t if t < 67.5 => CursorKind::NeswResize,
        t if t < 112.5 => CursorKind::EwResize,
        _ => CursorKind::NwseResize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn find(handles: &[Handle], kind: HandleKind) -> Point {
        handles.iter().find(|h| h.kind == kind).unwrap().position
    }

    #[test]
    fn test_handle_positions() {
        let base = ElementBase::new(0.0, 0.0, 100.0, 50.0);
        let handles = get_transform_handles(&base, 1.0, &HandleMetrics::default());
        assert_eq!(handles.len(), 9);
        assert_eq!(find(&handles, HandleKind::Resize(ResizeHandle::NW)), Point::new(-10.0, -10.0));
        assert_eq!(find(&handles, HandleKind::Resize(ResizeHandle::E)), Point::new(110.0, 25.0));
        assert_eq!(find(&handles, HandleKind::Resize(ResizeHandle::S)), Point::new(50.0, 60.0));
        assert_eq!(find(&handles, HandleKind::Rotate), Point::new(50.0, -50.0));
    }

    #[test]
    fn test_handles_scale_with_zoom() {
        let base = ElementBase::new(0.0, 0.0, 100.0, 50.0);
        let handles = get_transform_handles(&base, 2.0, &HandleMetrics::default());
        assert_eq!(find(&handles, HandleKind::Resize(ResizeHandle::NW)), Point::new(-5.0, -5.0));
        assert_eq!(find(&handles, HandleKind::Rotate), Point::new(50.0, -25.0));
    }

    #[test]
    fn test_rotated_handles() {
        let mut base = ElementBase::new(0.0, 0.0, 100.0, 100.0);
        base.angle = FRAC_PI_2;
        let handles = get_transform_handles(&base, 1.0, &HandleMetrics::default());
        // A quarter turn brings the rotate handle to the right side.
        let rotate = find(&handles, HandleKind::Rotate);
        assert!((rotate.x - 150.0).abs() < EPS);
        assert!((rotate.y - 50.0).abs() < EPS);
    }

    #[test]
    fn test_handle_at() {
        let base = ElementBase::new(0.0, 0.0, 100.0, 50.0);
        let m = HandleMetrics::default();
        let hit = handle_at(&base, Point::new(113.0, 30.0), 1.0, &m);
        assert_eq!(hit.map(|h| h.kind), Some(HandleKind::Resize(ResizeHandle::E)));
        assert!(handle_at(&base, Point::new(50.0, 25.0), 1.0, &m).is_none());
        // At 4x zoom the pick radius shrinks to 2 world units.
        assert!(handle_at(&base, Point::new(106.0, 25.0), 4.0, &m).is_none());
    }

    #[test]
    fn test_group_handles() {
        let bounds = GroupBounds::new(Rect::new(0.0, 0.0, 200.0, 100.0));
        let m = HandleMetrics::default();
        let handles = get_group_transform_handles(&bounds, 1.0, &m);
        assert_eq!(handles.len(), 9);
        assert_eq!(find(&handles, HandleKind::Resize(ResizeHandle::SE)), Point::new(210.0, 110.0));
        let hit = group_handle_at(&bounds, Point::new(100.0, -48.0), 1.0, &m);
        assert_eq!(hit.map(|h| h.kind), Some(HandleKind::Rotate));
    }

    #[test]
    fn test_cursor_for_handle() {
        let n = HandleKind::Resize(ResizeHandle::N);
        assert_eq!(cursor_for_handle(n, 0.0), CursorKind::NsResize);
        assert_eq!(cursor_for_handle(n, FRAC_PI_2), CursorKind::EwResize);
        assert_eq!(cursor_for_handle(HandleKind::Resize(ResizeHandle::SE), 0.0), CursorKind::NwseResize);
        assert_eq!(cursor_for_handle(HandleKind::Resize(ResizeHandle::SW), 0.0), CursorKind::NeswResize);
        assert_eq!(cursor_for_handle(HandleKind::Resize(ResizeHandle::W), -FRAC_PI_2), CursorKind::NsResize);
        assert_eq!(cursor_for_handle(HandleKind::Rotate, 1.0), CursorKind::Grab);
        assert_eq!(CursorKind::Grab.css_name(), "grab");
    }
}
