//! Point handles for arrows and lines.

use super::handles::HandleMetrics;
use crate::elements::{Arrow, ElementBase};
use kurbo::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointHandleKind {
    Start,
    End,
    /// Interior arrow point.
    Mid,
}

/// A draggable point with its world position and index into the arrow's
/// points (0 and 1 for line ends).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointHandle {
    pub kind: PointHandleKind,
    pub index: usize,
    pub position: Point,
}

fn pick(handles: Vec<PointHandle>, point: Point, zoom: f64, metrics: &HandleMetrics) -> Option<PointHandle> {
    let zoom = if zoom > 0.0 { zoom } else { 1.0 };
    let radius = metrics.radius / zoom;
    handles
        .into_iter()
        .find(|h| (point - h.position).hypot2() <= radius * radius)
}

/// Start, end, then one `Mid` handle per interior point.
pub fn arrow_handles(arrow: &Arrow) -> Vec<PointHandle> {
    let points = arrow.world_points();
    let Some(last) = points.len().checked_sub(1) else {
        return Vec::new();
    };
    let mut handles = vec![
        PointHandle { kind: PointHandleKind::Start, index: 0, position: points[0] },
        PointHandle { kind: PointHandleKind::End, index: last, position: points[last] },
    ];
    handles.extend((1..last).map(|i| PointHandle {
        kind: PointHandleKind::Mid,
        index: i,
        position: points[i],
    }));
    handles
}

pub fn arrow_handle_at(arrow: &Arrow, point: Point, zoom: f64, metrics: &HandleMetrics) -> Option<PointHandle> {
    pick(arrow_handles(arrow), point, zoom, metrics)
}

/// A line runs from its origin to the far corner of its box.
pub fn line_handles(base: &ElementBase) -> Vec<PointHandle> {
    vec![
        PointHandle {
            kind: PointHandleKind::Start,
            index: 0,
            position: Point::new(base.x, base.y),
        },
        PointHandle {
            kind: PointHandleKind::End,
            index: 1,
            position: Point::new(base.x + base.width, base.y + base.height),
        },
    ]
}

pub fn line_handle_at(base: &ElementBase, point: Point, zoom: f64, metrics: &HandleMetrics) -> Option<PointHandle> {
    pick(line_handles(base), point, zoom, metrics)
}

/// Drag one arrow point to `world` and re-normalize the box.
pub fn move_arrow_point(arrow: &mut Arrow, index: usize, world: Point) -> bool {
    if !arrow.set_world_point(index, world) {
        return false;
    }
    arrow.normalize();
    true
}
