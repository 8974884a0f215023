//! Multi-selection transforms.
//!
//! Each function returns one [`ElementUpdate`] per input element. Pivots
//! are the group's combined box, never an element's own center.

use crate::elements::{Element, ElementUpdate};
use crate::geometry::rotate_point;
use kurbo::{Point, Rect};

/// Combined rotated box of a selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupBounds {
    pub rect: Rect,
    pub center: Point,
}

impl GroupBounds {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            center: rect.center(),
        }
    }
}

/// Union of the rotated boxes of `elements`. `None` for an empty slice.
pub fn group_bounds(elements: &[&Element]) -> Option<GroupBounds> {
    elements
        .iter()
        .map(|el| el.rotated_bounds())
        .reduce(|acc, r| acc.union(r))
        .map(GroupBounds::new)
}

/// Inclusive containment in the group box.
pub fn is_point_in_bounds(point: Point, bounds: &GroupBounds) -> bool {
    let r = bounds.rect;
    point.x >= r.x0 && point.x <= r.x1 && point.y >= r.y0 && point.y <= r.y1
}

pub fn translate_group(elements: &[&Element], dx: f64, dy: f64) -> Vec<ElementUpdate> {
    elements
        .iter()
        .map(|el| {
            let b = el.base();
            ElementUpdate::new(b.id).with_position(b.x + dx, b.y + dy)
        })
        .collect()
}

/// Scale every element's center about `origin`.
///
/// With `maintain_aspect_ratio` both factors become the smaller magnitude,
/// each keeping its own sign. Sizes scale by the factor magnitudes and are
/// floored at `min_size`, except for arrows whose box follows their points.
pub fn scale_group(
    elements: &[&Element],
    mut sx: f64,
    mut sy: f64,
    origin: Point,
    maintain_aspect_ratio: bool,
    min_size: f64,
) -> Vec<ElementUpdate> {
    if maintain_aspect_ratio {
        let uniform = sx.abs().min(sy.abs());
        sx = uniform.copysign(sx);
        sy = uniform.copysign(sy);
    }
    let (ax, ay) = (sx.abs(), sy.abs());

    elements
        .iter()
        .map(|el| {
            let b = el.base();
            let c = b.center();
            let center = Point::new(origin.x + (c.x - origin.x) * sx, origin.y + (c.y - origin.y) * sy);
            let (mut w, mut h) = (b.width * ax, b.height * ay);
            let mut update = ElementUpdate::new(b.id);
            if let Element::Arrow(arrow) = el {
                let points = arrow.points.iter().map(|p| Point::new(p.x * ax, p.y * ay)).collect();
                update = update.with_points(points);
            } else {
                w = w.max(min_size);
                h = h.max(min_size);
            }
            update
                .with_position(center.x - w / 2.0, center.y - h / 2.0)
                .with_size(w, h)
        })
        .collect()
}

/// Rotate every element around the group center by `delta`.
pub fn rotate_group(elements: &[&Element], bounds: &GroupBounds, delta: f64) -> Vec<ElementUpdate> {
    elements
        .iter()
        .map(|el| {
            let b = el.base();
            let moved = rotate_point(b.center(), bounds.center, delta);
            ElementUpdate::new(b.id)
                .with_position(moved.x - b.width / 2.0, moved.y - b.height / 2.0)
                .with_angle(b.angle + delta)
        })
        .collect()
}
