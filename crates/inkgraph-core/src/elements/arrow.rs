//! Arrow element: a polyline or quadratic curve through relative points.

use super::{ElementBase, ElementId};
use crate::geometry::{midpoint, normalize_vector, perpendicular};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Share of the arrow length used to offset a new control point.
const CONTROL_POINT_OFFSET_RATIO: f64 = 0.2;

/// Decoration at an arrow end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Arrowhead {
    Arrow,
    Bar,
    Dot,
    None,
}

/// Attachment of an arrow end to a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowBinding {
    pub element_id: ElementId,
    /// Angle around the target center, `focus * PI`, in [-1, 1].
    pub focus: f64,
    /// Clearance between the target surface and the endpoint.
    pub gap: f64,
    /// Correction captured at bind time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Vec2>,
}

fn default_start_arrowhead() -> Arrowhead {
    Arrowhead::None
}

fn default_end_arrowhead() -> Arrowhead {
    Arrowhead::Arrow
}

/// An arrow. Points are relative to `(base.x, base.y)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrow {
    #[serde(flatten)]
    pub base: ElementBase,
    pub points: Vec<Point>,
    #[serde(default = "default_start_arrowhead")]
    pub start_arrowhead: Arrowhead,
    #[serde(default = "default_end_arrowhead")]
    pub end_arrowhead: Arrowhead,
    #[serde(default)]
    pub start_binding: Option<ArrowBinding>,
    #[serde(default)]
    pub end_binding: Option<ArrowBinding>,
}

impl Arrow {
    /// Straight arrow from the box origin to its opposite corner.
    pub fn new(base: ElementBase) -> Self {
        let end = Point::new(base.width, base.height);
        Self {
            base,
            points: vec![Point::ZERO, end],
            start_arrowhead: default_start_arrowhead(),
            end_arrowhead: default_end_arrowhead(),
            start_binding: None,
            end_binding: None,
        }
    }

    fn origin(&self) -> Vec2 {
        Vec2::new(self.base.x, self.base.y)
    }

    /// Points in world coordinates.
    pub fn world_points(&self) -> Vec<Point> {
        let origin = self.origin();
        self.points.iter().map(|p| *p + origin).collect()
    }

    pub fn world_point(&self, index: usize) -> Option<Point> {
        self.points.get(index).map(|p| *p + self.origin())
    }

    pub fn start_point(&self) -> Option<Point> {
        self.world_point(0)
    }

    pub fn end_point(&self) -> Option<Point> {
        self.points.len().checked_sub(1).and_then(|i| self.world_point(i))
    }

    /// Move one point to a world position without touching the others.
    pub fn set_world_point(&mut self, index: usize, world: Point) -> bool {
        let origin = self.origin();
        match self.points.get_mut(index) {
            Some(p) => {
                *p = world - origin;
                true
            }
            None => false,
        }
    }

    /// Three or more points.
    pub fn is_curved(&self) -> bool {
        self.points.len() > 2
    }

    /// World-space box around the points (not the curve).
    pub fn bounding_box(&self) -> Rect {
        let mut points = self.world_points().into_iter();
        let Some(first) = points.next() else {
            return Rect::new(self.base.x, self.base.y, self.base.x, self.base.y);
        };
        points.fold(Rect::from_points(first, first), |acc, p| acc.union_pt(p))
    }

    /// Re-origin the points so the bounding box's top-left is `(x, y)`.
    /// World positions are preserved.
    pub fn normalize(&mut self) {
        if self.points.is_empty() {
            return;
        }
        let bbox = self.bounding_box();
        let shift = Vec2::new(bbox.x0 - self.base.x, bbox.y0 - self.base.y);
        for p in &mut self.points {
            *p -= shift;
        }
        self.base.x = bbox.x0;
        self.base.y = bbox.y0;
        self.base.width = bbox.width();
        self.base.height = bbox.height();
    }

    /// Stretch the points from their current box into `rect`, mirroring an
    /// axis when `flip_x` or `flip_y` is set. An axis with no extent keeps
    /// its world coordinates. The box then follows the points.
    pub fn fit_to_rect(&mut self, rect: Rect, flip_x: bool, flip_y: bool) {
        let bbox = self.bounding_box();
        let map = |v: f64, lo: f64, hi: f64, new_lo: f64, new_len: f64, flip: bool| {
            let len = hi - lo;
            if len <= f64::EPSILON {
                return v;
            }
            let t = if flip { (hi - v) / len } else { (v - lo) / len };
            new_lo + t * new_len
        };
        let world: Vec<Point> = self
            .world_points()
            .into_iter()
            .map(|p| {
                Point::new(
                    map(p.x, bbox.x0, bbox.x1, rect.x0, rect.width(), flip_x),
                    map(p.y, bbox.y0, bbox.y1, rect.y0, rect.height(), flip_y),
                )
            })
            .collect();
        let origin = self.origin();
        self.points = world.into_iter().map(|p| p - origin).collect();
        self.normalize();
    }

    /// Turn a straight arrow into a quadratic curve by inserting a control
    /// point at the midpoint, pushed sideways by a fifth of the length.
    /// Returns false for anything but a non-degenerate 2-point arrow.
    pub fn add_control_point(&mut self) -> bool {
        let &[start, end] = self.points.as_slice() else {
            return false;
        };
        let dir = end - start;
        let length = dir.hypot();
        if length < f64::EPSILON {
            return false;
        }
        let normal = perpendicular(normalize_vector(dir));
        let control = midpoint(start, end) + normal * (length * CONTROL_POINT_OFFSET_RATIO);
        self.points.insert(1, control);
        true
    }

    /// Remove an interior point. Endpoints are never removed.
    pub fn remove_control_point(&mut self, index: usize) -> bool {
        if self.points.len() <= 2 || index == 0 || index >= self.points.len() - 1 {
            return false;
        }
        self.points.remove(index);
        true
    }

    /// Bindings of both ends, in start/end order.
    pub fn bindings(&self) -> impl Iterator<Item = &ArrowBinding> {
        self.start_binding.iter().chain(self.end_binding.iter())
    }

    pub fn is_bound_to(&self, id: ElementId) -> bool {
        self.bindings().any(|b| b.element_id == id)
    }
}
