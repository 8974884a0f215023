//! Stateless geometry helpers shared by every subsystem.
//!
//! Nothing in here fails: degenerate inputs (zero-length segments, empty
//! boxes) produce a neutral result instead.

use crate::elements::Element;
use kurbo::{Point, Rect, Vec2};

/// Default number of segments used to approximate a quadratic curve.
pub const DEFAULT_BEZIER_SAMPLES: usize = 20;

/// Rotate `point` around `center` by `angle` radians.
pub fn rotate_point(point: Point, center: Point, angle: f64) -> Point {
    if angle == 0.0 {
        return point;
    }
    let (sin, cos) = angle.sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(
        center.x + dx * cos - dy * sin,
        center.y + dx * sin + dy * cos,
    )
}

/// Axis-aligned box enclosing a `w`×`h` box at `(x, y)` rotated by `angle`
/// around its center.
pub fn rotated_bounding_box(x: f64, y: f64, w: f64, h: f64, angle: f64) -> Rect {
    if angle == 0.0 {
        return Rect::new(x, y, x + w, y + h);
    }
    let center = Point::new(x + w / 2.0, y + h / 2.0);
    let corners = [
        Point::new(x, y),
        Point::new(x + w, y),
        Point::new(x + w, y + h),
        Point::new(x, y + h),
    ];

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for corner in corners {
        let p = rotate_point(corner, center, angle);
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Rect::new(min_x, min_y, max_x, max_y)
}

/// Point on a quadratic Bézier curve at parameter `t`.
pub fn quadratic_bezier_point(start: Point, control: Point, end: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    Point::new(
        mt * mt * start.x + 2.0 * mt * t * control.x + t * t * end.x,
        mt * mt * start.y + 2.0 * mt * t * control.y + t * t * end.y,
    )
}

/// Sample a quadratic curve into `segments + 1` evenly spaced points.
pub fn sample_quadratic_bezier(
    start: Point,
    control: Point,
    end: Point,
    segments: usize,
) -> Vec<Point> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| quadratic_bezier_point(start, control, end, i as f64 / segments as f64))
        .collect()
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).hypot()
}

/// Distance from a point to a line segment (a→b).
///
/// Collapses to the point distance when the segment has no length.
pub fn distance_point_to_segment(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    distance(point, a + seg * t)
}

/// Distance from a point to a quadratic curve, approximated by sampling.
pub fn distance_point_to_bezier(
    point: Point,
    start: Point,
    control: Point,
    end: Point,
    samples: usize,
) -> f64 {
    distance_point_to_polyline(point, &sample_quadratic_bezier(start, control, end, samples))
}

/// Minimum distance from a point to a polyline.
pub fn distance_point_to_polyline(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => 0.0,
        [only] => distance(point, *only),
        _ => points
            .windows(2)
            .map(|w| distance_point_to_segment(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub fn lerp_point(a: Point, b: Point, t: f64) -> Point {
    Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

pub fn midpoint(a: Point, b: Point) -> Point {
    lerp_point(a, b, 0.5)
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Unit vector in the direction of `v`, or zero for a zero vector.
pub fn normalize_vector(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len < f64::EPSILON {
        Vec2::ZERO
    } else {
        v / len
    }
}

/// `v` rotated by 90° counter-clockwise in screen space.
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Angle of the vector from `from` to `to`, in radians.
pub fn angle_between_points(from: Point, to: Point) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

pub fn snap_to_grid(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

pub fn snap_point_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(
        snap_to_grid(point.x, grid_size),
        snap_to_grid(point.y, grid_size),
    )
}

/// Inclusive box containment.
pub fn is_point_in_rect(point: Point, rect: Rect) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Containment in the ellipse inscribed in `rect`.
pub fn is_point_in_ellipse(point: Point, rect: Rect) -> bool {
    let rx = rect.width() / 2.0;
    let ry = rect.height() / 2.0;
    if rx.abs() < f64::EPSILON || ry.abs() < f64::EPSILON {
        return false;
    }
    let center = rect.center();
    let nx = (point.x - center.x) / rx;
    let ny = (point.y - center.y) / ry;
    nx * nx + ny * ny <= 1.0
}

/// Union of the rotated bounding boxes of `elements`.
pub fn elements_bounds<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Option<Rect> {
    elements
        .into_iter()
        .map(Element::rotated_bounds)
        .reduce(|acc, r| acc.union(r))
}
