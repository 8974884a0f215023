//! Rotation from the rotate handle.

use crate::elements::ElementBase;
use kurbo::Point;
use std::f64::consts::FRAC_PI_2;

/// Step used while Shift is held.
pub const SNAP_INCREMENT_DEG: f64 = 15.0;

/// Distance from a right angle within which free rotation snaps to it.
pub const MAGNET_TOLERANCE_DEG: f64 = 5.0;

/// Angle that points the element's top at `pointer`.
///
/// The rotate handle sits above the element, so zero means "up".
pub fn rotation_angle(base: &ElementBase, pointer: Point) -> f64 {
    let center = base.center();
    (pointer.y - center.y).atan2(pointer.x - center.x) + FRAC_PI_2
}

/// Snap with the default increment and tolerance.
pub fn snap_rotation(angle: f64, shift_held: bool) -> f64 {
    snap_rotation_with(angle, shift_held, SNAP_INCREMENT_DEG, MAGNET_TOLERANCE_DEG)
}

/// Shift snaps to `increment_deg` steps. Otherwise the angle is free,
/// except within `tolerance_deg` of a multiple of 90 degrees where it
/// lands exactly on that multiple.
pub fn snap_rotation_with(angle: f64, shift_held: bool, increment_deg: f64, tolerance_deg: f64) -> f64 {
    if shift_held {
        let step = increment_deg.to_radians();
        if step <= 0.0 {
            return angle;
        }
        return (angle / step).round() * step;
    }

    let nearest = (angle / FRAC_PI_2).round() * FRAC_PI_2;
    if (angle - nearest).abs() <= tolerance_deg.to_radians() {
        nearest
    } else {
        angle
    }
}
