//! Handle-driven resizing.

use crate::elements::ElementBase;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// One of the eight resize handles, named by compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NW,
        ResizeHandle::N,
        ResizeHandle::NE,
        ResizeHandle::E,
        ResizeHandle::SE,
        ResizeHandle::S,
        ResizeHandle::SW,
        ResizeHandle::W,
    ];

    pub fn is_corner(self) -> bool {
        matches!(self, Self::NE | Self::SE | Self::SW | Self::NW)
    }

    /// Whether dragging this handle moves the left edge.
    pub fn moves_left(self) -> bool {
        matches!(self, Self::NW | Self::W | Self::SW)
    }

    /// Whether dragging this handle moves the top edge.
    pub fn moves_top(self) -> bool {
        matches!(self, Self::NW | Self::N | Self::NE)
    }

    /// Compass bearing in degrees, north = 0, clockwise.
    pub fn bearing(self) -> f64 {
        match self {
            Self::N => 0.0,
            Self::NE => 45.0,
            Self::E => 90.0,
            Self::SE => 135.0,
            Self::S => 180.0,
            Self::SW => 225.0,
            Self::W => 270.0,
            Self::NW => 315.0,
        }
    }
}

/// Undo the element's rotation on a world-space pointer delta.
pub(crate) fn local_delta(start: Point, current: Point, angle: f64) -> Vec2 {
    let d = current - start;
    if angle == 0.0 {
        return d;
    }
    let (sin, cos) = (-angle).sin_cos();
    Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// New box for `base` after dragging `handle` from `start` to `current`.
///
/// Negative extents flip the box about the fixed edge. With
/// `maintain_aspect_ratio`, corner handles keep the original ratio. The
/// `min_size` floor applies last and leaves the origin where it is.
pub fn resize(
    base: &ElementBase,
    handle: ResizeHandle,
    start: Point,
    current: Point,
    maintain_aspect_ratio: bool,
    min_size: f64,
) -> Rect {
    let ElementBase { x, y, width, height, .. } = *base;
    let d = local_delta(start, current, base.angle);

    let (mut nx, mut ny, mut nw, mut nh) = (x, y, width, height);
    if handle.moves_left() {
        nx = x + d.x;
        nw = width - d.x;
    } else if matches!(handle, ResizeHandle::NE | ResizeHandle::E | ResizeHandle::SE) {
        nw = width + d.x;
    }
    if handle.moves_top() {
        ny = y + d.y;
        nh = height - d.y;
    } else if matches!(handle, ResizeHandle::SW | ResizeHandle::S | ResizeHandle::SE) {
        nh = height + d.y;
    }

    if maintain_aspect_ratio && handle.is_corner() && width > 0.0 && height > 0.0 {
        let ratio = width / height;
        if (nw / nh).abs() > ratio {
            let adjusted = nh.abs() * ratio;
            if handle.moves_left() {
                nx = x + width - adjusted;
            }
            nw = adjusted.copysign(nw);
        } else {
            let adjusted = nw.abs() / ratio;
            if handle.moves_top() {
                ny = y + height - adjusted;
            }
            nh = adjusted.copysign(nh);
        }
    }

    if nw < 0.0 {
        nx += nw;
        nw = -nw;
    }
    if nh < 0.0 {
        ny += nh;
        nh = -nh;
    }
    nw = nw.max(min_size);
    nh = nh.max(min_size);

    Rect::new(nx, ny, nx + nw, ny + nh)
}

/// Whether dragging `handle` from `start` to `current` pushes the moving
/// edge past the fixed one, per axis. [`resize`] mirrors the box in that
/// case; content laid out inside the box mirrors with it.
pub fn resize_flips(base: &ElementBase, handle: ResizeHandle, start: Point, current: Point) -> (bool, bool) {
    let d = local_delta(start, current, base.angle);
    let flip_x = if handle.moves_left() {
        base.width - d.x < 0.0
    } else if matches!(handle, ResizeHandle::NE | ResizeHandle::E | ResizeHandle::SE) {
        base.width + d.x < 0.0
    } else {
        false
    };
    let flip_y = if handle.moves_top() {
        base.height - d.y < 0.0
    } else if matches!(handle, ResizeHandle::SW | ResizeHandle::S | ResizeHandle::SE) {
        base.height + d.y < 0.0
    } else {
        false
    };
    (flip_x, flip_y)
}
