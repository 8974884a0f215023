//! Resizing text by scaling its font.
//!
//! Text never stretches. A handle drag is turned into a uniform scale of
//! the font size, the block is re-measured, and the side opposite the
//! dragged handle stays put.

use super::resize::ResizeHandle;
use crate::elements::Text;
use crate::geometry::rotate_point;
use crate::measure::{TextMeasurer, text_dimensions};
use kurbo::{Point, Vec2};

/// Smallest font size a scale can produce.
pub const MIN_FONT_SIZE: f64 = 8.0;

/// Smallest uniform scale factor.
pub const MIN_TEXT_SCALE: f64 = 0.1;

/// Geometry and font size of a scaled text block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextScale {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
}

fn axis_scale(delta: f64, extent: f64, grows_positive: bool) -> f64 {
    if extent <= 0.0 {
        return 1.0;
    }
    if grows_positive { 1.0 + delta / extent } else { 1.0 - delta / extent }
}

/// Scale `text` by dragging `handle` from `start` to `current`.
pub fn scale_text(
    text: &Text,
    handle: ResizeHandle,
    start: Point,
    current: Point,
    measurer: &dyn TextMeasurer,
) -> TextScale {
    let b = &text.base;
    let center = b.center();
    let unrotate = |p: Point| if b.angle == 0.0 { p } else { rotate_point(p, center, -b.angle) };
    let d: Vec2 = unrotate(current) - unrotate(start);

    let sx = axis_scale(d.x, b.width, !handle.moves_left());
    let sy = axis_scale(d.y, b.height, !handle.moves_top());
    let (sx, sy) = match handle {
        ResizeHandle::N | ResizeHandle::S => (sy, sy),
        ResizeHandle::E | ResizeHandle::W => (sx, sx),
        _ => (sx, sy),
    };

    let scale = sx.abs().min(sy.abs()).max(MIN_TEXT_SCALE);
    let font_size = (text.font_size * scale).round().max(MIN_FONT_SIZE);
    let size = text_dimensions(&text.text, font_size, &text.font_family, measurer);

    let dw = b.width - size.width;
    let dh = b.height - size.height;
    let x = match handle {
        ResizeHandle::NW | ResizeHandle::SW | ResizeHandle::W => b.x + dw,
        ResizeHandle::N | ResizeHandle::S => b.x + dw / 2.0,
        _ => b.x,
    };
    let y = match handle {
        ResizeHandle::NW | ResizeHandle::N | ResizeHandle::NE => b.y + dh,
        ResizeHandle::E | ResizeHandle::W => b.y + dh / 2.0,
        _ => b.y,
    };

    let (x, y) = if b.angle == 0.0 {
        (x, y)
    } else {
        let new_center = Point::new(x + size.width / 2.0, y + size.height / 2.0);
        let turned = rotate_point(new_center, center, b.angle);
        (turned.x - size.width / 2.0, turned.y - size.height / 2.0)
    };

    TextScale {
        x,
        y,
        width: size.width,
        height: size.height,
        font_size,
    }
}
