//! Text-to-shape bindings.

use crate::elements::{Element, Text, TextBinding, TextPosition};
use crate::measure::TextMeasurer;
use crate::scene::Scene;
use kurbo::{Point, Size};

/// Bind a text block whose top-left is `point` to `target`.
///
/// The side is picked from where `point` lies relative to the target
/// center: the central quarter box maps to `Center`, otherwise the
/// dominant axis decides.
pub fn compute_text_binding(
    point: Point,
    target: &Element,
    text_size: Size,
    gap: f64,
    preserve_exact: bool,
) -> Option<TextBinding> {
    let shape = target.as_shape()?;
    let base = &shape.base;
    let center = base.center();
    let dx = point.x - center.x;
    let dy = point.y - center.y;

    let position = if dx.abs() < base.width / 4.0 && dy.abs() < base.height / 4.0 {
        TextPosition::Center
    } else if dx.abs() > dy.abs() {
        if dx > 0.0 { TextPosition::Right } else { TextPosition::Left }
    } else if dy > 0.0 {
        TextPosition::Bottom
    } else {
        TextPosition::Top
    };

    let mut binding = TextBinding {
        element_id: target.id(),
        position,
        offset: None,
    };
    if preserve_exact {
        let anchor = resolve_text_binding_position(&binding, target, text_size, gap)?;
        binding.offset = Some(point - anchor);
    }
    Some(binding)
}

/// Top-left of a bound text block of `text_size` next to `target`.
pub fn resolve_text_binding_position(
    binding: &TextBinding,
    target: &Element,
    text_size: Size,
    gap: f64,
) -> Option<Point> {
    let base = &target.as_shape()?.base;
    let (x, y, w, h) = (base.x, base.y, base.width, base.height);
    let (tw, th) = (text_size.width, text_size.height);

    let mut point = match binding.position {
        TextPosition::Top => Point::new(x + w / 2.0 - tw / 2.0, y - th - gap),
        TextPosition::Bottom => Point::new(x + w / 2.0 - tw / 2.0, y + h + gap),
        TextPosition::Left => Point::new(x - tw - gap, y + h / 2.0 - th / 2.0),
        TextPosition::Right => Point::new(x + w + gap, y + h / 2.0 - th / 2.0),
        TextPosition::Center => Point::new(x + w / 2.0 - tw / 2.0, y + h / 2.0 - th / 2.0),
    };
    if let Some(offset) = binding.offset {
        point += offset;
    }
    Some(point)
}

/// A missing binding is valid; a present one must name an existing shape.
pub fn is_text_binding_valid(text: &Text, scene: &Scene) -> bool {
    match &text.binding {
        None => true,
        Some(binding) => scene.get(binding.element_id).is_some_and(Element::is_shape),
    }
}

fn measured(text: &Text, measurer: &dyn TextMeasurer) -> Size {
    measurer.measure(&text.text, text.font_size, &text.font_family)
}

/// Reposition `text` next to its target.
pub(super) fn follow_target(
    text: &mut Text,
    target: &Element,
    gap: f64,
    measurer: &dyn TextMeasurer,
) -> bool {
    let Some(binding) = text.binding.as_ref().filter(|b| b.element_id == target.id()) else {
        return false;
    };
    let size = measured(text, measurer);
    let Some(position) = resolve_text_binding_position(binding, target, size, gap) else {
        return false;
    };
    text.base.x = position.x;
    text.base.y = position.y;
    true
}

/// Keep the bound side but recompute the offset so the binding reproduces
/// the text's current position.
pub fn recalculate_text_offset(
    text: &mut Text,
    target: &Element,
    gap: f64,
    measurer: &dyn TextMeasurer,
) -> bool {
    let Some(binding) = text.binding.as_ref() else {
        return false;
    };
    let bare = TextBinding {
        offset: None,
        ..binding.clone()
    };
    let size = measured(text, measurer);
    let Some(anchor) = resolve_text_binding_position(&bare, target, size, gap) else {
        return false;
    };
    let offset = Point::new(text.base.x, text.base.y) - anchor;
    text.binding = Some(TextBinding {
        offset: Some(offset),
        ..bare
    });
    true
}
