//! Arrow end bindings.

use crate::elements::{Arrow, ArrowBinding, Element, ShapeKind};
use crate::scene::Scene;
use kurbo::Point;
use std::f64::consts::PI;

/// Bind `point` to `target`. `None` unless the target is a shape.
///
/// With `preserve_exact`, the binding records the offset that makes
/// [`resolve_binding_point`] reproduce `point` at bind time.
pub fn compute_binding(
    point: Point,
    target: &Element,
    gap: f64,
    preserve_exact: bool,
) -> Option<ArrowBinding> {
    let shape = target.as_shape()?;
    let center = shape.base.center();
    let focus = (point.y - center.y).atan2(point.x - center.x) / PI;

    let mut binding = ArrowBinding {
        element_id: target.id(),
        focus,
        gap,
        offset: None,
    };
    if preserve_exact {
        let anchor = resolve_binding_point(&binding, target)?;
        binding.offset = Some(point - anchor);
    }
    Some(binding)
}

/// Anchor point of `binding` on `target`. `None` unless the target is a shape.
///
/// Ellipses use the parametric perimeter point; other shapes clamp it to
/// the box. The gap pushes outward along the focus angle, then the stored
/// offset is added.
pub fn resolve_binding_point(binding: &ArrowBinding, target: &Element) -> Option<Point> {
    let kind = target.shape_kind()?;
    let base = target.base();
    let center = base.center();
    let angle = binding.focus * PI;
    let (sin, cos) = angle.sin_cos();

    let mut px = center.x + base.width / 2.0 * cos;
    let mut py = center.y + base.height / 2.0 * sin;
    if kind != ShapeKind::Ellipse {
        px = px.max(base.x).min(base.x + base.width);
        py = py.max(base.y).min(base.y + base.height);
    }

    let mut point = Point::new(px + binding.gap * cos, py + binding.gap * sin);
    if let Some(offset) = binding.offset {
        point += offset;
    }
    Some(point)
}

/// Move the ends of `arrow` bound to `target` onto their anchors.
pub(super) fn follow_target(arrow: &mut Arrow, target: &Element) -> bool {
    let id = target.id();
    let mut moved = false;

    if let Some(binding) = arrow.start_binding.as_ref().filter(|b| b.element_id == id) {
        if let Some(anchor) = resolve_binding_point(binding, target) {
            moved |= arrow.set_world_point(0, anchor);
        }
    }
    if let Some(binding) = arrow.end_binding.as_ref().filter(|b| b.element_id == id) {
        if let Some(anchor) = resolve_binding_point(binding, target) {
            let last = arrow.points.len().saturating_sub(1);
            moved |= arrow.set_world_point(last, anchor);
        }
    }
    if moved {
        arrow.normalize();
    }
    moved
}

/// Rebind both ends from the arrow's current endpoints, keeping each
/// binding's gap. Ends whose target is gone or not a shape are left alone.
pub fn recalculate_arrow_offsets(arrow: &mut Arrow, scene: &Scene) -> bool {
    let rebind = |binding: Option<&ArrowBinding>, point: Option<Point>| {
        let (binding, point) = binding.zip(point)?;
        let target = scene.get(binding.element_id)?;
        compute_binding(point, target, binding.gap, true)
    };
    let start = rebind(arrow.start_binding.as_ref(), arrow.start_point());
    let end = rebind(arrow.end_binding.as_ref(), arrow.end_point());

    let changed = start.is_some() || end.is_some();
    if start.is_some() {
        arrow.start_binding = start;
    }
    if end.is_some() {
        arrow.end_binding = end;
    }
    changed
}
