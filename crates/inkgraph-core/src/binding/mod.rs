//! Arrow and text attachment to shapes.
//!
//! A binding stores where on its target an arrow end or text block sits,
//! as an angle (`focus`) or a side (`position`), plus the pixel offset the
//! user established when binding. When the target moves, the bound
//! elements are re-derived from it.

mod arrow;
mod text;

pub use arrow::{compute_binding, recalculate_arrow_offsets, resolve_binding_point};
pub use text::{
    compute_text_binding, is_text_binding_valid, recalculate_text_offset,
    resolve_text_binding_position,
};

use crate::elements::{Element, ElementId};
use crate::geometry::is_point_in_rect;
use crate::measure::TextMeasurer;
use crate::scene::Scene;
use kurbo::Point;

/// Distance from a shape within which a point can bind to it.
pub const BINDING_THRESHOLD: f64 = 20.0;

/// Clearance between an arrow end and the shape surface.
pub const BINDING_GAP: f64 = 10.0;

/// Clearance between bound text and the shape box.
pub const TEXT_BINDING_GAP: f64 = 10.0;

/// Whether `id` names an element that can be bound to.
pub fn is_valid_bind_target(scene: &Scene, id: ElementId) -> bool {
    scene.get(id).is_some_and(Element::is_shape)
}

/// Topmost shape whose box, inflated by `threshold`, contains `point`.
pub fn find_bind_target<'a>(
    scene: &'a Scene,
    point: Point,
    exclude: Option<ElementId>,
    threshold: f64,
) -> Option<&'a Element> {
    let found = scene.ordered().rev().find(|el| {
        el.is_shape()
            && Some(el.id()) != exclude
            && is_point_in_rect(point, el.rect().inflate(threshold, threshold))
    });
    if let Some(el) = found {
        log::trace!("Bind target at {point:?}: {}", el.id());
    }
    found
}

/// Re-derive every arrow end and text block bound to `moved_id`.
/// Returns the ids of the elements that changed.
pub fn propagate_binding_update(
    scene: &mut Scene,
    moved_id: ElementId,
    text_gap: f64,
    measurer: &dyn TextMeasurer,
) -> Vec<ElementId> {
    let Some(target) = scene.get(moved_id).filter(|el| el.is_shape()).cloned() else {
        return Vec::new();
    };

    let dependents: Vec<ElementId> = scene
        .ordered()
        .filter(|el| match el {
            Element::Arrow(a) => a.is_bound_to(moved_id),
            Element::Text(t) => t.binding.as_ref().is_some_and(|b| b.element_id == moved_id),
            _ => false,
        })
        .map(Element::id)
        .collect();

    let mut changed = Vec::new();
    for id in dependents {
        let Some(element) = scene.get_mut(id) else {
            continue;
        };
        if element.is_locked() {
            continue;
        }
        let updated = match element {
            Element::Arrow(arrow) => arrow::follow_target(arrow, &target),
            Element::Text(text) => text::follow_target(text, &target, text_gap, measurer),
            _ => false,
        };
        if updated {
            changed.push(id);
        }
    }
    changed
}

/// Refresh the binding offsets of a bound arrow or text that was dragged
/// directly, so its current position is what the binding reproduces.
pub fn recalculate_offsets_on_manual_move(
    scene: &mut Scene,
    id: ElementId,
    text_gap: f64,
    measurer: &dyn TextMeasurer,
) -> bool {
    let Some(element) = scene.get(id).cloned() else {
        return false;
    };
    match element {
        Element::Arrow(mut arrow) => {
            if !recalculate_arrow_offsets(&mut arrow, scene) {
                return false;
            }
            if let Some(slot) = scene.get_mut(id) {
                *slot = Element::Arrow(arrow);
            }
            true
        }
        Element::Text(mut text) => {
            let Some(target) = text.binding.as_ref().and_then(|b| scene.get(b.element_id)) else {
                return false;
            };
            if !recalculate_text_offset(&mut text, target, text_gap, measurer) {
                return false;
            }
            if let Some(slot) = scene.get_mut(id) {
                *slot = Element::Text(text);
            }
            true
        }
        _ => false,
    }
}
