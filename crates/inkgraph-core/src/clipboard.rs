//! Copy, paste and duplicate.

use crate::elements::{Element, ElementId, generate_seed};
use crate::scene::Scene;
use kurbo::{Point, Vec2};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Offset applied to pasted and duplicated elements.
pub const DUPLICATE_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

/// Clones of `ids` and all their descendants, depth-first, each once.
/// Unknown ids are skipped.
pub fn collect_with_children(ids: &[ElementId], scene: &Scene) -> Vec<Element> {
    fn visit(id: ElementId, scene: &Scene, seen: &mut HashSet<ElementId>, out: &mut Vec<Element>) {
        if !seen.insert(id) {
            return;
        }
        let Some(element) = scene.get(id) else {
            return;
        };
        out.push(element.clone());
        for &child in element.children_ids() {
            visit(child, scene, seen, out);
        }
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for &id in ids {
        visit(id, scene, &mut seen, &mut out);
    }
    out
}

/// Copies of `elements` with fresh ids and seeds, moved by `offset`.
///
/// References between copied elements (parent, children, bindings) point
/// at the new copies. References that leave the copied set are dropped.
pub fn duplicate_elements(elements: &[Element], offset: Vec2) -> Vec<Element> {
    let remap: HashMap<ElementId, ElementId> = elements
        .iter()
        .map(|el| (el.id(), Uuid::new_v4()))
        .collect();

    elements
        .iter()
        .map(|original| {
            let mut el = original.clone();
            let base = el.base_mut();
            base.id = remap.get(&original.id()).copied().unwrap_or_else(Uuid::new_v4);
            base.x += offset.x;
            base.y += offset.y;
            base.seed = generate_seed();
            base.parent_id = base.parent_id.and_then(|p| remap.get(&p).copied());

            match &mut el {
                Element::Rectangle(shape) | Element::Ellipse(shape) | Element::Line(shape) => {
                    shape.children_ids = shape
                        .children_ids
                        .iter()
                        .filter_map(|c| remap.get(c).copied())
                        .collect();
                }
                Element::Arrow(arrow) => {
                    for slot in [&mut arrow.start_binding, &mut arrow.end_binding] {
                        *slot = slot.take().and_then(|mut b| {
                            b.element_id = *remap.get(&b.element_id)?;
                            Some(b)
                        });
                    }
                }
                Element::Text(text) => {
                    text.binding = text.binding.take().and_then(|mut b| {
                        b.element_id = *remap.get(&b.element_id)?;
                        Some(b)
                    });
                }
            }
            el
        })
        .collect()
}

/// Center of the combined unrotated boxes of `elements`, or the origin
/// when empty.
pub fn center_point(elements: &[Element]) -> Point {
    elements
        .iter()
        .map(Element::rect)
        .reduce(|acc, r| acc.union(r))
        .map_or(Point::ZERO, |r| r.center())
}
