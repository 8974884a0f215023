//! Overlap-driven container detection.

use crate::elements::{Element, ElementId};
use crate::scene::Scene;

/// Only shapes can hold or become children.
pub fn is_container_candidate(element: &Element) -> bool {
    element.is_shape()
}

/// Share of `child`'s area that lies inside `parent`, in [0, 1].
///
/// An expanded child container is judged on its pre-expansion size.
pub fn overlap_percentage(child: &Element, parent: &Element) -> f64 {
    let c = child.natural_rect();
    let p = parent.rect();

    let left = c.x0.max(p.x0);
    let right = c.x1.min(p.x1);
    let top = c.y0.max(p.y0);
    let bottom = c.y1.min(p.y1);
    if left >= right || top >= bottom {
        return 0.0;
    }

    let child_area = c.width() * c.height();
    if child_area <= 0.0 {
        return 0.0;
    }
    (right - left) * (bottom - top) / child_area
}

/// Whether `element` belongs in `container`: already its child, or
/// overlapping it by at least `threshold`.
pub fn should_become_child(element: &Element, container: &Element, threshold: f64) -> bool {
    if !is_container_candidate(element) || !is_container_candidate(container) {
        return false;
    }
    if element.id() == container.id() {
        return false;
    }
    if element.parent_id() == Some(container.id()) {
        return true;
    }
    overlap_percentage(element, container) >= threshold
}

/// Smallest container `element` should join, skipping `exclude`.
/// Ties keep the earliest candidate in draw order.
pub fn find_potential_container<'a>(
    element: &Element,
    scene: &'a Scene,
    exclude: &[ElementId],
    threshold: f64,
) -> Option<&'a Element> {
    if !is_container_candidate(element) {
        return None;
    }

    let mut best: Option<&Element> = None;
    let mut smallest_area = f64::INFINITY;
    for candidate in scene.ordered() {
        if candidate.id() == element.id() || exclude.contains(&candidate.id()) {
            continue;
        }
        if !should_become_child(element, candidate, threshold) {
            continue;
        }
        let area = candidate.base().area();
        if area < smallest_area {
            smallest_area = area;
            best = Some(candidate);
        }
    }
    best
}

/// Whether `element` has drifted out of `container`.
pub fn should_detach(element: &Element, container: &Element, threshold: f64) -> bool {
    overlap_percentage(element, container) < threshold
}
