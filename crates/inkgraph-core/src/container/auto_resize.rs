//! Auto-expand and auto-shrink of containers around their children.

use super::detection::should_detach;
use super::hierarchy::detach;
use crate::elements::{Element, ElementId, ElementUpdate, Shape};
use crate::scene::Scene;
use kurbo::Rect;

/// Padded box enclosing every child. Without children, the container's
/// natural box.
pub fn calculate_required_bounds(container: &Shape, children: &[&Element], padding: f64) -> Rect {
    let base = &container.base;
    let Some(union) = children.iter().map(|c| c.rect()).reduce(|a, b| a.union(b)) else {
        let size = container.natural_size();
        return Rect::new(base.x, base.y, base.x + size.width, base.y + size.height);
    };
    union.inflate(padding, padding)
}

/// Grow the container to the union of its box and `required`.
///
/// Returns an empty update when `required` already fits. The pre-expansion
/// size is recorded on first growth.
pub fn expand_container(container: &Shape, required: Rect) -> ElementUpdate {
    let base = &container.base;
    let current = base.rect();
    let update = ElementUpdate::new(base.id);

    let fits = required.x0 >= current.x0
        && required.y0 >= current.y0
        && required.x1 <= current.x1
        && required.y1 <= current.y1;
    if fits {
        return update;
    }

    let grown = current.union(required);
    let original = container.original_bounds.unwrap_or_else(|| base.size());
    update
        .with_position(grown.x0, grown.y0)
        .with_size(grown.width(), grown.height())
        .with_expansion(true, Some(original))
}

/// Restore the pre-expansion size. Empty update if never expanded.
pub fn shrink_container(container: &Shape) -> ElementUpdate {
    let update = ElementUpdate::new(container.base.id);
    match container.original_bounds {
        Some(size) => update
            .with_size(size.width, size.height)
            .with_expansion(false, None),
        None if container.is_expanded => update.with_expansion(false, None),
        None => update,
    }
}

/// Re-derive a container's bounds after its children changed.
///
/// Children that drifted out are detached first; then the container expands
/// around the remaining children or shrinks back once none are left.
/// Returns true if anything changed.
pub fn update_container_bounds(
    container_id: ElementId,
    scene: &mut Scene,
    padding: f64,
    threshold: f64,
) -> bool {
    let Some(container) = scene.get(container_id).filter(|c| c.is_shape()) else {
        return false;
    };

    let drifted: Vec<ElementId> = container
        .children_ids()
        .iter()
        .filter_map(|id| scene.get(*id))
        .filter(|child| child.parent_id() == Some(container_id))
        .filter(|child| should_detach(child, container, threshold))
        .map(Element::id)
        .collect();
    let mut changed = false;
    for id in drifted {
        changed |= detach(id, scene).is_some();
    }

    let Some(shape) = scene.get(container_id).and_then(Element::as_shape) else {
        return changed;
    };
    let children: Vec<&Element> = shape
        .children_ids
        .iter()
        .filter_map(|id| scene.get(*id))
        .filter(|child| child.parent_id() == Some(container_id))
        .collect();

    let update = if children.is_empty() {
        if !shape.is_expanded {
            return changed;
        }
        log::debug!("Shrinking container {container_id}");
        shrink_container(shape)
    } else {
        let required = calculate_required_bounds(shape, &children, padding);
        let update = expand_container(shape, required);
        if !update.is_empty() {
            log::debug!("Expanding container {container_id} to {required:?}");
        }
        update
    };
    scene.apply_update(&update) || changed
}
