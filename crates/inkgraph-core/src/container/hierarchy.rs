//! Reciprocal parent/child links and drag-time containment probing.

use super::detection::{find_potential_container, should_detach};
use super::layering::ensure_children_after_parent;
use crate::elements::ElementId;
use crate::scene::Scene;
use std::collections::{HashSet, VecDeque};

/// Every transitive child of `id`, breadth first. Cycles are cut.
pub fn all_descendants(id: ElementId, scene: &Scene) -> Vec<ElementId> {
    let Some(root) = scene.get(id) else {
        return Vec::new();
    };

    let mut seen = HashSet::from([id]);
    let mut out = Vec::new();
    let mut queue: VecDeque<ElementId> = root.children_ids().iter().copied().collect();
    while let Some(child) = queue.pop_front() {
        if !seen.insert(child) {
            continue;
        }
        out.push(child);
        if let Some(element) = scene.get(child) {
            queue.extend(element.children_ids().iter().copied());
        }
    }
    out
}

/// Parent chain of `id`, nearest first. Stops at missing parents and cycles.
pub fn ancestors(id: ElementId, scene: &Scene) -> Vec<ElementId> {
    let mut out = Vec::new();
    let mut seen = HashSet::from([id]);
    let mut current = scene.get(id).and_then(|el| el.parent_id());
    while let Some(parent) = current {
        if !seen.insert(parent) {
            break;
        }
        out.push(parent);
        current = scene.get(parent).and_then(|el| el.parent_id());
    }
    out
}

/// Make `child_id` a child of `parent_id`, leaving any previous parent.
///
/// Refused when either id is missing, the parent is not a shape, or the
/// link would create a cycle.
pub fn attach(child_id: ElementId, parent_id: ElementId, scene: &mut Scene) -> bool {
    if child_id == parent_id || !scene.contains(child_id) {
        return false;
    }
    if !scene.get(parent_id).is_some_and(|p| p.is_shape()) {
        return false;
    }
    if all_descendants(child_id, scene).contains(&parent_id) {
        log::warn!("Refusing to attach {child_id} to its own descendant {parent_id}");
        return false;
    }

    if scene.get(child_id).and_then(|c| c.parent_id()).is_some() {
        detach(child_id, scene);
    }
    if let Some(child) = scene.get_mut(child_id) {
        child.base_mut().parent_id = Some(parent_id);
    }
    if let Some(shape) = scene.get_mut(parent_id).and_then(|p| p.as_shape_mut()) {
        if !shape.children_ids.contains(&child_id) {
            shape.children_ids.push(child_id);
        }
    }
    ensure_children_after_parent(parent_id, scene);
    log::debug!("Attached {child_id} to container {parent_id}");
    true
}

/// Remove `child_id` from its parent. Returns the former parent.
pub fn detach(child_id: ElementId, scene: &mut Scene) -> Option<ElementId> {
    let parent_id = scene.get(child_id)?.parent_id()?;
    if let Some(child) = scene.get_mut(child_id) {
        child.base_mut().parent_id = None;
    }
    if let Some(shape) = scene.get_mut(parent_id).and_then(|p| p.as_shape_mut()) {
        shape.children_ids.retain(|&id| id != child_id);
    }
    log::debug!("Detached {child_id} from container {parent_id}");
    Some(parent_id)
}

/// Outcome of probing containment while an element is dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HierarchyChange {
    /// Container the element would join on drop.
    pub potential_container: Option<ElementId>,
    /// Whether it would leave its current parent.
    pub should_detach: bool,
}

/// Probe which container a dragged element would join, without mutating.
pub fn update_hierarchy(dragging_id: ElementId, scene: &Scene, threshold: f64) -> HierarchyChange {
    let Some(dragging) = scene.get(dragging_id) else {
        return HierarchyChange::default();
    };

    let mut exclude = all_descendants(dragging_id, scene);
    exclude.push(dragging_id);
    let potential = find_potential_container(dragging, scene, &exclude, threshold).map(|c| c.id());

    let mut detaching = false;
    if let Some(parent) = dragging.parent_id().and_then(|p| scene.get(p)) {
        detaching = should_detach(dragging, parent, threshold);
        if detaching && potential == Some(parent.id()) {
            return HierarchyChange {
                potential_container: None,
                should_detach: true,
            };
        }
    }

    HierarchyChange {
        potential_container: potential,
        should_detach: detaching,
    }
}

/// Commit a probed change. Returns the containers whose children changed.
pub fn finalize_hierarchy_change(
    id: ElementId,
    change: &HierarchyChange,
    scene: &mut Scene,
) -> Vec<ElementId> {
    let mut touched = Vec::new();
    if change.should_detach {
        if let Some(former) = detach(id, scene) {
            touched.push(former);
        }
    }

    let current_parent = scene.get(id).and_then(|el| el.parent_id());
    if let Some(container) = change.potential_container {
        if current_parent != Some(container) {
            if let Some(former) = current_parent {
                touched.push(former);
            }
            if attach(id, container, scene) {
                touched.push(container);
            }
        }
    }
    touched.dedup();
    touched
}
