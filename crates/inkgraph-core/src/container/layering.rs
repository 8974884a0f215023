//! Draw-order correction: containers paint before their descendants.

use super::hierarchy::all_descendants;
use crate::elements::ElementId;
use crate::scene::Scene;
use std::collections::{HashSet, VecDeque};

/// Move every descendant of `parent_id` directly after it, keeping the
/// parent's position among the other elements.
pub fn ensure_children_after_parent(parent_id: ElementId, scene: &mut Scene) -> bool {
    if !scene.get(parent_id).is_some_and(|p| p.is_shape() && !p.children_ids().is_empty()) {
        return false;
    }
    let descendants = all_descendants(parent_id, scene);
    regroup(scene, parent_id, &descendants, Anchor::Parent)
}

/// Repair draw order so every container precedes all its descendants.
///
/// Containers are visited outermost first. A container whose block is out of
/// order is pulled, with its descendants, to the position of the earliest
/// block member; other elements keep their relative order. Idempotent.
pub fn validate_and_fix_hierarchy_order(scene: &mut Scene) -> bool {
    let containers: Vec<ElementId> = scene
        .ordered()
        .filter(|el| el.is_shape() && !el.children_ids().is_empty())
        .map(|el| el.id())
        .collect();
    let is_root = |id: &ElementId| {
        scene
            .get(*id)
            .and_then(|el| el.parent_id())
            .and_then(|p| scene.get(p))
            .is_none_or(|p| !p.children_ids().contains(id))
    };

    let mut queue: VecDeque<ElementId> = containers.iter().copied().filter(is_root).collect();
    let mut visited = HashSet::new();
    let mut walk = Vec::new();
    while let Some(id) = queue.pop_front() {
        if !visited.insert(id) {
            continue;
        }
        walk.push(id);
        if let Some(el) = scene.get(id) {
            queue.extend(el.children_ids().iter().copied());
        }
    }

    let mut changed = false;
    for id in walk {
        let Some(el) = scene.get(id) else {
            continue;
        };
        if el.children_ids().is_empty() {
            continue;
        }
        let descendants = all_descendants(id, scene);
        let Some(index) = scene.index_of(id) else {
            continue;
        };
        let violated = descendants
            .iter()
            .filter_map(|d| scene.index_of(*d))
            .any(|i| i < index);
        if violated && regroup(scene, id, &descendants, Anchor::Earliest) {
            log::debug!("Repaired draw order for container {id}");
            changed = true;
        }
    }
    changed
}

enum Anchor {
    /// Where the parent currently sits among the non-members.
    Parent,
    /// Where the earliest block member sits among the non-members.
    Earliest,
}

/// Rebuild the order as: non-members, with `[parent, descendants...]`
/// inserted at the anchor. Descendants keep their relative order.
fn regroup(scene: &mut Scene, parent_id: ElementId, descendants: &[ElementId], anchor: Anchor) -> bool {
    let members: HashSet<ElementId> = descendants.iter().copied().chain([parent_id]).collect();
    let order = scene.ordered_ids();

    let anchor_pos = match anchor {
        Anchor::Parent => order.iter().position(|&id| id == parent_id),
        Anchor::Earliest => order.iter().position(|id| members.contains(id)),
    };
    let Some(anchor_pos) = anchor_pos else {
        return false;
    };
    let insert_at = order[..anchor_pos].iter().filter(|id| !members.contains(id)).count();

    let mut rest: Vec<ElementId> = order.iter().copied().filter(|id| !members.contains(id)).collect();
    let block: Vec<ElementId> = std::iter::once(parent_id)
        .chain(order.iter().copied().filter(|id| *id != parent_id && members.contains(id)))
        .collect();
    rest.splice(insert_at..insert_at, block);

    if rest == order {
        return false;
    }
    scene.set_order(rest);
    true
}
