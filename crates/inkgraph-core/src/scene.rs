//! Scene: the flat element arena and its draw order.

use crate::container;
use crate::elements::{Element, ElementId, ElementUpdate};
use crate::geometry::elements_bounds;
use kurbo::Rect;
use std::collections::{HashMap, HashSet};

/// All elements of a document, keyed by id, plus their draw order.
///
/// Relations between elements are ids into this arena, so cloning a scene
/// yields a fully independent snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    elements: HashMap<ElementId, Element>,
    /// Draw order (back to front).
    order: Vec<ElementId>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from elements in draw order and repair the order.
    /// Later duplicates of an id are dropped.
    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> Self {
        let mut scene = Self::new();
        for element in elements {
            let id = element.id();
            if scene.contains(id) {
                log::warn!("Dropping duplicate element id {id}");
                continue;
            }
            scene.order.push(id);
            scene.elements.insert(id, element);
        }
        container::validate_and_fix_hierarchy_order(&mut scene);
        scene
    }

    /// Elements in draw order, cloned.
    pub fn to_elements(&self) -> Vec<Element> {
        self.ordered().cloned().collect()
    }

    /// Add an element on top. Replaces in place if the id already exists.
    pub fn add(&mut self, element: Element) -> ElementId {
        let id = element.id();
        if self.elements.insert(id, element).is_none() {
            self.order.push(id);
        }
        id
    }

    /// Insert an element at a draw-order position (clamped).
    pub fn insert_at(&mut self, index: usize, element: Element) -> ElementId {
        let id = element.id();
        if self.elements.insert(id, element).is_none() {
            let index = index.min(self.order.len());
            self.order.insert(index, id);
        }
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Clear all elements.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.order.clear();
    }

    /// Elements in draw order (back to front).
    pub fn ordered(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    pub fn ordered_ids(&self) -> &[ElementId] {
        &self.order
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.order.iter().position(|&other| other == id)
    }

    /// Replace the draw order. Must be a permutation of the current ids.
    pub(crate) fn set_order(&mut self, order: Vec<ElementId>) {
        debug_assert_eq!(order.len(), self.order.len());
        self.order = order;
    }

    /// Merge a partial update into its element.
    /// Returns false for unknown ids, locked elements and empty updates.
    pub fn apply_update(&mut self, update: &ElementUpdate) -> bool {
        match self.elements.get_mut(&update.id) {
            Some(element) => element.apply_update(update),
            None => false,
        }
    }

    /// Apply several updates; returns how many changed something.
    pub fn apply_updates<'a>(&mut self, updates: impl IntoIterator<Item = &'a ElementUpdate>) -> usize {
        updates.into_iter().filter(|u| self.apply_update(u)).count()
    }

    /// Union of every element's rotated bounds.
    pub fn bounds(&self) -> Option<Rect> {
        elements_bounds(self.ordered())
    }

    /// Delete elements and sever every reference to them.
    ///
    /// Children of a deleted container become top level, bindings naming a
    /// deleted element are cleared, and surviving former parents are resized.
    pub fn delete(&mut self, ids: &[ElementId], padding: f64, threshold: f64) -> Vec<Element> {
        let doomed: HashSet<ElementId> = ids.iter().copied().filter(|id| self.contains(*id)).collect();
        if doomed.is_empty() {
            return Vec::new();
        }

        let mut former_parents = Vec::new();
        let mut removed = Vec::with_capacity(doomed.len());
        self.order.retain(|id| !doomed.contains(id));
        for id in ids {
            if let Some(element) = self.elements.remove(id) {
                if let Some(parent) = element.parent_id() {
                    if !doomed.contains(&parent) && !former_parents.contains(&parent) {
                        former_parents.push(parent);
                    }
                }
                removed.push(element);
            }
        }

        for element in self.elements.values_mut() {
            match element {
                Element::Rectangle(shape) | Element::Ellipse(shape) | Element::Line(shape) => {
                    shape.children_ids.retain(|id| !doomed.contains(id));
                    if shape.base.parent_id.is_some_and(|p| doomed.contains(&p)) {
                        shape.base.parent_id = None;
                    }
                }
                Element::Arrow(arrow) => {
                    if arrow.start_binding.as_ref().is_some_and(|b| doomed.contains(&b.element_id)) {
                        arrow.start_binding = None;
                    }
                    if arrow.end_binding.as_ref().is_some_and(|b| doomed.contains(&b.element_id)) {
                        arrow.end_binding = None;
                    }
                    if arrow.base.parent_id.is_some_and(|p| doomed.contains(&p)) {
                        arrow.base.parent_id = None;
                    }
                }
                Element::Text(text) => {
                    if text.binding.as_ref().is_some_and(|b| doomed.contains(&b.element_id)) {
                        text.binding = None;
                    }
                    if text.base.parent_id.is_some_and(|p| doomed.contains(&p)) {
                        text.base.parent_id = None;
                    }
                }
            }
        }

        for parent in former_parents {
            container::update_container_bounds(parent, self, padding, threshold);
        }
        log::debug!("Deleted {} element(s)", removed.len());
        removed
    }

    /// Move an element and its descendants on top of everything.
    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        let Some(block) = self.take_block(id) else {
            return false;
        };
        self.order.extend(block);
        container::validate_and_fix_hierarchy_order(self);
        true
    }

    /// Move an element and its descendants below everything.
    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        let Some(block) = self.take_block(id) else {
            return false;
        };
        self.order.splice(0..0, block);
        container::validate_and_fix_hierarchy_order(self);
        true
    }

    /// Move an element one layer forward (towards front).
    /// Returns true if the element was moved, false if already at front.
    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos + 1 < self.order.len() => {
                self.order.swap(pos, pos + 1);
                container::validate_and_fix_hierarchy_order(self);
                true
            }
            _ => false,
        }
    }

    /// Move an element one layer backward (towards back).
    /// Returns true if the element was moved, false if already at back.
    pub fn send_backward(&mut self, id: ElementId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos > 0 => {
                self.order.swap(pos, pos - 1);
                container::validate_and_fix_hierarchy_order(self);
                true
            }
            _ => false,
        }
    }

    /// Place `id` directly after `anchor` in draw order.
    pub fn move_after(&mut self, id: ElementId, anchor: ElementId) -> bool {
        if id == anchor || !self.contains(id) || !self.contains(anchor) {
            return false;
        }
        self.order.retain(|&other| other != id);
        let index = self.index_of(anchor).map_or(self.order.len(), |i| i + 1);
        self.order.insert(index, id);
        container::validate_and_fix_hierarchy_order(self);
        true
    }

    /// Remove `id` and its descendants from the order, keeping their
    /// relative order.
    fn take_block(&mut self, id: ElementId) -> Option<Vec<ElementId>> {
        if !self.contains(id) {
            return None;
        }
        let mut members: HashSet<ElementId> = container::all_descendants(id, self).into_iter().collect();
        members.insert(id);
        let block: Vec<ElementId> = self.order.iter().copied().filter(|i| members.contains(i)).collect();
        self.order.retain(|i| !members.contains(i));
        Some(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{CONTAINER_PADDING, OVERLAP_THRESHOLD, attach};
    use crate::elements::{ArrowBinding, ElementOptions, ElementType, TextBinding, TextPosition, create_element};

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Element {
        create_element(ElementType::Rectangle, x, y, w, h, &ElementOptions::default())
    }

    #[test]
    fn test_add_and_order() {
        let mut scene = Scene::new();
        let a = scene.add(rect(0.0, 0.0, 10.0, 10.0));
        let b = scene.add(rect(0.0, 0.0, 10.0, 10.0));
        assert_eq!(scene.ordered_ids(), &[a, b]);
        assert_eq!(scene.index_of(b), Some(1));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_add_existing_replaces_in_place() {
        let mut scene = Scene::new();
        let mut el = rect(0.0, 0.0, 10.0, 10.0);
        let a = scene.add(el.clone());
        scene.add(rect(0.0, 0.0, 5.0, 5.0));
        el.base_mut().x = 42.0;
        scene.add(el);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.index_of(a), Some(0));
        assert!((scene.get(a).unwrap().base().x - 42.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_z_order() {
        let mut scene = Scene::new();
        let a = scene.add(rect(0.0, 0.0, 10.0, 10.0));
        let b = scene.add(rect(50.0, 0.0, 10.0, 10.0));
        let c = scene.add(rect(100.0, 0.0, 10.0, 10.0));

        assert!(scene.bring_to_front(a));
        assert_eq!(scene.ordered_ids(), &[b, c, a]);
        assert!(scene.send_to_back(a));
        assert_eq!(scene.ordered_ids(), &[a, b, c]);
        assert!(scene.bring_forward(a));
        assert_eq!(scene.ordered_ids(), &[b, a, c]);
        assert!(scene.send_backward(a));
        assert!(!scene.send_backward(a));
        assert!(scene.move_after(a, c));
        assert_eq!(scene.ordered_ids(), &[b, c, a]);
        assert!(!scene.bring_forward(a));
    }

    #[test]
    fn test_bring_container_to_front_keeps_children_above() {
        let mut scene = Scene::new();
        let parent = scene.add(rect(0.0, 0.0, 100.0, 100.0));
        let child = scene.add(rect(30.0, 30.0, 20.0, 20.0));
        let other = scene.add(rect(200.0, 0.0, 10.0, 10.0));
        assert!(attach(child, parent, &mut scene));
        assert!(scene.bring_to_front(parent));
        assert_eq!(scene.ordered_ids(), &[other, parent, child]);
    }

    #[test]
    fn test_delete_severs_references() {
        let mut scene = Scene::new();
        let target = scene.add(rect(0.0, 0.0, 100.0, 100.0));
        let mut arrow = create_element(ElementType::Arrow, 200.0, 0.0, 50.0, 0.0, &ElementOptions::default());
        if let Some(a) = arrow.as_arrow_mut() {
            a.end_binding = Some(ArrowBinding { element_id: target, focus: 0.0, gap: 10.0, offset: None });
        }
        let arrow_id = scene.add(arrow);
        let mut text = create_element(ElementType::Text, 0.0, 0.0, 10.0, 10.0, &ElementOptions::default());
        if let Some(t) = text.as_text_mut() {
            t.binding = Some(TextBinding { element_id: target, position: TextPosition::Top, offset: None });
        }
        let text_id = scene.add(text);

        let removed = scene.delete(&[target], CONTAINER_PADDING, OVERLAP_THRESHOLD);
        assert_eq!(removed.len(), 1);
        assert!(!scene.contains(target));
        assert!(scene.get(arrow_id).unwrap().as_arrow().unwrap().end_binding.is_none());
        assert!(scene.get(text_id).unwrap().as_text().unwrap().binding.is_none());
    }

    #[test]
    fn test_delete_child_shrinks_parent() {
        let mut scene = Scene::new();
        let parent = scene.add(rect(0.0, 0.0, 100.0, 100.0));
        let child = scene.add(rect(70.0, 70.0, 40.0, 40.0));
        assert!(attach(child, parent, &mut scene));
        container::update_container_bounds(parent, &mut scene, CONTAINER_PADDING, OVERLAP_THRESHOLD);
        assert!(scene.get(parent).unwrap().as_shape().unwrap().is_expanded);

        scene.delete(&[child], CONTAINER_PADDING, OVERLAP_THRESHOLD);
        let shape = scene.get(parent).unwrap().as_shape().unwrap();
        assert!(shape.children_ids.is_empty());
        assert!(!shape.is_expanded);
        assert!(shape.original_bounds.is_none());
        assert!((shape.base.width - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_delete_container_orphans_children() {
        let mut scene = Scene::new();
        let parent = scene.add(rect(0.0, 0.0, 100.0, 100.0));
        let child = scene.add(rect(30.0, 30.0, 20.0, 20.0));
        assert!(attach(child, parent, &mut scene));
        scene.delete(&[parent], CONTAINER_PADDING, OVERLAP_THRESHOLD);
        assert!(scene.get(child).unwrap().parent_id().is_none());
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut scene = Scene::new();
        scene.add(rect(0.0, 0.0, 1.0, 1.0));
        let removed = scene.delete(&[uuid::Uuid::new_v4()], CONTAINER_PADDING, OVERLAP_THRESHOLD);
        assert!(removed.is_empty());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_from_elements_drops_duplicates() {
        let el = rect(0.0, 0.0, 1.0, 1.0);
        let scene = Scene::from_elements(vec![el.clone(), el]);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_bounds() {
        let mut scene = Scene::new();
        assert!(scene.bounds().is_none());
        scene.add(rect(0.0, 0.0, 10.0, 10.0));
        scene.add(rect(50.0, 20.0, 10.0, 10.0));
        assert_eq!(scene.bounds(), Some(Rect::new(0.0, 0.0, 60.0, 30.0)));
    }
}
