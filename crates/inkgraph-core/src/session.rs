//! Document session: the scene plus everything that edits it.
//!
//! A [`Session`] owns one scene, its undo history, the engine
//! configuration and the text measurer. Each editing method leaves the
//! derived state consistent (bindings followed, containers resized, draw
//! order repaired). Callers decide when an edit is one undoable action
//! and call [`Session::commit`] at that boundary.

use crate::binding::{
    compute_binding, compute_text_binding, find_bind_target, propagate_binding_update,
    recalculate_offsets_on_manual_move,
};
use crate::clipboard::{collect_with_children, duplicate_elements};
use crate::config::EngineConfig;
use crate::container::{
    HierarchyChange, ancestors, finalize_hierarchy_change, move_with_children, rotate_with_children,
    update_container_bounds, update_hierarchy,
};
use crate::document::{DocumentResult, ViewState, load_document, save_document};
use crate::elements::{Element, ElementId, ElementUpdate};
use crate::hit_test::{HitOptions, topmost_element_at};
use crate::history::History;
use crate::measure::{FallbackMeasurer, TextMeasurer, measure_text_element};
use crate::scene::Scene;
use crate::transform::{
    Handle, HandleMetrics, ResizeHandle, handle_at, resize, resize_flips, rotation_angle, scale_text,
    snap_rotation_with,
};
use kurbo::Point;
use std::fmt;

/// An editable document.
pub struct Session {
    scene: Scene,
    history: History,
    config: EngineConfig,
    measurer: Box<dyn TextMeasurer>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("scene", &self.scene)
            .field("history", &self.history)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Session {
    /// Empty session. The empty scene is the first history entry.
    pub fn new(config: EngineConfig) -> Self {
        let scene = Scene::new();
        let mut history = History::new(config.max_history);
        history.record(&scene);
        Self {
            scene,
            history,
            config,
            measurer: Box::new(FallbackMeasurer),
        }
    }

    /// Use a host-provided text measurer.
    pub fn with_measurer(mut self, measurer: Box<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer.as_ref()
    }

    fn padding_and_threshold(&self) -> (f64, f64) {
        (self.config.container_padding, self.config.overlap_threshold)
    }

    fn is_editable(&self, id: ElementId) -> bool {
        self.scene.get(id).is_some_and(|el| !el.is_locked())
    }

    /// Add an element on top. Text is sized to its content and placed by
    /// its binding, if any.
    pub fn add_element(&mut self, mut element: Element) -> ElementId {
        if let Element::Text(text) = &mut element {
            let size = measure_text_element(text, self.measurer.as_ref());
            text.base.width = size.width;
            text.base.height = size.height;
        }
        let id = self.scene.add(element);
        if let Some(target) = self.text_target(id) {
            self.follow(target);
        }
        log::debug!("Added element {id}");
        id
    }

    fn text_target(&self, id: ElementId) -> Option<ElementId> {
        self.scene
            .get(id)
            .and_then(Element::as_text)
            .and_then(|t| t.binding.as_ref())
            .map(|b| b.element_id)
    }

    /// Delete elements and everything that referenced them.
    pub fn delete_elements(&mut self, ids: &[ElementId]) -> Vec<Element> {
        let (padding, threshold) = self.padding_and_threshold();
        self.scene.delete(ids, padding, threshold)
    }

    /// Copy `ids` with their descendants, offset by the configured amount.
    /// Returns the new ids in draw order.
    pub fn duplicate_elements(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let originals = collect_with_children(ids, &self.scene);
        duplicate_elements(&originals, self.config.duplicate_offset)
            .into_iter()
            .map(|el| self.scene.add(el))
            .collect()
    }

    fn follow(&mut self, moved: ElementId) -> Vec<ElementId> {
        propagate_binding_update(
            &mut self.scene,
            moved,
            self.config.text_binding_gap,
            self.measurer.as_ref(),
        )
    }

    /// Move an element and its descendants by `(dx, dy)`.
    ///
    /// Elements bound to any moved shape follow it. A bound arrow or text
    /// dragged on its own keeps its binding, with the offset re-derived
    /// from the new position. Returns the moved ids.
    pub fn translate_element(&mut self, id: ElementId, dx: f64, dy: f64) -> Vec<ElementId> {
        if !self.is_editable(id) {
            return Vec::new();
        }
        let moved = move_with_children(id, dx, dy, &mut self.scene);
        for &moved_id in &moved {
            if self.scene.get(moved_id).is_some_and(Element::is_shape) {
                self.follow(moved_id);
            }
        }
        recalculate_offsets_on_manual_move(
            &mut self.scene,
            id,
            self.config.text_binding_gap,
            self.measurer.as_ref(),
        );
        moved
    }

    /// Container `id` would join if dropped now, without changing anything.
    pub fn probe_drop(&self, id: ElementId) -> HierarchyChange {
        update_hierarchy(id, &self.scene, self.config.overlap_threshold)
    }

    /// Commit containment for a dragged element and resize every affected
    /// container and its ancestors. Returns the containers touched.
    pub fn drop_element(&mut self, id: ElementId) -> Vec<ElementId> {
        if !self.scene.contains(id) {
            return Vec::new();
        }
        let (padding, threshold) = self.padding_and_threshold();
        let former_parent = self.scene.get(id).and_then(Element::parent_id);
        let change = update_hierarchy(id, &self.scene, threshold);
        let mut touched = finalize_hierarchy_change(id, &change, &mut self.scene);
        touched.extend(former_parent);
        touched.extend(self.scene.get(id).and_then(Element::parent_id));

        let mut containers = Vec::new();
        for container in touched {
            for c in std::iter::once(container).chain(ancestors(container, &self.scene)) {
                if !containers.contains(&c) {
                    containers.push(c);
                }
            }
        }
        for &container in &containers {
            if update_container_bounds(container, &mut self.scene, padding, threshold) {
                self.follow(container);
            }
        }
        containers
    }

    /// Resize an element by dragging `handle` from `start` to `current`.
    ///
    /// Text scales its font instead of its box. Arrow points stretch with
    /// the box. A container that currently has children is sized by them
    /// and refuses manual resizing.
    pub fn resize_element(
        &mut self,
        id: ElementId,
        handle: ResizeHandle,
        start: Point,
        current: Point,
        maintain_aspect_ratio: bool,
    ) -> bool {
        if !self.is_editable(id) {
            return false;
        }
        let Some(element) = self.scene.get_mut(id) else {
            return false;
        };
        match element {
            Element::Text(text) => {
                let scaled = scale_text(text, handle, start, current, self.measurer.as_ref());
                text.font_size = scaled.font_size;
                text.base.x = scaled.x;
                text.base.y = scaled.y;
                text.base.width = scaled.width;
                text.base.height = scaled.height;
            }
            Element::Arrow(arrow) => {
                let rect = resize(
                    &arrow.base,
                    handle,
                    start,
                    current,
                    maintain_aspect_ratio,
                    self.config.min_element_size,
                );
                let (flip_x, flip_y) = resize_flips(&arrow.base, handle, start, current);
                arrow.fit_to_rect(rect, flip_x, flip_y);
            }
            other => {
                if other.as_shape().is_some_and(|s| s.has_children()) {
                    log::debug!("Ignoring manual resize of container {id}");
                    return false;
                }
                let rect = resize(
                    other.base(),
                    handle,
                    start,
                    current,
                    maintain_aspect_ratio,
                    self.config.min_element_size,
                );
                let update = ElementUpdate::new(id)
                    .with_position(rect.x0, rect.y0)
                    .with_size(rect.width(), rect.height());
                if !other.apply_update(&update) {
                    return false;
                }
            }
        }
        self.follow(id);
        self.refresh_parent(id);
        true
    }

    /// Rotate an element to face `pointer`, cascading to its descendants.
    /// Returns the applied angle.
    pub fn rotate_element(&mut self, id: ElementId, pointer: Point, shift_held: bool) -> Option<f64> {
        if !self.is_editable(id) {
            return None;
        }
        let base = self.scene.get(id)?.base();
        let angle = snap_rotation_with(
            rotation_angle(base, pointer),
            shift_held,
            self.config.rotation_snap_increment_deg,
            self.config.rotation_magnet_tolerance_deg,
        );
        let (delta, center) = (angle - base.angle, base.center());
        let rotated = rotate_with_children(id, delta, center, &mut self.scene);
        for moved in rotated {
            if self.scene.get(moved).is_some_and(Element::is_shape) {
                self.follow(moved);
            }
        }
        Some(angle)
    }

    fn refresh_parent(&mut self, id: ElementId) {
        let (padding, threshold) = self.padding_and_threshold();
        for container in ancestors(id, &self.scene) {
            if update_container_bounds(container, &mut self.scene, padding, threshold) {
                self.follow(container);
            }
        }
    }

    /// Bind one end of an arrow to the shape under that end, or unbind it
    /// when no shape is close enough. Returns whether a binding was made.
    pub fn bind_arrow_end(&mut self, arrow_id: ElementId, at_start: bool) -> bool {
        let Some(arrow) = self.scene.get(arrow_id).and_then(Element::as_arrow) else {
            return false;
        };
        let Some(point) = (if at_start { arrow.start_point() } else { arrow.end_point() }) else {
            return false;
        };
        let binding = find_bind_target(&self.scene, point, Some(arrow_id), self.config.binding_threshold)
            .and_then(|target| compute_binding(point, target, self.config.binding_gap, true));
        let bound = binding.is_some();
        if let Some(arrow) = self.scene.get_mut(arrow_id).and_then(Element::as_arrow_mut) {
            if at_start {
                arrow.start_binding = binding;
            } else {
                arrow.end_binding = binding;
            }
        }
        bound
    }

    /// Bind a text block to the shape nearest its top-left corner, keeping
    /// its current position.
    pub fn bind_text(&mut self, text_id: ElementId) -> bool {
        let Some(text) = self.scene.get(text_id).and_then(Element::as_text) else {
            return false;
        };
        let point = Point::new(text.base.x, text.base.y);
        let size = self.measurer.measure(&text.text, text.font_size, &text.font_family);
        let binding = find_bind_target(&self.scene, point, Some(text_id), self.config.binding_threshold)
            .and_then(|target| compute_text_binding(point, target, size, self.config.text_binding_gap, true));
        let bound = binding.is_some();
        if let Some(text) = self.scene.get_mut(text_id).and_then(Element::as_text_mut) {
            text.binding = binding;
        }
        bound
    }

    /// Topmost element under `point`.
    pub fn element_at(&self, point: Point) -> Option<ElementId> {
        topmost_element_at(&self.scene, point, &HitOptions::from(&self.config)).map(Element::id)
    }

    /// Transform handle of `id` under `point` at the given zoom.
    pub fn handle_at(&self, id: ElementId, point: Point, zoom: f64) -> Option<Handle> {
        let element = self.scene.get(id)?;
        handle_at(element.base(), point, zoom, &HandleMetrics::from(&self.config))
    }

    /// Record the current scene as one undoable step.
    pub fn commit(&mut self) {
        self.history.record(&self.scene);
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(scene) => {
                self.scene = scene;
                log::debug!("Undo ({} left)", self.history.undo_len() - 1);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(scene) => {
                self.scene = scene;
                log::debug!("Redo ({} left)", self.history.redo_len());
                true
            }
            None => false,
        }
    }

    /// Replace the scene with a validated document and reset history.
    /// On error the session is left untouched.
    pub fn load(&mut self, json: &str) -> DocumentResult<ViewState> {
        let file = load_document(json)?;
        let view = file.app_state.clone();
        self.scene = file.into_scene();
        self.history.clear();
        self.history.record(&self.scene);
        Ok(view)
    }

    pub fn save(&self, view: &ViewState) -> DocumentResult<String> {
        save_document(&self.scene, view)
    }
}
