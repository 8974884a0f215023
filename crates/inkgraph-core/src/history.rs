//! Snapshot undo/redo.

use crate::scene::Scene;
use std::collections::VecDeque;

/// Snapshots kept by default.
pub const MAX_HISTORY: usize = 50;

/// Linear undo history of whole-scene snapshots.
///
/// The newest entry of `past` is the current state. The oldest entry is a
/// floor that undo never removes. Recording after an undo drops the redo
/// stack.
#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<Scene>,
    future: Vec<Scene>,
    max_entries: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}

impl History {
    /// History keeping at most `max_entries` snapshots (at least one).
    pub fn new(max_entries: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Push a copy of `scene` as the newest state.
    pub fn record(&mut self, scene: &Scene) {
        self.past.push_back(scene.clone());
        while self.past.len() > self.max_entries {
            self.past.pop_front();
        }
        self.future.clear();
        log::trace!("History: recorded snapshot {} of {}", self.past.len(), self.max_entries);
    }

    /// Step back one entry and return the state to restore.
    pub fn undo(&mut self) -> Option<Scene> {
        if !self.can_undo() {
            return None;
        }
        let undone = self.past.pop_back()?;
        self.future.push(undone);
        self.past.back().cloned()
    }

    /// Re-apply the most recently undone entry and return it.
    pub fn redo(&mut self) -> Option<Scene> {
        let entry = self.future.pop()?;
        self.past.push_back(entry.clone());
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        self.past.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// The newest recorded state.
    pub fn current(&self) -> Option<&Scene> {
        self.past.back()
    }

    pub fn undo_len(&self) -> usize {
        self.past.len()
    }

    pub fn redo_len(&self) -> usize {
        self.future.len()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementOptions, ElementType, create_element};

    fn scene_with(n: usize) -> Scene {
        let mut scene = Scene::new();
        for i in 0..n {
            scene.add(create_element(
                ElementType::Rectangle,
                i as f64 * 10.0,
                0.0,
                5.0,
                5.0,
                &ElementOptions::default(),
            ));
        }
        scene
    }

    #[test]
    fn test_undo_redo() {
        let a = scene_with(1);
        let b = scene_with(2);
        let mut history = History::default();
        history.record(&a);
        history.record(&b);
        assert!(history.can_undo());
        assert_eq!(history.undo(), Some(a.clone()));
        assert!(!history.can_undo());
        assert!(history.can_redo());
        assert_eq!(history.redo(), Some(b.clone()));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_first_entry_is_floor() {
        let mut history = History::default();
        history.record(&scene_with(1));
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::default();
        history.record(&scene_with(1));
        history.record(&scene_with(2));
        history.undo();
        history.record(&scene_with(3));
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
        assert_eq!(history.current().map(Scene::len), Some(3));
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut history = History::new(3);
        for n in 1..=5 {
            history.record(&scene_with(n));
        }
        assert_eq!(history.undo_len(), 3);
        history.undo();
        history.undo();
        assert!(!history.can_undo());
        assert_eq!(history.current().map(Scene::len), Some(3));
    }

    #[test]
    fn test_snapshots_are_independent() {
        let mut scene = scene_with(1);
        let mut history = History::default();
        history.record(&scene);
        let id = scene.ordered_ids()[0];
        scene.get_mut(id).unwrap().base_mut().x = 999.0;
        history.record(&scene);
        let restored = history.undo().unwrap();
        assert!((restored.get(id).unwrap().base().x).abs() < f64::EPSILON);
    }
}
