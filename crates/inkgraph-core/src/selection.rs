//! Rubber-band selection.

use crate::elements::Element;
use crate::geometry::is_point_in_rect;
use crate::scene::Scene;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// How an element qualifies for a selection box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// The element's center lies inside the box.
    #[default]
    Center,
    /// The element's box overlaps the box.
    Intersect,
}

/// Box spanned by a drag from `start` to `end`, in either direction.
pub fn normalize_selection_box(start: Point, end: Point) -> Rect {
    Rect::from_points(start, end)
}

/// Elements selected by `selection`, in draw order.
pub fn elements_in_selection_box(scene: &Scene, selection: Rect, mode: SelectionMode) -> Vec<&Element> {
    let selection = selection.abs();
    scene
        .ordered()
        .filter(|el| {
            let r = el.rect();
            match mode {
                SelectionMode::Center => is_point_in_rect(r.center(), selection),
                SelectionMode::Intersect => {
                    r.x0 < selection.x1 && r.x1 > selection.x0 && r.y0 < selection.y1 && r.y1 > selection.y0
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementOptions, ElementType, create_element};

    fn scene() -> (Scene, [crate::elements::ElementId; 3]) {
        let mut scene = Scene::new();
        let opts = ElementOptions::default();
        let a = scene.add(create_element(ElementType::Rectangle, 0.0, 0.0, 20.0, 20.0, &opts));
        let b = scene.add(create_element(ElementType::Ellipse, 40.0, 0.0, 40.0, 20.0, &opts));
        let c = scene.add(create_element(ElementType::Text, 200.0, 200.0, 30.0, 20.0, &opts));
        (scene, [a, b, c])
    }

    #[test]
    fn test_normalize_selection_box() {
        let r = normalize_selection_box(Point::new(50.0, 10.0), Point::new(10.0, 40.0));
        assert_eq!(r, Rect::new(10.0, 10.0, 50.0, 40.0));
    }

    #[test]
    fn test_center_mode() {
        let (scene, [a, b, _]) = scene();
        let picked: Vec<_> = elements_in_selection_box(&scene, Rect::new(-5.0, -5.0, 55.0, 25.0), SelectionMode::Center)
            .into_iter()
            .map(Element::id)
            .collect();
        // b's center is (60, 10), outside the box.
        assert_eq!(picked, vec![a]);
        let all: Vec<_> = elements_in_selection_box(&scene, Rect::new(-5.0, -5.0, 85.0, 25.0), SelectionMode::Center)
            .into_iter()
            .map(Element::id)
            .collect();
        assert_eq!(all, vec![a, b]);
    }

    #[test]
    fn test_intersect_mode() {
        let (scene, [a, b, _]) = scene();
        let picked: Vec<_> = elements_in_selection_box(&scene, Rect::new(15.0, 5.0, 45.0, 10.0), SelectionMode::Intersect)
            .into_iter()
            .map(Element::id)
            .collect();
        assert_eq!(picked, vec![a, b]);
        // Touching edges do not intersect.
        let none = elements_in_selection_box(&scene, Rect::new(20.0, 0.0, 40.0, 20.0), SelectionMode::Intersect);
        assert!(none.is_empty());
    }
}
