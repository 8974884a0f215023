//! Point picking.

use crate::config::EngineConfig;
use crate::elements::Element;
use crate::geometry::{
    DEFAULT_BEZIER_SAMPLES, distance_point_to_bezier, distance_point_to_segment, is_point_in_ellipse,
    is_point_in_rect, rotate_point,
};
use crate::scene::Scene;
use kurbo::Point;

/// Distance within which a line or arrow counts as hit.
pub const HIT_TOLERANCE: f64 = 10.0;

/// Tolerances used by [`hit_test_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOptions {
    pub tolerance: f64,
    pub bezier_samples: usize,
}

impl Default for HitOptions {
    fn default() -> Self {
        Self {
            tolerance: HIT_TOLERANCE,
            bezier_samples: DEFAULT_BEZIER_SAMPLES,
        }
    }
}

impl From<&EngineConfig> for HitOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            tolerance: config.hit_tolerance,
            bezier_samples: config.bezier_samples,
        }
    }
}

/// [`hit_test_with`] at the default tolerance.
pub fn hit_test(element: &Element, point: Point) -> bool {
    hit_test_with(element, point, &HitOptions::default())
}

/// Whether `point` lies on `element`.
///
/// Boxes and ellipses test the interior in the element's own (unrotated)
/// frame. Lines and arrows test distance to their path in the same frame.
pub fn hit_test_with(element: &Element, point: Point, options: &HitOptions) -> bool {
    let base = element.base();
    let local = if base.angle == 0.0 {
        point
    } else {
        rotate_point(point, base.center(), -base.angle)
    };

    match element {
        Element::Rectangle(_) | Element::Text(_) => is_point_in_rect(local, base.rect()),
        Element::Ellipse(_) => is_point_in_ellipse(local, base.rect()),
        Element::Line(_) => {
            let start = Point::new(base.x, base.y);
            let end = Point::new(base.x + base.width, base.y + base.height);
            distance_point_to_segment(local, start, end) <= options.tolerance
        }
        Element::Arrow(arrow) => {
            let points = arrow.world_points();
            match points.as_slice() {
                [] => false,
                [only] => distance_point_to_segment(local, *only, *only) <= options.tolerance,
                &[start, control, end] => {
                    distance_point_to_bezier(local, start, control, end, options.bezier_samples)
                        <= options.tolerance
                }
                _ => points
                    .windows(2)
                    .any(|w| distance_point_to_segment(local, w[0], w[1]) <= options.tolerance),
            }
        }
    }
}

/// Frontmost element under `point`.
pub fn topmost_element_at<'a>(scene: &'a Scene, point: Point, options: &HitOptions) -> Option<&'a Element> {
    scene.ordered().rev().find(|el| hit_test_with(el, point, options))
}

/// Every element under `point`, front to back.
pub fn elements_at_point<'a>(scene: &'a Scene, point: Point, options: &HitOptions) -> Vec<&'a Element> {
    scene
        .ordered()
        .rev()
        .filter(|el| hit_test_with(el, point, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementOptions, ElementType, create_element};
    use std::f64::consts::FRAC_PI_2;

    fn el(kind: ElementType, x: f64, y: f64, w: f64, h: f64) -> Element {
        create_element(kind, x, y, w, h, &ElementOptions::default())
    }

    #[test]
    fn test_rectangle_and_text() {
        let r = el(ElementType::Rectangle, 0.0, 0.0, 100.0, 50.0);
        assert!(hit_test(&r, Point::new(100.0, 50.0)));
        assert!(!hit_test(&r, Point::new(100.5, 25.0)));
        let t = el(ElementType::Text, 0.0, 0.0, 40.0, 20.0);
        assert!(hit_test(&t, Point::new(20.0, 10.0)));
    }

    #[test]
    fn test_ellipse() {
        let e = el(ElementType::Ellipse, 0.0, 0.0, 100.0, 50.0);
        assert!(hit_test(&e, Point::new(50.0, 25.0)));
        assert!(hit_test(&e, Point::new(100.0, 25.0)));
        assert!(!hit_test(&e, Point::new(5.0, 5.0)));
        let flat = el(ElementType::Ellipse, 0.0, 0.0, 100.0, 0.0);
        assert!(!hit_test(&flat, Point::new(50.0, 0.0)));
    }

    #[test]
    fn test_line_tolerance() {
        let l = el(ElementType::Line, 0.0, 0.0, 100.0, 0.0);
        assert!(hit_test(&l, Point::new(50.0, 10.0)));
        assert!(!hit_test(&l, Point::new(50.0, 10.5)));
        let tight = HitOptions { tolerance: 2.0, ..HitOptions::default() };
        assert!(!hit_test_with(&l, Point::new(50.0, 5.0), &tight));
    }

    #[test]
    fn test_arrow_paths() {
        let mut a = el(ElementType::Arrow, 0.0, 0.0, 100.0, 0.0);
        assert!(hit_test(&a, Point::new(50.0, 8.0)));
        if let Element::Arrow(arrow) = &mut a {
            arrow.points = vec![Point::ZERO, Point::new(50.0, 100.0), Point::new(100.0, 0.0)];
        }
        // The curve peaks at y = 50 in the middle, so the chord is a miss.
        assert!(hit_test(&a, Point::new(50.0, 50.0)));
        assert!(!hit_test(&a, Point::new(50.0, 0.0)));
        if let Element::Arrow(arrow) = &mut a {
            arrow.points = vec![Point::ZERO, Point::new(100.0, 0.0), Point::new(100.0, 100.0), Point::new(0.0, 100.0)];
        }
        assert!(hit_test(&a, Point::new(95.0, 50.0)));
        assert!(!hit_test(&a, Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_rotated_arrow() {
        let mut a = el(ElementType::Arrow, 0.0, 0.0, 100.0, 0.0);
        a.base_mut().angle = FRAC_PI_2;
        // Turned upright about (50, 0).
        assert!(hit_test(&a, Point::new(50.0, 40.0)));
        assert!(!hit_test(&a, Point::new(90.0, 0.0)));
    }

    #[test]
    fn test_rotated_rectangle() {
        let mut r = el(ElementType::Rectangle, 0.0, 40.0, 100.0, 20.0);
        r.base_mut().angle = FRAC_PI_2;
        assert!(hit_test(&r, Point::new(50.0, 5.0)));
        assert!(!hit_test(&r, Point::new(5.0, 50.0)));
    }

    #[test]
    fn test_topmost_and_all() {
        let mut scene = Scene::new();
        let below = scene.add(el(ElementType::Rectangle, 0.0, 0.0, 100.0, 100.0));
        let above = scene.add(el(ElementType::Ellipse, 20.0, 20.0, 60.0, 60.0));
        let opts = HitOptions::default();
        assert_eq!(topmost_element_at(&scene, Point::new(50.0, 50.0), &opts).map(Element::id), Some(above));
        assert_eq!(topmost_element_at(&scene, Point::new(2.0, 2.0), &opts).map(Element::id), Some(below));
        assert!(topmost_element_at(&scene, Point::new(500.0, 2.0), &opts).is_none());
        let ids: Vec<_> = elements_at_point(&scene, Point::new(50.0, 50.0), &opts).into_iter().map(Element::id).collect();
        assert_eq!(ids, vec![above, below]);
    }
}
