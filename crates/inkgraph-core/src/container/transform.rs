//! Rigid transforms cascaded over a container subtree.

use super::hierarchy::all_descendants;
use crate::elements::{Element, ElementId, ElementUpdate};
use crate::geometry::rotate_point;
use crate::scene::Scene;
use kurbo::{Point, Size};

fn subtree(id: ElementId, scene: &Scene) -> Vec<ElementId> {
    if !scene.contains(id) {
        return Vec::new();
    }
    let mut ids = vec![id];
    ids.extend(all_descendants(id, scene));
    ids
}

/// Translate an element and all its descendants. Returns the moved ids.
pub fn move_with_children(id: ElementId, dx: f64, dy: f64, scene: &mut Scene) -> Vec<ElementId> {
    let ids = subtree(id, scene);
    let updates: Vec<ElementUpdate> = ids
        .iter()
        .filter_map(|&i| scene.get(i))
        .map(|el| {
            let b = el.base();
            ElementUpdate::new(b.id).with_position(b.x + dx, b.y + dy)
        })
        .collect();
    scene.apply_updates(&updates);
    ids
}

/// Scale an element and its descendants about `origin`.
///
/// Positions scale about the origin, sizes by the factor magnitudes. Arrow
/// points and a container's stored natural size scale with them.
pub fn scale_with_children(
    id: ElementId,
    sx: f64,
    sy: f64,
    origin: Point,
    scene: &mut Scene,
) -> Vec<ElementId> {
    let ids = subtree(id, scene);
    let updates: Vec<ElementUpdate> = ids
        .iter()
        .filter_map(|&i| scene.get(i))
        .map(|el| scale_element(el, sx, sy, origin))
        .collect();
    scene.apply_updates(&updates);
    ids
}

fn scale_element(el: &Element, sx: f64, sy: f64, origin: Point) -> ElementUpdate {
    let b = el.base();
    let x = origin.x + (b.x - origin.x) * sx;
    let y = origin.y + (b.y - origin.y) * sy;
    let width = b.width * sx;
    let height = b.height * sy;
    // Negative factors mirror the box; keep a positive size anchored at the
    // mirrored corner.
    let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
    let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
    let mut update = ElementUpdate::new(b.id).with_position(x, y).with_size(width, height);

    match el {
        Element::Arrow(arrow) => {
            let shift = kurbo::Vec2::new(
                if sx < 0.0 { b.width * sx.abs() } else { 0.0 },
                if sy < 0.0 { b.height * sy.abs() } else { 0.0 },
            );
            let points = arrow
                .points
                .iter()
                .map(|p| Point::new(p.x * sx + shift.x, p.y * sy + shift.y))
                .collect();
            update = update.with_points(points);
        }
        Element::Rectangle(s) | Element::Ellipse(s) | Element::Line(s) => {
            if let Some(original) = s.original_bounds {
                let scaled = Size::new(original.width * sx.abs(), original.height * sy.abs());
                update = update.with_expansion(s.is_expanded, Some(scaled));
            }
        }
        Element::Text(_) => {}
    }
    update
}

/// Rotate an element and its descendants by `delta` around `center`.
pub fn rotate_with_children(
    id: ElementId,
    delta: f64,
    center: Point,
    scene: &mut Scene,
) -> Vec<ElementId> {
    let ids = subtree(id, scene);
    let updates: Vec<ElementUpdate> = ids
        .iter()
        .filter_map(|&i| scene.get(i))
        .map(|el| {
            let b = el.base();
            let moved = rotate_point(b.center(), center, delta);
            ElementUpdate::new(b.id)
                .with_position(moved.x - b.width / 2.0, moved.y - b.height / 2.0)
                .with_angle(b.angle + delta)
        })
        .collect();
    scene.apply_updates(&updates);
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::attach;
    use crate::elements::{ElementOptions, ElementType, create_element};
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn setup() -> (Scene, ElementId, ElementId, ElementId) {
        let mut scene = Scene::new();
        let p = scene.add(create_element(ElementType::Rectangle, 0.0, 0.0, 100.0, 100.0, &ElementOptions::default()));
        let c = scene.add(create_element(ElementType::Ellipse, 10.0, 10.0, 20.0, 20.0, &ElementOptions::default()));
        let other = scene.add(create_element(ElementType::Rectangle, 500.0, 500.0, 20.0, 20.0, &ElementOptions::default()));
        attach(c, p, &mut scene);
        (scene, p, c, other)
    }

    #[test]
    fn test_move_with_children() {
        let (mut scene, p, c, other) = setup();
        let moved = move_with_children(p, 5.0, -5.0, &mut scene);
        assert_eq!(moved, vec![p, c]);
        assert!((scene.get(c).unwrap().base().x - 15.0).abs() < EPS);
        assert!((scene.get(c).unwrap().base().y - 5.0).abs() < EPS);
        assert!((scene.get(other).unwrap().base().x - 500.0).abs() < EPS);
        assert!(move_with_children(uuid::Uuid::new_v4(), 1.0, 1.0, &mut scene).is_empty());
    }

    #[test]
    fn test_scale_with_children() {
        let (mut scene, p, c, _) = setup();
        scale_with_children(p, 2.0, 2.0, Point::ZERO, &mut scene);
        let cb = scene.get(c).unwrap().base();
        assert!((cb.x - 20.0).abs() < EPS);
        assert!((cb.width - 40.0).abs() < EPS);
        let pb = scene.get(p).unwrap().base();
        assert!((pb.width - 200.0).abs() < EPS);
    }

    #[test]
    fn test_scale_arrow_points() {
        let mut scene = Scene::new();
        let a = scene.add(create_element(ElementType::Arrow, 10.0, 10.0, 40.0, 20.0, &ElementOptions::default()));
        scale_with_children(a, 0.5, 2.0, Point::new(10.0, 10.0), &mut scene);
        let arrow = scene.get(a).unwrap().as_arrow().unwrap();
        assert_eq!(arrow.points[1], Point::new(20.0, 40.0));
        assert!((arrow.base.width - 20.0).abs() < EPS);
    }

    #[test]
    fn test_rotate_with_children() {
        let (mut scene, p, c, _) = setup();
        rotate_with_children(p, FRAC_PI_2, Point::new(50.0, 50.0), &mut scene);
        let pb = scene.get(p).unwrap().base();
        assert!((pb.angle - FRAC_PI_2).abs() < EPS);
        assert!((pb.x).abs() < EPS);
        let cb = scene.get(c).unwrap().base();
        // Child center (20, 20) turns to (80, 20).
        assert!((cb.center().x - 80.0).abs() < EPS);
        assert!((cb.center().y - 20.0).abs() < EPS);
        assert!((cb.angle - FRAC_PI_2).abs() < EPS);
    }
}
