//! Identifier-keyed partial updates.

use super::ElementId;
use kurbo::{Point, Size};

/// Partial update for one element. Unset fields are left alone.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementUpdate {
    pub id: ElementId,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub angle: Option<f64>,
    /// Arrow points, relative to the arrow origin.
    pub points: Option<Vec<Point>>,
    pub is_expanded: Option<bool>,
    /// `Some(None)` clears the stored size.
    pub original_bounds: Option<Option<Size>>,
}

impl ElementUpdate {
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            x: None,
            y: None,
            width: None,
            height: None,
            angle: None,
            points: None,
            is_expanded: None,
            original_bounds: None,
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = Some(angle);
        self
    }

    pub fn with_points(mut self, points: Vec<Point>) -> Self {
        self.points = Some(points);
        self
    }

    pub fn with_expansion(mut self, is_expanded: bool, original_bounds: Option<Size>) -> Self {
        self.is_expanded = Some(is_expanded);
        self.original_bounds = Some(original_bounds);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_none()
            && self.y.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.angle.is_none()
            && self.points.is_none()
            && self.is_expanded.is_none()
            && self.original_bounds.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_builder() {
        let id = Uuid::new_v4();
        let update = ElementUpdate::new(id);
        assert!(update.is_empty());
        let update = update.with_position(1.0, 2.0).with_angle(0.5);
        assert!(!update.is_empty());
        assert_eq!(update.x, Some(1.0));
        assert_eq!(update.width, None);
    }
}
