//! Container-capable shapes: rectangle, ellipse and line.

use super::{ElementBase, ElementId};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Which shape variant a [`Shape`] payload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Line,
}

/// Shared payload of the rectangle, ellipse and line variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    #[serde(flatten)]
    pub base: ElementBase,
    /// Children in attach order.
    #[serde(default)]
    pub children_ids: Vec<ElementId>,
    /// True while auto-resize has grown the box beyond its natural size.
    #[serde(default)]
    pub is_expanded: bool,
    /// Pre-expansion size, present only while expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_bounds: Option<Size>,
}

impl Shape {
    pub fn new(base: ElementBase) -> Self {
        Self {
            base,
            children_ids: Vec::new(),
            is_expanded: false,
            original_bounds: None,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children_ids.is_empty()
    }

    /// Size before any auto-expansion.
    pub fn natural_size(&self) -> Size {
        self.original_bounds.unwrap_or_else(|| self.base.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_size() {
        let mut shape = Shape::new(ElementBase::new(0.0, 0.0, 120.0, 80.0));
        assert_eq!(shape.natural_size(), Size::new(120.0, 80.0));
        shape.original_bounds = Some(Size::new(60.0, 40.0));
        assert_eq!(shape.natural_size(), Size::new(60.0, 40.0));
    }

    #[test]
    fn test_original_bounds_omitted_when_absent() {
        let shape = Shape::new(ElementBase::new(0.0, 0.0, 1.0, 1.0));
        let json = serde_json::to_value(&shape).unwrap();
        assert!(json.get("originalBounds").is_none());
        assert_eq!(json["isExpanded"], false);
    }
}
