//! Element model for the diagram scene.
//!
//! Every element embeds an [`ElementBase`] (identity, box, angle, style) and
//! adds variant-specific payload. Relations between elements (parent/child,
//! arrow and text bindings) are stored as identifiers, never references.

mod arrow;
mod factory;
mod shape;
mod text;
mod update;

pub use arrow::{Arrow, ArrowBinding, Arrowhead};
pub use factory::{ElementOptions, ElementType, create_element};
pub use shape::{Shape, ShapeKind};
pub use text::{
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, Text, TextAlign, TextBinding, TextPosition,
    VerticalAlign,
};
pub use update::ElementUpdate;

use crate::geometry::rotated_bounding_box;
use kurbo::{Point, Rect, Size};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Fill pattern for closed shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillStyle {
    #[default]
    Hachure,
    CrossHatch,
    Solid,
}

/// Stroke dash style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Drop shadow settings. Opaque to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Shadow {
    pub enabled: bool,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Percentage, 0..=100.
    pub opacity: f64,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            enabled: false,
            blur: 10.0,
            offset_x: 0.0,
            offset_y: 2.0,
            opacity: 30.0,
        }
    }
}

/// Style properties passed through to the render surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    pub stroke_color: SerializableColor,
    /// Fill color (None = transparent).
    #[serde(default)]
    pub background_color: Option<SerializableColor>,
    #[serde(default)]
    pub fill_style: FillStyle,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_style: StrokeStyle,
    #[serde(default)]
    pub roughness: f64,
    #[serde(default)]
    pub shadow: Shadow,
}

fn default_stroke_width() -> f64 {
    2.0
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            background_color: None,
            fill_style: FillStyle::default(),
            stroke_width: default_stroke_width(),
            stroke_style: StrokeStyle::default(),
            roughness: 0.0,
            shadow: Shadow::default(),
        }
    }
}

impl ElementStyle {
    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.background_color.map(Into::into)
    }
}

fn default_opacity() -> f64 {
    100.0
}

/// Generate a seed for the hand-drawn renderer.
/// Counter mixed through a splitmix-style hash; works on WASM without an RNG.
pub fn generate_seed() -> u32 {
    use std::sync::atomic::{AtomicU32, Ordering};

    static SEED_COUNTER: AtomicU32 = AtomicU32::new(1);

    let counter = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut x = counter.wrapping_mul(0x9E3779B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EBCA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2AE35);
    x ^= x >> 16;
    x
}

/// Attributes shared by every element variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementBase {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in radians around the box center.
    #[serde(default)]
    pub angle: f64,
    #[serde(flatten)]
    pub style: ElementStyle,
    /// Percentage, 0..=100.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "generate_seed")]
    pub seed: u32,
    /// Container this element is listed in, if any.
    #[serde(default)]
    pub parent_id: Option<ElementId>,
}

impl ElementBase {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            width,
            height,
            angle: 0.0,
            style: ElementStyle::default(),
            opacity: default_opacity(),
            locked: false,
            seed: generate_seed(),
            parent_id: None,
        }
    }

    /// Unrotated box.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Axis-aligned box enclosing the rotated element.
    pub fn rotated_bounds(&self) -> Rect {
        rotated_bounding_box(self.x, self.y, self.width, self.height, self.angle)
    }

    pub(crate) fn is_finite(&self) -> bool {
        [self.x, self.y, self.width, self.height, self.angle, self.opacity]
            .iter()
            .all(|v| v.is_finite())
            && self.style.stroke_width.is_finite()
            && self.style.roughness.is_finite()
    }
}

/// Every kind of element the scene can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Element {
    Rectangle(Shape),
    Ellipse(Shape),
    Line(Shape),
    Arrow(Arrow),
    Text(Text),
}

impl Element {
    /// Wrap a shape payload in the variant for `kind`.
    pub fn from_shape(kind: ShapeKind, shape: Shape) -> Self {
        match kind {
            ShapeKind::Rectangle => Element::Rectangle(shape),
            ShapeKind::Ellipse => Element::Ellipse(shape),
            ShapeKind::Line => Element::Line(shape),
        }
    }

    pub fn base(&self) -> &ElementBase {
        match self {
            Element::Rectangle(s) | Element::Ellipse(s) | Element::Line(s) => &s.base,
            Element::Arrow(a) => &a.base,
            Element::Text(t) => &t.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut ElementBase {
        match self {
            Element::Rectangle(s) | Element::Ellipse(s) | Element::Line(s) => &mut s.base,
            Element::Arrow(a) => &mut a.base,
            Element::Text(t) => &mut t.base,
        }
    }

    pub fn id(&self) -> ElementId {
        self.base().id
    }

    pub fn parent_id(&self) -> Option<ElementId> {
        self.base().parent_id
    }

    pub fn is_locked(&self) -> bool {
        self.base().locked
    }

    /// Name of the variant as written in the `type` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Element::Rectangle(_) => "rectangle",
            Element::Ellipse(_) => "ellipse",
            Element::Line(_) => "line",
            Element::Arrow(_) => "arrow",
            Element::Text(_) => "text",
        }
    }

    pub fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            Element::Rectangle(_) => Some(ShapeKind::Rectangle),
            Element::Ellipse(_) => Some(ShapeKind::Ellipse),
            Element::Line(_) => Some(ShapeKind::Line),
            Element::Arrow(_) | Element::Text(_) => None,
        }
    }

    /// Shapes are the only container-capable and bindable variant.
    pub fn is_shape(&self) -> bool {
        self.shape_kind().is_some()
    }

    pub fn as_shape(&self) -> Option<&Shape> {
        match self {
            Element::Rectangle(s) | Element::Ellipse(s) | Element::Line(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_shape_mut(&mut self) -> Option<&mut Shape> {
        match self {
            Element::Rectangle(s) | Element::Ellipse(s) | Element::Line(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_arrow(&self) -> Option<&Arrow> {
        match self {
            Element::Arrow(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_arrow_mut(&mut self) -> Option<&mut Arrow> {
        match self {
            Element::Arrow(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Element::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Element::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Child identifiers, empty for non-containers.
    pub fn children_ids(&self) -> &[ElementId] {
        self.as_shape().map_or(&[], |s| s.children_ids.as_slice())
    }

    /// Unrotated box.
    pub fn rect(&self) -> Rect {
        self.base().rect()
    }

    /// Axis-aligned box enclosing the rotated element.
    pub fn rotated_bounds(&self) -> Rect {
        self.base().rotated_bounds()
    }

    /// Box used for containment decisions: an expanded container is judged
    /// on its pre-expansion size.
    pub fn natural_rect(&self) -> Rect {
        let base = self.base();
        let size = self.as_shape().map_or(base.size(), Shape::natural_size);
        Rect::new(base.x, base.y, base.x + size.width, base.y + size.height)
    }

    /// Apply a partial update. Locked elements are left untouched.
    /// Returns true if anything was written.
    pub fn apply_update(&mut self, update: &ElementUpdate) -> bool {
        if self.is_locked() {
            return false;
        }
        let base = self.base_mut();
        if let Some(x) = update.x {
            base.x = x;
        }
        if let Some(y) = update.y {
            base.y = y;
        }
        if let Some(width) = update.width {
            base.width = width;
        }
        if let Some(height) = update.height {
            base.height = height;
        }
        if let Some(angle) = update.angle {
            base.angle = angle;
        }
        match self {
            Element::Arrow(arrow) => {
                if let Some(points) = &update.points {
                    arrow.points = points.clone();
                }
            }
            Element::Rectangle(shape) | Element::Ellipse(shape) | Element::Line(shape) => {
                if let Some(expanded) = update.is_expanded {
                    shape.is_expanded = expanded;
                }
                if let Some(original) = update.original_bounds {
                    shape.original_bounds = original;
                }
            }
            Element::Text(_) => {}
        }
        !update.is_empty()
    }
}
