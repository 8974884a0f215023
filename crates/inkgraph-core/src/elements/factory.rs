//! Element construction with documented defaults.

use super::{
    Arrow, Element, ElementBase, ElementStyle, FillStyle, SerializableColor, Shadow, Shape,
    ShapeKind, StrokeStyle, Text,
};
use serde::{Deserialize, Serialize};

/// Variant requested from [`create_element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementType {
    Rectangle,
    Ellipse,
    Line,
    Arrow,
    Text,
}

/// Optional overrides for a new element. Unset fields take the defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementOptions {
    pub stroke_color: Option<SerializableColor>,
    /// `Some(None)` asks for an explicitly transparent fill.
    pub background_color: Option<Option<SerializableColor>>,
    pub fill_style: Option<FillStyle>,
    pub stroke_width: Option<f64>,
    pub stroke_style: Option<StrokeStyle>,
    pub roughness: Option<f64>,
    pub shadow: Option<Shadow>,
    pub opacity: Option<f64>,
    pub locked: Option<bool>,
    pub angle: Option<f64>,
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Create a new element of `kind` with a fresh id and seed.
pub fn create_element(
    kind: ElementType,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    options: &ElementOptions,
) -> Element {
    let defaults = ElementStyle::default();
    let mut base = ElementBase::new(
        finite_or(x, 0.0),
        finite_or(y, 0.0),
        finite_or(width, 0.0),
        finite_or(height, 0.0),
    );
    base.style = ElementStyle {
        stroke_color: options.stroke_color.unwrap_or(defaults.stroke_color),
        background_color: options.background_color.unwrap_or(defaults.background_color),
        fill_style: options.fill_style.unwrap_or(defaults.fill_style),
        stroke_width: finite_or(
            options.stroke_width.unwrap_or(defaults.stroke_width),
            defaults.stroke_width,
        ),
        stroke_style: options.stroke_style.unwrap_or(defaults.stroke_style),
        roughness: finite_or(options.roughness.unwrap_or(defaults.roughness), 0.0),
        shadow: options.shadow.unwrap_or(defaults.shadow),
    };
    base.opacity = finite_or(options.opacity.unwrap_or(base.opacity), 100.0).clamp(0.0, 100.0);
    base.locked = options.locked.unwrap_or(false);
    base.angle = finite_or(options.angle.unwrap_or(0.0), 0.0);

    match kind {
        ElementType::Rectangle => Element::from_shape(ShapeKind::Rectangle, Shape::new(base)),
        ElementType::Ellipse => Element::from_shape(ShapeKind::Ellipse, Shape::new(base)),
        ElementType::Line => Element::from_shape(ShapeKind::Line, Shape::new(base)),
        ElementType::Arrow => Element::Arrow(Arrow::new(base)),
        ElementType::Text => Element::Text(Text::new(base)),
    }
}
