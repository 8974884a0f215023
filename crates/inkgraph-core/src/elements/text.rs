//! Text element.

use super::{ElementBase, ElementId};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Default font size in world units.
pub const DEFAULT_FONT_SIZE: f64 = 20.0;

/// Default font stack.
pub const DEFAULT_FONT_FAMILY: &str = "Virgil, Segoe UI Emoji";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
}

/// Side of the target shape a bound text sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextPosition {
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

/// Attachment of a text block to a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBinding {
    pub element_id: ElementId,
    pub position: TextPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Vec2>,
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    #[serde(flatten)]
    pub base: ElementBase,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default)]
    pub vertical_align: VerticalAlign,
    #[serde(default)]
    pub binding: Option<TextBinding>,
}

impl Text {
    pub fn new(base: ElementBase) -> Self {
        Self {
            base,
            text: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            font_family: default_font_family(),
            text_align: TextAlign::default(),
            vertical_align: VerticalAlign::default(),
            binding: None,
        }
    }

    /// Number of rendered lines (at least one).
    pub fn line_count(&self) -> usize {
        self.text.split('\n').count().max(1)
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
