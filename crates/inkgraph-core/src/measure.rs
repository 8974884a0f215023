//! Text measurement.
//!
//! Glyph metrics belong to the host (a canvas, a font rasterizer). The engine
//! only sees the [`TextMeasurer`] trait and falls back to a character-count
//! heuristic when no host surface is available.

use crate::elements::Text;
use kurbo::Size;

/// Padding added to the measured width of a text block.
pub const TEXT_PADDING: f64 = 10.0;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_RATIO: f64 = 1.2;

/// Average glyph advance as a multiple of the font size.
pub const CHAR_WIDTH_RATIO: f64 = 0.6;

/// Measures a run of text.
pub trait TextMeasurer {
    /// Size of `text` (possibly multi-line) at the given font.
    fn measure(&self, text: &str, font_size: f64, font_family: &str) -> Size;
}

/// Heuristic measurer for non-interactive contexts.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackMeasurer;

impl TextMeasurer for FallbackMeasurer {
    fn measure(&self, text: &str, font_size: f64, _font_family: &str) -> Size {
        let lines: Vec<&str> = text.split('\n').collect();
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        Size::new(
            widest as f64 * font_size * CHAR_WIDTH_RATIO,
            lines.len().max(1) as f64 * font_size * LINE_HEIGHT_RATIO,
        )
    }
}

/// Box a text block occupies: widest line plus padding, one line height per
/// line.
pub fn text_dimensions(
    text: &str,
    font_size: f64,
    font_family: &str,
    measurer: &dyn TextMeasurer,
) -> Size {
    let lines: Vec<&str> = text.split('\n').collect();
    let widest = lines
        .iter()
        .map(|line| measurer.measure(line, font_size, font_family).width)
        .fold(0.0, f64::max);
    Size::new(
        widest + TEXT_PADDING,
        lines.len().max(1) as f64 * font_size * LINE_HEIGHT_RATIO,
    )
}

/// [`text_dimensions`] for a text element's own content and font.
pub fn measure_text_element(text: &Text, measurer: &dyn TextMeasurer) -> Size {
    text_dimensions(&text.text, text.font_size, &text.font_family, measurer)
}

/// Whether a text element left empty after editing should be removed.
pub fn should_delete_empty_text(text: &Text) -> bool {
    text.is_blank()
}
