//! Fonts and font metrics.
//!
//! The engine never measures text itself. Callers supply a [`FontMetrics`]
//! implementation for the surface the pages will be painted on.

use serde::{Deserialize, Serialize};

/// A font description carried on every cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: u32,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new("SansSerif", 10)
    }
}

impl FontSpec {
    /// Create a plain font.
    pub fn new(family: impl Into<String>, size: u32) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }

    /// Same font with bold forced on.
    pub fn bolded(&self) -> Self {
        Self {
            bold: true,
            ..self.clone()
        }
    }

    /// Same font with italic flipped.
    pub fn italic_toggled(&self) -> Self {
        Self {
            italic: !self.italic,
            ..self.clone()
        }
    }
}

/// Text measurement for a painting surface.
pub trait FontMetrics {
    /// Height of one line of text, including leading
    fn line_height(&self, font: &FontSpec) -> i32;

    /// Advance width of `text`
    fn string_width(&self, font: &FontSpec, text: &str) -> i32;
}

/// Fixed-pitch metrics: every character has the same width and every font
/// the same line height.
///
/// Useful for text output and for tests. With `char_width == 1` and
/// `line_height == 1` layout units are character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonospaceMetrics {
    pub char_width: i32,
    pub line_height: i32,
}

impl MonospaceMetrics {
    pub fn new(char_width: i32, line_height: i32) -> Self {
        Self {
            char_width,
            line_height,
        }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(7, 12)
    }
}

impl FontMetrics for MonospaceMetrics {
    fn line_height(&self, _font: &FontSpec) -> i32 {
        self.line_height
    }

    fn string_width(&self, _font: &FontSpec, text: &str) -> i32 {
        self.char_width * text.chars().count() as i32
    }
}
