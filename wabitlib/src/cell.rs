//! Positioned, styled cells: the engine's output unit.
//!
//! A [`Cell`] carries everything a painter needs (text, font, rectangle,
//! padding, alignment and border edges) so no further layout decisions are
//! made downstream. Cells are never changed once placed on a page; moving a
//! cell to another page builds a new one with [`Cell::translated_to`].

use serde::{Deserialize, Serialize};

use crate::column::HorizontalAlignment;
use crate::font::FontSpec;

/// Rectangle in page-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// y coordinate just below the rectangle
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Padding between a cell's edge and its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Insets {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Insets {
    pub fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Same padding on every side
    pub fn uniform(n: i32) -> Self {
        Self::new(n, n, n, n)
    }

    /// left + right
    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// top + bottom
    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}

/// One side of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderEdge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Weight of the line drawn on an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderLine {
    #[default]
    None,
    Single,
    Double,
}

/// Border lines of a cell, per edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Borders {
    pub top: BorderLine,
    pub bottom: BorderLine,
    pub left: BorderLine,
    pub right: BorderLine,
}

impl Borders {
    /// No borders at all
    pub fn none() -> Self {
        Self::default()
    }

    /// Builder: draw `line` on `edge`
    pub fn with(mut self, edge: BorderEdge, line: BorderLine) -> Self {
        *self.edge_mut(edge) = line;
        self
    }

    /// Builder: draw a single line on `edge`
    pub fn with_edge(self, edge: BorderEdge) -> Self {
        self.with(edge, BorderLine::Single)
    }

    /// Line drawn on `edge`
    pub fn edge(&self, edge: BorderEdge) -> BorderLine {
        match edge {
            BorderEdge::Top => self.top,
            BorderEdge::Bottom => self.bottom,
            BorderEdge::Left => self.left,
            BorderEdge::Right => self.right,
        }
    }

    fn edge_mut(&mut self, edge: BorderEdge) -> &mut BorderLine {
        match edge {
            BorderEdge::Top => &mut self.top,
            BorderEdge::Bottom => &mut self.bottom,
            BorderEdge::Left => &mut self.left,
            BorderEdge::Right => &mut self.right,
        }
    }

    /// Check if any line is drawn on `edge`
    pub fn has(&self, edge: BorderEdge) -> bool {
        self.edge(edge) != BorderLine::None
    }

    /// Edges that carry a line, in top, bottom, left, right order
    pub fn edges(&self) -> Vec<BorderEdge> {
        [
            BorderEdge::Top,
            BorderEdge::Bottom,
            BorderEdge::Left,
            BorderEdge::Right,
        ]
        .into_iter()
        .filter(|e| self.has(*e))
        .collect()
    }

    /// Check if no edge carries a line
    pub fn is_empty(&self) -> bool {
        self.edges().is_empty()
    }
}

/// A rendering-ready cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    text: String,
    font: FontSpec,
    bounds: Rect,
    padding: Insets,
    alignment: HorizontalAlignment,
    borders: Borders,
}

impl Cell {
    /// Create a left-aligned, unpadded, borderless cell.
    pub fn new(text: impl Into<String>, font: FontSpec, bounds: Rect) -> Self {
        Self {
            text: text.into(),
            font,
            bounds,
            padding: Insets::default(),
            alignment: HorizontalAlignment::Left,
            borders: Borders::none(),
        }
    }

    /// Builder: set padding
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    /// Builder: set alignment
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Builder: set borders
    pub fn with_borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn padding(&self) -> Insets {
        self.padding
    }

    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    pub fn borders(&self) -> Borders {
        self.borders
    }

    /// A copy of this cell moved vertically to `y`, keeping its x.
    pub fn translated_to(&self, y: i32) -> Cell {
        Cell {
            bounds: Rect {
                y,
                ..self.bounds
            },
            ..self.clone()
        }
    }
}

/// Tallest cell in a batch, 0 for an empty batch.
pub fn max_height(cells: &[Cell]) -> i32 {
    cells.iter().map(|c| c.bounds.height).max().unwrap_or(0)
}
