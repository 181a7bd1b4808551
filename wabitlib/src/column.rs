//! Column model: how each result-set column is formatted, sized and grouped.
//!
//! The list of [`ColumnSpec`]s is fixed for a layout run and must describe
//! exactly the columns of the row cursor, in order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::format::ValueFormatter;

/// Data type of a column, as far as totalling is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// Numeric column; accumulates into grand totals
    Numeric,
    /// Anything else
    #[default]
    Other,
}

/// Role a column plays in sectioning the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOrBreak {
    /// Plain column
    #[default]
    None,
    /// Shown, but repeated consecutive values are collapsed and subtotalled
    Group,
    /// Defines section boundaries; hidden from rendered rows
    Break,
}

/// Horizontal alignment of text inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Description of one output column.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    /// Column name, shown in column headers and section labels
    pub name: String,
    /// Drives grand-total accumulation
    pub data_type: DataType,
    /// Width in layout units
    pub width: i32,
    /// Alignment of the column's cells
    pub alignment: HorizontalAlignment,
    /// Optional value formatter
    pub format: Option<Arc<dyn ValueFormatter>>,
    /// Whether section and group subtotals accumulate this column
    pub will_subtotal: bool,
    /// Grouping role
    pub group_or_break: GroupOrBreak,
}

impl ColumnSpec {
    /// Create a plain, left-aligned text column.
    pub fn new(name: impl Into<String>, width: i32) -> Self {
        Self {
            name: name.into(),
            data_type: DataType::Other,
            width,
            alignment: HorizontalAlignment::Left,
            format: None,
            will_subtotal: false,
            group_or_break: GroupOrBreak::None,
        }
    }

    /// Create a right-aligned numeric column.
    pub fn numeric(name: impl Into<String>, width: i32) -> Self {
        Self::new(name, width)
            .data_type(DataType::Numeric)
            .alignment(HorizontalAlignment::Right)
    }

    /// Builder: set the data type
    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    /// Builder: set the alignment
    pub fn alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Builder: attach a formatter
    pub fn format(mut self, format: impl ValueFormatter + 'static) -> Self {
        self.format = Some(Arc::new(format));
        self
    }

    /// Builder: subtotal this column in sections and groups
    pub fn subtotal(mut self) -> Self {
        self.will_subtotal = true;
        self
    }

    /// Builder: make this a group column
    pub fn group(mut self) -> Self {
        self.group_or_break = GroupOrBreak::Group;
        self
    }

    /// Builder: make this a section break column
    pub fn section_break(mut self) -> Self {
        self.group_or_break = GroupOrBreak::Break;
        self
    }

    /// Check if this column defines section boundaries
    pub fn is_break(&self) -> bool {
        self.group_or_break == GroupOrBreak::Break
    }

    /// Check if this column is collapsed and subtotalled as a group
    pub fn is_group(&self) -> bool {
        self.group_or_break == GroupOrBreak::Group
    }

    /// Check if this column appears in rendered rows
    pub fn is_visible(&self) -> bool {
        !self.is_break()
    }
}

/// Total width of the columns that appear in rendered rows.
pub fn visible_width(columns: &[ColumnSpec]) -> i32 {
    columns
        .iter()
        .filter(|c| c.is_visible())
        .map(|c| c.width)
        .sum()
}

/// The x offset at which column `index` starts, skipping hidden columns.
pub fn x_offset(columns: &[ColumnSpec], index: usize) -> i32 {
    columns
        .iter()
        .take(index)
        .filter(|c| c.is_visible())
        .map(|c| c.width)
        .sum()
}
