//! Input options for laying out a result set.
//!
//! This module contains all configuration types that control how the
//! layout engine sizes, borders and paginates a report.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::cell::Insets;
use crate::column::ColumnSpec;
use crate::font::FontSpec;

/// Extra height added where a separator line needs room: under section
/// headers, around grand totals and between sections.
pub const BORDER_LINE_SIZE: i32 = 2;

/// Extra padding on each bordered side of a cell.
pub const BORDER_INDENT: i32 = 2;

/// Which cell borders the report draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderStyle {
    /// No borders
    #[default]
    None,
    /// Top and bottom rules on every data cell
    Horizontal,
    /// Rules between columns
    Vertical,
    /// Horizontal rules and rules between columns
    Inside,
    /// Only the outer left and right edges of the table
    Outside,
    /// Every edge of every data cell
    Full,
}

impl BorderStyle {
    /// Check if data cells get top and bottom rules
    pub fn draws_horizontal(&self) -> bool {
        matches!(
            self,
            BorderStyle::Horizontal | BorderStyle::Inside | BorderStyle::Full
        )
    }

    /// Check if data cells get rules between columns
    pub fn draws_inner_vertical(&self) -> bool {
        matches!(
            self,
            BorderStyle::Vertical | BorderStyle::Inside | BorderStyle::Full
        )
    }

    /// Check if the first and last visible columns get their outer rules
    pub fn draws_outer_vertical(&self) -> bool {
        matches!(self, BorderStyle::Outside | BorderStyle::Full)
    }

    /// Padding for a cell of `column` (or for a cell spanning columns).
    ///
    /// Every cell gets 1 on each side plus [`BORDER_INDENT`] on the sides
    /// the style borders. Break columns are never drawn and get none.
    pub fn padding(&self, column: Option<&ColumnSpec>) -> Insets {
        if column.is_some_and(|c| c.is_break()) {
            return Insets::default();
        }
        let mut insets = Insets::uniform(1);
        match self {
            BorderStyle::Vertical => {
                insets.left += BORDER_INDENT;
                insets.right += BORDER_INDENT;
            }
            BorderStyle::Horizontal => {
                insets.top += BORDER_INDENT;
                insets.bottom += BORDER_INDENT;
            }
            BorderStyle::Inside | BorderStyle::Outside | BorderStyle::Full => {
                insets = Insets::uniform(1 + BORDER_INDENT);
            }
            BorderStyle::None => {}
        }
        insets
    }
}

impl FromStr for BorderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(BorderStyle::None),
            "horizontal" => Ok(BorderStyle::Horizontal),
            "vertical" => Ok(BorderStyle::Vertical),
            "inside" => Ok(BorderStyle::Inside),
            "outside" => Ok(BorderStyle::Outside),
            "full" => Ok(BorderStyle::Full),
            _ => Err(format!("Unknown border style: {}", s)),
        }
    }
}

/// What a null in a subtotalled column does to section and group totals.
///
/// Grand totals always count a null as zero; this policy only governs
/// subtotals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullSubtotals {
    /// Fail the layout with `LayoutError::NullSubtotal`
    #[default]
    Reject,
    /// Leave the subtotals unchanged for that cell
    Skip,
}

/// Options for laying out a result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Font for section headers, column headers and total labels
    pub header_font: FontSpec,
    /// Font for data cells; totals use its bold variant
    pub body_font: FontSpec,
    /// Cell border selection
    pub border_style: BorderStyle,
    /// Width available to the table; caps the section header width
    pub available_width: i32,
    /// Height of a page's content area
    pub page_height: i32,
    /// Text shown for null values without a formatter
    pub null_string: String,
    /// Whether a grand-total line ends the report
    pub grand_totals: bool,
    /// Repeat the current section header at the top of overflow pages
    pub repeat_section_header: bool,
    /// Repeat the current column headers at the top of overflow pages
    pub repeat_column_header: bool,
    /// Show repeated group values as "(value)" in italics instead of blank
    pub show_groups_as_repeat: bool,
    /// Null handling for subtotals
    pub null_subtotals: NullSubtotals,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            header_font: FontSpec::new("SansSerif", 10).bolded(),
            body_font: FontSpec::new("SansSerif", 10),
            border_style: BorderStyle::None,
            available_width: 540,
            page_height: 720,
            null_string: String::new(),
            grand_totals: false,
            repeat_section_header: true,
            repeat_column_header: true,
            show_groups_as_repeat: false,
            null_subtotals: NullSubtotals::Reject,
        }
    }
}

impl LayoutOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header font.
    pub fn header_font(mut self, font: FontSpec) -> Self {
        self.header_font = font;
        self
    }

    /// Set the body font.
    pub fn body_font(mut self, font: FontSpec) -> Self {
        self.body_font = font;
        self
    }

    /// Set the border style.
    pub fn border_style(mut self, style: BorderStyle) -> Self {
        self.border_style = style;
        self
    }

    /// Set the page content area.
    pub fn page_size(mut self, width: i32, height: i32) -> Self {
        self.available_width = width;
        self.page_height = height;
        self
    }

    /// Set the null display string.
    pub fn null_string(mut self, s: impl Into<String>) -> Self {
        self.null_string = s.into();
        self
    }

    /// Emit a grand-total line.
    pub fn grand_totals(mut self, enabled: bool) -> Self {
        self.grand_totals = enabled;
        self
    }

    /// Repeat section headers on overflow pages.
    pub fn repeat_section_header(mut self, enabled: bool) -> Self {
        self.repeat_section_header = enabled;
        self
    }

    /// Repeat column headers on overflow pages.
    pub fn repeat_column_header(mut self, enabled: bool) -> Self {
        self.repeat_column_header = enabled;
        self
    }

    /// Show repeated group values parenthesized instead of blank.
    pub fn show_groups_as_repeat(mut self, enabled: bool) -> Self {
        self.show_groups_as_repeat = enabled;
        self
    }

    /// Set the null-subtotal policy.
    pub fn null_subtotals(mut self, policy: NullSubtotals) -> Self {
        self.null_subtotals = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = LayoutOptions::default();
        assert!(opts.repeat_section_header);
        assert!(opts.repeat_column_header);
        assert!(!opts.grand_totals);
        assert!(!opts.show_groups_as_repeat);
        assert_eq!(opts.null_subtotals, NullSubtotals::Reject);
        assert!(opts.header_font.bold);
        assert!(!opts.body_font.bold);
    }

    #[test]
    fn test_builder() {
        let opts = LayoutOptions::new()
            .page_size(300, 200)
            .grand_totals(true)
            .null_string("-")
            .border_style(BorderStyle::Full)
            .repeat_column_header(false);
        assert_eq!(opts.available_width, 300);
        assert_eq!(opts.page_height, 200);
        assert!(opts.grand_totals);
        assert_eq!(opts.null_string, "-");
        assert_eq!(opts.border_style, BorderStyle::Full);
        assert!(!opts.repeat_column_header);
        assert!(opts.repeat_section_header);
    }

    #[test]
    fn test_padding_per_style() {
        assert_eq!(BorderStyle::None.padding(None), Insets::uniform(1));
        assert_eq!(
            BorderStyle::Vertical.padding(None),
            Insets::new(1, 3, 1, 3)
        );
        assert_eq!(
            BorderStyle::Horizontal.padding(None),
            Insets::new(3, 1, 3, 1)
        );
        assert_eq!(BorderStyle::Inside.padding(None), Insets::uniform(3));
        assert_eq!(BorderStyle::Outside.padding(None), Insets::uniform(3));
        assert_eq!(BorderStyle::Full.padding(None), Insets::uniform(3));
    }

    #[test]
    fn test_break_columns_have_no_padding() {
        let col = ColumnSpec::new("Region", 10).section_break();
        assert_eq!(BorderStyle::Full.padding(Some(&col)), Insets::default());
        let col = ColumnSpec::new("City", 10);
        assert_eq!(BorderStyle::Full.padding(Some(&col)), Insets::uniform(3));
    }

    #[test]
    fn test_border_predicates() {
        assert!(BorderStyle::Inside.draws_horizontal());
        assert!(BorderStyle::Inside.draws_inner_vertical());
        assert!(!BorderStyle::Inside.draws_outer_vertical());
        assert!(!BorderStyle::Outside.draws_horizontal());
        assert!(BorderStyle::Outside.draws_outer_vertical());
        assert!(BorderStyle::Full.draws_outer_vertical());
        assert!(!BorderStyle::None.draws_horizontal());
    }

    #[test]
    fn test_border_style_from_str() {
        assert_eq!(BorderStyle::from_str("full").unwrap(), BorderStyle::Full);
        assert_eq!(BorderStyle::from_str("INSIDE").unwrap(), BorderStyle::Inside);
        assert!(BorderStyle::from_str("dotted").is_err());
    }

    #[test]
    fn test_options_deserialize_partial() {
        let opts: LayoutOptions =
            serde_json::from_str(r#"{"grand_totals": true, "border_style": "horizontal"}"#)
                .unwrap();
        assert!(opts.grand_totals);
        assert_eq!(opts.border_style, BorderStyle::Horizontal);
        assert_eq!(opts.page_height, 720);
    }
}
