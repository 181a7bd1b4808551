//! # wabitlib
//!
//! A report pagination and result-set layout engine. Given a tabular result
//! set, per-column formatting and grouping rules, and a fixed page content
//! area, it lays the rows out as positioned, styled cells on pages.
//!
//! ## Overview
//!
//! Columns play one of three roles:
//!
//! - **Break**: a change in any break column starts a new *section*, with a
//!   section header, a column-header row and, at its end, a subtotal line.
//!   Break columns are not shown in data rows.
//! - **Group**: shown, but a value repeated from the previous row is blanked
//!   (or shown as `"(value)"` in italics). Each group column keeps its own
//!   subtotals, closed whenever its value changes.
//! - **None**: a plain column.
//!
//! Totals are tracked at three levels (grand, section, group) with exact
//! decimal arithmetic. Pages are filled top to bottom; a logical row never
//! splits across pages, and headers are repeated on overflow pages.
//!
//! The engine does no painting and no text measurement of its own. Callers
//! supply [`FontMetrics`] for their surface and paint the returned
//! [`Page`]s.
//!
//! ## Example
//!
//! ```rust
//! use wabitlib::{ReportDefinition, ReportLayout, MonospaceMetrics, from_json_str};
//!
//! let definition = ReportDefinition::from_json_str(r#"{
//!     "columns": [
//!         { "name": "Region", "group_or_break": "break" },
//!         { "name": "Sales", "data_type": "numeric", "subtotal": true }
//!     ],
//!     "layout": { "grand_totals": true }
//! }"#).unwrap();
//!
//! let rows = from_json_str(r#"{
//!     "columns": ["Region", "Sales"],
//!     "rows": [["East", 10], ["East", 5], ["West", 7]]
//! }"#).unwrap();
//!
//! let mut layout = ReportLayout::new(
//!     rows,
//!     definition.column_specs(),
//!     definition.layout.clone(),
//!     MonospaceMetrics::default(),
//! );
//! let pages = layout.layout().unwrap();
//! let texts: Vec<&str> = pages[0].cells().iter().map(|c| c.text()).collect();
//! assert!(texts.contains(&"Region: West"));
//! assert!(texts.contains(&"Grand Total"));
//! ```

pub mod cell;
pub mod column;
pub mod cursor;
pub mod definition;
pub mod error;
pub mod font;
pub mod format;
pub mod layout;
pub mod options;
pub mod page;
pub mod section;
pub mod source;
pub mod totals;
pub mod value;

pub use cell::{BorderEdge, BorderLine, Borders, Cell, Insets, Rect};
pub use column::{ColumnSpec, DataType, GroupOrBreak, HorizontalAlignment};
pub use cursor::{CachedRowSet, Row, RowCursor};
pub use definition::{ColumnConfig, ReportDefinition};
pub use error::LayoutError;
pub use font::{FontMetrics, FontSpec, MonospaceMetrics};
pub use format::{FormatError, NumberFormat, ValueFormatter};
pub use layout::{CellRenderer, LayoutState, ReportLayout};
pub use options::{BorderStyle, LayoutOptions, NullSubtotals, BORDER_INDENT, BORDER_LINE_SIZE};
pub use page::{Page, Paginator};
pub use section::{is_new_section, section_key_of, SectionDetector, SectionKey};
pub use source::{from_csv_reader, from_json_reader, from_json_str, load_result_set};
pub use totals::{TotalsLine, TotalsTracker, TotalsVector};
pub use value::Value;

/// Result type for wabitlib operations
pub type Result<T> = std::result::Result<T, LayoutError>;
