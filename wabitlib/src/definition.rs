//! Report definitions: the serializable description of a report's columns
//! and layout options.
//!
//! ```json
//! {
//!   "columns": [
//!     { "name": "Region", "width": 80, "group_or_break": "break" },
//!     { "name": "City", "width": 100, "group_or_break": "group" },
//!     { "name": "Sales", "data_type": "numeric", "width": 60, "subtotal": true,
//!       "format": { "kind": "currency", "decimal_places": 2 } }
//!   ],
//!   "layout": { "grand_totals": true, "border_style": "inside" }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::column::{ColumnSpec, DataType, GroupOrBreak, HorizontalAlignment};
use crate::error::LayoutError;
use crate::format::NumberFormat;
use crate::options::LayoutOptions;
use crate::Result;

fn default_width() -> i32 {
    100
}

/// One column of a report definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnConfig {
    pub name: String,
    #[serde(default)]
    pub data_type: DataType,
    #[serde(default = "default_width")]
    pub width: i32,
    /// Defaults to right for numeric columns, left otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<HorizontalAlignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<NumberFormat>,
    #[serde(default)]
    pub subtotal: bool,
    #[serde(default)]
    pub group_or_break: GroupOrBreak,
}

impl ColumnConfig {
    /// Build the column spec the layout engine consumes.
    pub fn to_spec(&self) -> ColumnSpec {
        let mut spec = ColumnSpec::new(&self.name, self.width).data_type(self.data_type);
        spec = spec.alignment(self.alignment.unwrap_or(match self.data_type {
            DataType::Numeric => HorizontalAlignment::Right,
            DataType::Other => HorizontalAlignment::Left,
        }));
        if let Some(format) = &self.format {
            spec = spec.format(format.clone());
        }
        if self.subtotal {
            spec = spec.subtotal();
        }
        spec.group_or_break = self.group_or_break;
        spec
    }
}

/// Columns plus layout options for one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDefinition {
    pub columns: Vec<ColumnConfig>,
    #[serde(default)]
    pub layout: LayoutOptions,
}

impl ReportDefinition {
    /// Parse and validate a definition from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let definition: Self = serde_json::from_str(json)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Read, parse and validate a definition file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| LayoutError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "loading report definition");
        Self::from_json_str(&json)
    }

    /// Check the definition is usable.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(LayoutError::InvalidDefinition(
                "a report needs at least one column".to_string(),
            ));
        }
        if let Some(column) = self.columns.iter().find(|c| c.width < 0) {
            return Err(LayoutError::InvalidDefinition(format!(
                "column '{}' has negative width {}",
                column.name, column.width
            )));
        }
        if self.layout.page_height <= 0 {
            return Err(LayoutError::InvalidDefinition(format!(
                "page height must be positive, got {}",
                self.layout.page_height
            )));
        }
        Ok(())
    }

    /// Column specs in definition order.
    pub fn column_specs(&self) -> Vec<ColumnSpec> {
        self.columns.iter().map(ColumnConfig::to_spec).collect()
    }

    /// Data types in definition order, for typing CSV cells.
    pub fn data_types(&self) -> Vec<DataType> {
        self.columns.iter().map(|c| c.data_type).collect()
    }

    /// Check a result set's column names against the definition.
    ///
    /// A different column count is an error. Differing names only produce a
    /// warning, since columns are matched by position.
    pub fn check_result_set(&self, names: &[String]) -> Result<()> {
        if names.len() != self.columns.len() {
            return Err(LayoutError::ColumnCountMismatch {
                expected: self.columns.len(),
                actual: names.len(),
            });
        }
        for (column, name) in self.columns.iter().zip(names) {
            if !column.name.eq_ignore_ascii_case(name) {
                tracing::warn!(
                    definition = %column.name,
                    result_set = %name,
                    "column name differs from the result set"
                );
            }
        }
        Ok(())
    }
}
