//! Result-set sources: load rows for the layout engine.
//!
//! This module handles the first stage of the pipeline - turning a file on
//! disk into a [`CachedRowSet`]. It provides:
//!
//! - **JSON**: `{ "columns": [..], "rows": [[..], ..] }` documents
//! - **CSV**: a header row of column names followed by data rows
//!
//! ## Example
//!
//! ```rust,ignore
//! use wabitlib::source::load_result_set;
//!
//! let rows = load_result_set("sales.csv".as_ref(), Some(&data_types))?;
//! ```

pub mod csv;
pub mod json;

use std::fs::File;
use std::path::Path;

use crate::column::DataType;
use crate::cursor::CachedRowSet;
use crate::error::LayoutError;
use crate::Result;

pub use self::csv::from_csv_reader;
pub use self::json::{from_json_reader, from_json_str};

/// Load a result set from a `.csv` or JSON file.
///
/// `data_types`, when given, types CSV cells: NUMERIC columns are parsed as
/// exact decimals. JSON values keep their native JSON types.
pub fn load_result_set(path: &Path, data_types: Option<&[DataType]>) -> Result<CachedRowSet> {
    let file = File::open(path).map_err(|e| LayoutError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    tracing::debug!(path = %path.display(), csv = is_csv, "loading result set");
    if is_csv {
        from_csv_reader(file, data_types)
    } else {
        from_json_reader(file)
    }
}
