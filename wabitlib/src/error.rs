//! Error types for wabitlib

use std::path::PathBuf;
use thiserror::Error;

use crate::format::FormatError;

/// Errors that can occur while loading a result set or laying out a report
#[derive(Error, Debug)]
pub enum LayoutError {
    /// `layout()` was called a second time on the same engine
    #[error(
        "the layout of a report can only be done once; create a new layout if a new one is needed"
    )]
    AlreadyLaidOut,

    /// The column specs do not describe the cursor's columns
    #[error("column specs describe {expected} columns but the result set has {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },

    /// A row after the first was reached with no section key recorded
    #[error("the section key was undefined at row {row}; rows were visited out of order")]
    UndefinedSectionKey { row: usize },

    /// The cursor is not positioned on a row
    #[error("the cursor is not positioned on a row")]
    NoCurrentRow,

    /// Column index outside the cursor's columns
    #[error("column {column} is out of range for a result set with {count} columns")]
    ColumnOutOfRange { column: usize, count: usize },

    /// A value in a totalled column could not be read as a decimal
    #[error("column '{column}' holds non-numeric value '{value}' and cannot be totalled")]
    NotNumeric { column: String, value: String },

    /// A null value reached a subtotal under the reject policy
    #[error("null value in subtotal column '{column}' at row {row}")]
    NullSubtotal { column: String, row: usize },

    /// A running total left the exact decimal range
    #[error("total of column '{column}' overflowed at row {row}")]
    TotalOverflow { column: String, row: usize },

    /// An injected formatter failed
    #[error("failed to format a value of column '{column}': {source}")]
    Format {
        column: String,
        #[source]
        source: FormatError,
    },

    /// Failed to read an input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed JSON input
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed CSV input
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Report definition or result set is inconsistent
    #[error("invalid report definition: {0}")]
    InvalidDefinition(String),
}
