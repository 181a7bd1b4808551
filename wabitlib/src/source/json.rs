//! JSON result sets.

use std::io::Read;

use serde::Deserialize;
use serde_json::value::RawValue;

use crate::cursor::{CachedRowSet, Row};
use crate::value::{parse_decimal, Value};
use crate::Result;

/// Cells stay raw so numbers never pass through `f64`.
#[derive(Debug, Deserialize)]
struct JsonResultSet {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Box<RawValue>>>,
}

/// Parse a result set from a JSON string.
pub fn from_json_str(s: &str) -> Result<CachedRowSet> {
    let doc: JsonResultSet = serde_json::from_str(s)?;
    into_row_set(doc)
}

/// Parse a result set from a JSON reader.
pub fn from_json_reader(reader: impl Read) -> Result<CachedRowSet> {
    let doc: JsonResultSet = serde_json::from_reader(reader)?;
    into_row_set(doc)
}

fn into_row_set(doc: JsonResultSet) -> Result<CachedRowSet> {
    let rows = doc
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| to_value(cell)).collect::<Result<Row>>())
        .collect::<Result<Vec<Row>>>()?;
    CachedRowSet::new(doc.columns, rows)
}

/// Numbers are parsed from their source digits, so they stay exact decimals.
fn to_value(raw: &RawValue) -> Result<Value> {
    let text = raw.get().trim();
    if text.starts_with(|c: char| c == '-' || c.is_ascii_digit()) {
        return Ok(match parse_decimal(text) {
            Some(d) => Value::Number(d),
            None => Value::Text(text.to_string()),
        });
    }

    let json: serde_json::Value = serde_json::from_str(text)?;
    Ok(match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::String(s) => Value::Text(s),
        other => Value::Text(other.to_string()),
    })
}
