//! CSV result sets.

use std::io::Read;

use crate::column::DataType;
use crate::cursor::{CachedRowSet, Row};
use crate::error::LayoutError;
use crate::value::{parse_decimal, Value};
use crate::Result;

/// Read a result set from CSV with a header row.
///
/// Empty cells are null. With `data_types`, NUMERIC columns are parsed as
/// exact decimals and a cell that does not parse is an error; every other
/// cell is text.
pub fn from_csv_reader(reader: impl Read, data_types: Option<&[DataType]>) -> Result<CachedRowSet> {
    let mut rdr = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(::csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    if let Some(types) = data_types {
        if types.len() != columns.len() {
            return Err(LayoutError::ColumnCountMismatch {
                expected: types.len(),
                actual: columns.len(),
            });
        }
    }

    let mut rows: Vec<Row> = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let row = record
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let data_type = data_types.map_or(DataType::Other, |t| t[i]);
                to_value(field, data_type, &columns[i])
            })
            .collect::<Result<Row>>()?;
        rows.push(row);
    }

    CachedRowSet::new(columns, rows)
}

fn to_value(field: &str, data_type: DataType, column: &str) -> Result<Value> {
    if field.is_empty() {
        return Ok(Value::Null);
    }
    match data_type {
        DataType::Numeric => parse_decimal(field)
            .map(Value::Number)
            .ok_or_else(|| LayoutError::NotNumeric {
                column: column.to_string(),
                value: field.to_string(),
            }),
        DataType::Other => Ok(Value::Text(field.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::RowCursor;

    const SALES: &str = "region, city, amount\nEast,Boston,10.50\nEast,,\nWest,Reno,3\n";

    #[test]
    fn test_typed_columns() {
        let types = [DataType::Other, DataType::Other, DataType::Numeric];
        let mut rs = from_csv_reader(SALES.as_bytes(), Some(&types)).unwrap();
        assert_eq!(rs.column_names(), &["region", "city", "amount"]);
        assert_eq!(rs.row_count(), 3);

        rs.advance();
        assert_eq!(rs.string(2).unwrap().as_deref(), Some("10.50"));
        assert!(matches!(rs.value(2).unwrap(), Value::Number(_)));

        rs.advance();
        assert_eq!(rs.value(1).unwrap(), &Value::Null);
        assert_eq!(rs.value(2).unwrap(), &Value::Null);
    }

    #[test]
    fn test_untyped_columns_are_text() {
        let mut rs = from_csv_reader(SALES.as_bytes(), None).unwrap();
        rs.advance();
        assert_eq!(rs.value(2).unwrap(), &Value::text("10.50"));
    }

    #[test]
    fn test_bad_number() {
        let types = [DataType::Numeric];
        let result = from_csv_reader("amount\nabc\n".as_bytes(), Some(&types));
        assert!(matches!(result, Err(LayoutError::NotNumeric { .. })));
    }

    #[test]
    fn test_type_count_mismatch() {
        let types = [DataType::Numeric];
        let result = from_csv_reader(SALES.as_bytes(), Some(&types));
        assert!(matches!(
            result,
            Err(LayoutError::ColumnCountMismatch {
                expected: 1,
                actual: 3
            })
        ));
    }
}
