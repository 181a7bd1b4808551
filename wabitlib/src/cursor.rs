//! Row cursors over tabular result sets.
//!
//! The layout engine walks a result set forward once and needs one row of
//! lookahead. [`RowCursor`] is the minimal cursor contract it relies on;
//! [`CachedRowSet`] is the in-memory implementation.

use crate::error::LayoutError;
use crate::value::Value;
use crate::Result;

/// One row of values, one entry per column.
pub type Row = Vec<Value>;

/// A rewindable, bidirectional cursor over rows.
///
/// `advance` and `retreat` must be exact inverses: advancing and then
/// retreating (or the reverse) returns the cursor to the same row with no
/// other observable effect, including when the first move ran off either
/// end. The provided [`peek_next`](RowCursor::peek_next) depends on this.
pub trait RowCursor {
    /// Number of columns in every row
    fn column_count(&self) -> usize;

    /// Position the cursor before the first row
    fn rewind(&mut self);

    /// Move to the next row. Returns `false` once past the last row.
    fn advance(&mut self) -> bool;

    /// Move to the previous row. Returns `false` once before the first row.
    fn retreat(&mut self) -> bool;

    /// Check if the cursor is on the first row
    fn is_first(&self) -> bool;

    /// Typed value of a column in the current row
    fn value(&self, column: usize) -> Result<&Value>;

    /// Native string form of a column in the current row, `None` for null
    fn string(&self, column: usize) -> Result<Option<String>> {
        Ok(self.value(column)?.as_display())
    }

    /// Copy of the current row
    fn row(&self) -> Result<Row> {
        (0..self.column_count())
            .map(|c| self.value(c).cloned())
            .collect()
    }

    /// The row after the current one, leaving the cursor where it was.
    fn peek_next(&mut self) -> Result<Option<Row>> {
        let next = if self.advance() {
            Some(self.row()?)
        } else {
            None
        };
        self.retreat();
        Ok(next)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    BeforeFirst,
    At(usize),
    AfterLast,
}

/// An in-memory result set with a movable cursor.
#[derive(Debug, Clone)]
pub struct CachedRowSet {
    columns: Vec<String>,
    rows: Vec<Row>,
    position: Position,
}

impl CachedRowSet {
    /// Create a row set, checking that every row has one value per column.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(LayoutError::InvalidDefinition(format!(
                "row {} has {} values but the result set has {} columns",
                index + 1,
                row.len(),
                columns.len()
            )));
        }
        Ok(Self {
            columns,
            rows,
            position: Position::BeforeFirst,
        })
    }

    /// Column names in order
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// All rows, independent of the cursor position
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Zero-based index of the current row, if the cursor is on one
    pub fn current_index(&self) -> Option<usize> {
        match self.position {
            Position::At(i) => Some(i),
            _ => None,
        }
    }
}

impl RowCursor for CachedRowSet {
    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn rewind(&mut self) {
        self.position = Position::BeforeFirst;
    }

    fn advance(&mut self) -> bool {
        self.position = match self.position {
            Position::BeforeFirst if !self.rows.is_empty() => Position::At(0),
            Position::At(i) if i + 1 < self.rows.len() => Position::At(i + 1),
            _ => Position::AfterLast,
        };
        matches!(self.position, Position::At(_))
    }

    fn retreat(&mut self) -> bool {
        self.position = match self.position {
            Position::AfterLast if !self.rows.is_empty() => Position::At(self.rows.len() - 1),
            Position::At(i) if i > 0 => Position::At(i - 1),
            _ => Position::BeforeFirst,
        };
        matches!(self.position, Position::At(_))
    }

    fn is_first(&self) -> bool {
        self.position == Position::At(0)
    }

    fn value(&self, column: usize) -> Result<&Value> {
        let index = self.current_index().ok_or(LayoutError::NoCurrentRow)?;
        self.rows[index]
            .get(column)
            .ok_or(LayoutError::ColumnOutOfRange {
                column,
                count: self.columns.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CachedRowSet {
        CachedRowSet::new(
            vec!["name".to_string(), "qty".to_string()],
            vec![
                vec![Value::text("a"), Value::from(1)],
                vec![Value::text("b"), Value::Null],
                vec![Value::text("c"), Value::from(3)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_forward_iteration() {
        let mut rs = sample();
        let mut names = Vec::new();
        while rs.advance() {
            names.push(rs.string(0).unwrap().unwrap());
        }
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(!rs.advance());
    }

    #[test]
    fn test_is_first() {
        let mut rs = sample();
        assert!(!rs.is_first());
        rs.advance();
        assert!(rs.is_first());
        rs.advance();
        assert!(!rs.is_first());
    }

    #[test]
    fn test_advance_retreat_are_inverse_at_the_end() {
        let mut rs = sample();
        while rs.advance() {}
        assert!(rs.retreat());
        assert_eq!(rs.current_index(), Some(2));
        assert!(!rs.advance());
        assert!(rs.retreat());
        assert_eq!(rs.current_index(), Some(2));
    }

    #[test]
    fn test_retreat_advance_are_inverse_at_the_start() {
        let mut rs = sample();
        rs.advance();
        assert!(!rs.retreat());
        assert!(rs.advance());
        assert!(rs.is_first());
    }

    #[test]
    fn test_peek_next_restores_position() {
        let mut rs = sample();
        rs.advance();
        let next = rs.peek_next().unwrap().unwrap();
        assert_eq!(next[0], Value::text("b"));
        assert_eq!(rs.current_index(), Some(0));

        rs.advance();
        rs.advance();
        assert!(rs.peek_next().unwrap().is_none());
        assert_eq!(rs.current_index(), Some(2));
    }

    #[test]
    fn test_rewind() {
        let mut rs = sample();
        rs.advance();
        rs.advance();
        rs.rewind();
        assert_eq!(rs.current_index(), None);
        assert!(rs.advance());
        assert!(rs.is_first());
    }

    #[test]
    fn test_string_of_null_is_none() {
        let mut rs = sample();
        rs.advance();
        rs.advance();
        assert_eq!(rs.string(1).unwrap(), None);
    }

    #[test]
    fn test_value_errors() {
        let mut rs = sample();
        assert!(matches!(rs.value(0), Err(LayoutError::NoCurrentRow)));
        rs.advance();
        assert!(matches!(
            rs.value(5),
            Err(LayoutError::ColumnOutOfRange { column: 5, count: 2 })
        ));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = CachedRowSet::new(
            vec!["a".to_string()],
            vec![vec![Value::from(1), Value::from(2)]],
        );
        assert!(matches!(result, Err(LayoutError::InvalidDefinition(_))));
    }

    #[test]
    fn test_empty_row_set() {
        let mut rs = CachedRowSet::new(vec!["a".to_string()], vec![]).unwrap();
        assert!(!rs.advance());
        assert!(!rs.retreat());
        assert!(!rs.advance());
    }
}
