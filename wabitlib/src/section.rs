//! Section/break detection.
//!
//! A section is a contiguous run of rows with equal values in every BREAK
//! column. Each row's [`SectionKey`] holds its BREAK values and a null
//! placeholder everywhere else, so two rows share a section exactly when
//! their keys are equal.

use crate::column::ColumnSpec;
use crate::error::LayoutError;
use crate::value::Value;
use crate::Result;

/// Section identity of a row: one entry per column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionKey(Vec<Value>);

impl SectionKey {
    /// Key values, one per column
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Check if the key has no non-null value
    pub fn is_all_null(&self) -> bool {
        self.0.iter().all(Value::is_null)
    }

    fn entries<'a>(&'a self, columns: &'a [ColumnSpec]) -> impl Iterator<Item = (&'a str, String)> {
        self.0
            .iter()
            .zip(columns)
            .filter_map(|(value, column)| value.as_display().map(|v| (column.name.as_str(), v)))
    }

    /// Section header text: `Name: value` pairs joined with `", "`.
    pub fn header_text(&self, columns: &[ColumnSpec]) -> String {
        self.entries(columns)
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Label for the section's total line: `" Name: value"` entries joined
    /// with `";"`.
    pub fn totals_label(&self, columns: &[ColumnSpec]) -> String {
        self.entries(columns)
            .map(|(name, value)| format!(" {}: {}", name, value))
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Compute the section key of a row.
pub fn section_key_of(row: &[Value], columns: &[ColumnSpec]) -> SectionKey {
    SectionKey(
        columns
            .iter()
            .zip(row)
            .map(|(column, value)| {
                if column.is_break() {
                    value.clone()
                } else {
                    Value::Null
                }
            })
            .collect(),
    )
}

/// Check if `current` starts a new section after `previous`.
///
/// With no previous key (the first row) a new section always starts.
pub fn is_new_section(previous: Option<&SectionKey>, current: &SectionKey) -> bool {
    previous != Some(current)
}

/// Follows section keys row by row.
#[derive(Debug, Default)]
pub struct SectionDetector {
    current: Option<SectionKey>,
}

impl SectionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key of the section currently open, if any
    pub fn current(&self) -> Option<&SectionKey> {
        self.current.as_ref()
    }

    /// Record the key of the next row and report whether it opens a section.
    ///
    /// Only the first row may arrive with no section open; any later row
    /// finding none means rows were visited out of order.
    pub fn observe(&mut self, row_number: usize, is_first: bool, key: SectionKey) -> Result<bool> {
        if !is_first && self.current.is_none() {
            return Err(LayoutError::UndefinedSectionKey { row: row_number });
        }
        if is_first || is_new_section(self.current.as_ref(), &key) {
            self.current = Some(key);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("Region", 50).section_break(),
            ColumnSpec::new("Year", 30).section_break(),
            ColumnSpec::new("City", 60).group(),
            ColumnSpec::numeric("Sales", 40).subtotal(),
        ]
    }

    fn row(region: &str, year: i64, city: &str, sales: i64) -> Vec<Value> {
        vec![
            Value::text(region),
            Value::from(year),
            Value::text(city),
            Value::from(sales),
        ]
    }

    #[test]
    fn test_key_keeps_only_break_values() {
        let key = section_key_of(&row("East", 2009, "Boston", 5), &columns());
        assert_eq!(
            key.values(),
            &[
                Value::text("East"),
                Value::from(2009),
                Value::Null,
                Value::Null
            ]
        );
    }

    #[test]
    fn test_same_section_ignores_non_break_columns() {
        let cols = columns();
        let a = section_key_of(&row("East", 2009, "Boston", 5), &cols);
        let b = section_key_of(&row("East", 2009, "Albany", 9), &cols);
        assert!(!is_new_section(Some(&a), &b));
    }

    #[test]
    fn test_new_section_on_any_break_change() {
        let cols = columns();
        let a = section_key_of(&row("East", 2009, "Boston", 5), &cols);
        let b = section_key_of(&row("East", 2010, "Boston", 5), &cols);
        assert!(is_new_section(Some(&a), &b));
        assert!(is_new_section(None, &a));
    }

    #[test]
    fn test_null_break_values_compare_equal() {
        let cols = vec![ColumnSpec::new("Region", 50).section_break()];
        let a = section_key_of(&[Value::Null], &cols);
        let b = section_key_of(&[Value::Null], &cols);
        assert!(!is_new_section(Some(&a), &b));
        assert!(a.is_all_null());
        assert_eq!(a.header_text(&cols), "");
    }

    #[test]
    fn test_header_text() {
        let cols = columns();
        let key = section_key_of(&row("East", 2009, "Boston", 5), &cols);
        assert_eq!(key.header_text(&cols), "Region: East, Year: 2009");
    }

    #[test]
    fn test_header_text_with_duplicate_values_uses_each_column_name() {
        let cols = vec![
            ColumnSpec::new("From", 10).section_break(),
            ColumnSpec::new("To", 10).section_break(),
        ];
        let key = section_key_of(&[Value::text("X"), Value::text("X")], &cols);
        assert_eq!(key.header_text(&cols), "From: X, To: X");
    }

    #[test]
    fn test_totals_label() {
        let cols = columns();
        let key = section_key_of(&row("East", 2009, "Boston", 5), &cols);
        assert_eq!(key.totals_label(&cols), " Region: East; Year: 2009");
    }

    #[test]
    fn test_detector_first_row_opens_section() {
        let cols = columns();
        let mut detector = SectionDetector::new();
        let key = section_key_of(&row("East", 2009, "Boston", 5), &cols);
        assert!(detector.observe(1, true, key.clone()).unwrap());
        assert!(!detector.observe(2, false, key).unwrap());
        let west = section_key_of(&row("West", 2009, "Reno", 5), &cols);
        assert!(detector.observe(3, false, west.clone()).unwrap());
        assert_eq!(detector.current(), Some(&west));
    }

    #[test]
    fn test_detector_rejects_missing_key_after_first_row() {
        let cols = columns();
        let mut detector = SectionDetector::new();
        let key = section_key_of(&row("East", 2009, "Boston", 5), &cols);
        let err = detector.observe(2, false, key).unwrap_err();
        assert!(matches!(err, LayoutError::UndefinedSectionKey { row: 2 }));
    }
}
