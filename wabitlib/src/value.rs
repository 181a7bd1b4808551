//! Cell values read from a result set.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

/// A single typed value in a result-set row.
///
/// Numbers are held as exact decimals so totals never pick up floating-point
/// rounding. Equality is value equality: `Null == Null`, and numbers compare
/// numerically (`1.0 == 1.00`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Value {
    /// SQL NULL
    #[default]
    Null,
    /// Boolean value
    Boolean(bool),
    /// Exact decimal number
    Number(Decimal),
    /// Any other value, in its string form
    Text(String),
}

impl Value {
    /// Create a text value
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Create a numeric value from anything convertible to a decimal
    pub fn number(n: impl Into<Decimal>) -> Self {
        Value::Number(n.into())
    }

    /// Check if this is the null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The native string form of the value, `None` for null.
    ///
    /// This is what a formatter-less column displays.
    pub fn as_display(&self) -> Option<String> {
        match self {
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Read the value as an exact decimal.
    ///
    /// Returns `None` for null and for values with no numeric reading. Text
    /// is parsed, so a numeric column loaded from a text source still totals
    /// exactly.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => parse_decimal(s),
            Value::Null | Value::Boolean(_) => None,
        }
    }
}

/// Parse a decimal, accepting scientific notation as a fallback.
pub(crate) fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Decimal> for Value {
    fn from(n: Decimal) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(Decimal::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Decimal::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_equality_ignores_scale() {
        let a = Value::Number(Decimal::from_str("1.0").unwrap());
        let b = Value::Number(Decimal::from_str("1.00").unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn test_null_equals_null() {
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Null, Value::text("null"));
    }

    #[test]
    fn test_as_display() {
        assert_eq!(Value::Null.as_display(), None);
        assert_eq!(Value::from(42).as_display(), Some("42".to_string()));
        assert_eq!(Value::text("East").as_display(), Some("East".to_string()));
        assert_eq!(Value::from(true).as_display(), Some("true".to_string()));
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(Value::Null.to_decimal(), None);
        assert_eq!(Value::from(7).to_decimal(), Some(Decimal::from(7)));
        assert_eq!(
            Value::text(" 2.50 ").to_decimal(),
            Some(Decimal::from_str("2.50").unwrap())
        );
        assert_eq!(Value::text("1e3").to_decimal(), Some(Decimal::from(1000)));
        assert!(Value::text("abc").to_decimal().is_none());
        assert!(Value::from(false).to_decimal().is_none());
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::text("x"));
    }
}
