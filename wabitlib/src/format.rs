//! Value formatting for report cells.
//!
//! Columns may carry a formatter that turns a value (or a total) into its
//! display string. Formatting is an injected concern: any type implementing
//! [`ValueFormatter`] can be attached to a column, and its failures propagate
//! out of the layout unchanged.
//!
//! [`NumberFormat`] is the serializable set of built-in formats used by
//! report definitions. All of them work on exact decimals.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::Value;

/// A formatter could not render a value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct FormatError {
    pub message: String,
}

impl FormatError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Turns a column value into its display string.
///
/// The layout only calls formatters for non-null data values and for
/// computed totals (passed as [`Value::Number`]).
pub trait ValueFormatter: fmt::Debug + Send + Sync {
    fn format(&self, value: &Value) -> Result<String, FormatError>;
}

/// Built-in number formats.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NumberFormat {
    /// Shortest exact representation, trailing zeros removed
    #[default]
    General,
    /// Fixed number of decimal places
    Number {
        decimal_places: u32,
        #[serde(default)]
        use_thousands_separator: bool,
    },
    /// Currency with a leading symbol; negatives in parentheses
    Currency {
        decimal_places: u32,
        #[serde(default = "default_currency_symbol")]
        symbol: String,
    },
    /// Value multiplied by 100 with a trailing percent sign
    Percentage { decimal_places: u32 },
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl ValueFormatter for NumberFormat {
    fn format(&self, value: &Value) -> Result<String, FormatError> {
        let number = value
            .to_decimal()
            .ok_or_else(|| FormatError::new(format!("'{}' is not a number", value)))?;

        Ok(match self {
            NumberFormat::General => number.normalize().to_string(),
            NumberFormat::Number {
                decimal_places,
                use_thousands_separator,
            } => {
                let fixed = fixed_places(number, *decimal_places);
                if *use_thousands_separator {
                    add_thousands_separator(&fixed)
                } else {
                    fixed
                }
            }
            NumberFormat::Currency {
                decimal_places,
                symbol,
            } => {
                let amount = add_thousands_separator(&fixed_places(number.abs(), *decimal_places));
                if number.is_sign_negative() && !number.is_zero() {
                    format!("({}{})", symbol, amount)
                } else {
                    format!("{}{}", symbol, amount)
                }
            }
            NumberFormat::Percentage { decimal_places } => {
                let percent = number.checked_mul(Decimal::ONE_HUNDRED).ok_or_else(|| {
                    FormatError::new(format!("'{}' is too large to show as a percentage", value))
                })?;
                format!("{}%", fixed_places(percent, *decimal_places))
            }
        })
    }
}

/// Round half away from zero and render exactly `places` decimals.
fn fixed_places(number: Decimal, places: u32) -> String {
    let mut rounded = number.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(places);
    rounded.to_string()
}

/// Add thousands separators to the integer part of a numeric string.
fn add_thousands_separator(s: &str) -> String {
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (s, None),
    };

    let negative = integer_part.starts_with('-');
    let digits: Vec<char> = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut result = String::new();
    if negative {
        result.push('-');
    }
    let len = digits.len();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    if let Some(decimal) = decimal_part {
        result.push('.');
        result.push_str(decimal);
    }

    result
}
