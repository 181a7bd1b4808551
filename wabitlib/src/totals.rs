//! Running totals at three nested levels: grand, section and per-group.
//!
//! All sums are exact decimals. A [`TotalsVector`] holds one entry per
//! column; columns that do not accumulate hold `None` for the whole run, so
//! a reset only ever zeroes the active entries.
//!
//! The tracker is a plain value: the layout engine feeds it rows with
//! [`TotalsTracker::accumulate`] and pulls snapshots out with the `flush_*`
//! methods whenever a totals line is due.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::column::{ColumnSpec, DataType};
use crate::error::LayoutError;
use crate::options::NullSubtotals;
use crate::value::Value;
use crate::Result;

/// One nullable running sum per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsVector(Vec<Option<Decimal>>);

impl TotalsVector {
    /// A vector with a zero sum where `active` is true and `None` elsewhere.
    pub fn zeroed(active: impl IntoIterator<Item = bool>) -> Self {
        Self(
            active
                .into_iter()
                .map(|on| on.then_some(Decimal::ZERO))
                .collect(),
        )
    }

    /// Sum for a column, `None` if the column does not accumulate
    pub fn get(&self, column: usize) -> Option<Decimal> {
        self.0.get(column).copied().flatten()
    }

    pub fn values(&self) -> &[Option<Decimal>] {
        &self.0
    }

    /// Check if at least one column accumulates
    pub fn has_totals(&self) -> bool {
        self.0.iter().any(Option::is_some)
    }

    /// Add to a column's sum. Returns `false`, leaving the sum unchanged, if
    /// the result is out of decimal range.
    fn add(&mut self, column: usize, amount: Decimal) -> bool {
        if let Some(Some(sum)) = self.0.get_mut(column) {
            match sum.checked_add(amount) {
                Some(total) => *sum = total,
                None => return false,
            }
        }
        true
    }

    fn reset(&mut self) {
        for sum in self.0.iter_mut().flatten() {
            *sum = Decimal::ZERO;
        }
    }
}

/// A flushed totals snapshot, ready to be rendered as a totals line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsLine {
    /// Text after the `"Total: "` prefix; empty for the grand total
    pub label: String,
    /// Column whose x position anchors the label
    pub anchor_column: usize,
    pub totals: TotalsVector,
}

/// Tracks grand, section and per-group totals for one layout run.
#[derive(Debug, Clone)]
pub struct TotalsTracker {
    names: Vec<String>,
    grand_columns: Vec<bool>,
    subtotal_columns: Vec<bool>,
    grand: TotalsVector,
    section: TotalsVector,
    groups: BTreeMap<usize, TotalsVector>,
    null_subtotals: NullSubtotals,
}

impl TotalsTracker {
    /// Create a tracker for `columns`.
    ///
    /// NUMERIC columns accumulate into the grand totals; `will_subtotal`
    /// columns accumulate into the section totals and into one vector per
    /// GROUP column.
    pub fn new(columns: &[ColumnSpec], null_subtotals: NullSubtotals) -> Self {
        let grand_columns: Vec<bool> = columns
            .iter()
            .map(|c| c.data_type == DataType::Numeric)
            .collect();
        let subtotal_columns: Vec<bool> = columns.iter().map(|c| c.will_subtotal).collect();

        let groups = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_group())
            .map(|(i, _)| (i, TotalsVector::zeroed(subtotal_columns.iter().copied())))
            .collect();

        Self {
            names: columns.iter().map(|c| c.name.clone()).collect(),
            grand: TotalsVector::zeroed(grand_columns.iter().copied()),
            section: TotalsVector::zeroed(subtotal_columns.iter().copied()),
            grand_columns,
            subtotal_columns,
            groups,
            null_subtotals,
        }
    }

    /// Add one row to every open total.
    ///
    /// Grand totals count a null as zero. A null in a subtotal column is
    /// governed by the [`NullSubtotals`] policy. A sum leaving the decimal
    /// range is a [`LayoutError::TotalOverflow`]. The row is validated in full
    /// before any sum changes, so a failing row contributes nothing.
    pub fn accumulate(&mut self, row: &[Value], row_number: usize) -> Result<()> {
        let mut grand = Vec::new();
        let mut subtotals = Vec::new();

        for (column, value) in row.iter().enumerate() {
            let accumulates_grand = self.grand_columns.get(column).copied().unwrap_or(false);
            let accumulates_sub = self.subtotal_columns.get(column).copied().unwrap_or(false);
            if !accumulates_grand && !accumulates_sub {
                continue;
            }

            let amount = if value.is_null() {
                None
            } else {
                Some(self.decimal_of(column, value)?)
            };

            if accumulates_grand {
                grand.push((column, amount.unwrap_or(Decimal::ZERO)));
            }
            if accumulates_sub {
                match (amount, self.null_subtotals) {
                    (Some(amount), _) => subtotals.push((column, amount)),
                    (None, NullSubtotals::Skip) => {}
                    (None, NullSubtotals::Reject) => {
                        return Err(LayoutError::NullSubtotal {
                            column: self.names[column].clone(),
                            row: row_number,
                        });
                    }
                }
            }
        }

        let mut next_grand = self.grand.clone();
        let mut next_section = self.section.clone();
        let mut next_groups = self.groups.clone();
        for (column, amount) in grand {
            if !next_grand.add(column, amount) {
                return Err(self.overflow(column, row_number));
            }
        }
        for (column, amount) in subtotals {
            let fits = next_section.add(column, amount)
                && next_groups
                    .values_mut()
                    .all(|group| group.add(column, amount));
            if !fits {
                return Err(self.overflow(column, row_number));
            }
        }

        self.grand = next_grand;
        self.section = next_section;
        self.groups = next_groups;
        Ok(())
    }

    fn overflow(&self, column: usize, row: usize) -> LayoutError {
        LayoutError::TotalOverflow {
            column: self.names[column].clone(),
            row,
        }
    }

    fn decimal_of(&self, column: usize, value: &Value) -> Result<Decimal> {
        value.to_decimal().ok_or_else(|| LayoutError::NotNumeric {
            column: self.names[column].clone(),
            value: value.to_string(),
        })
    }

    /// GROUP column indexes, innermost (highest index) first.
    pub fn group_columns_desc(&self) -> Vec<usize> {
        self.groups.keys().rev().copied().collect()
    }

    /// Snapshot and reset the section totals.
    pub fn flush_section(&mut self, label: impl Into<String>) -> TotalsLine {
        let totals = self.section.clone();
        self.section.reset();
        TotalsLine {
            label: label.into(),
            anchor_column: 0,
            totals,
        }
    }

    /// Snapshot and reset the totals of one GROUP column.
    ///
    /// Returns `None` if `column` is not a GROUP column.
    pub fn flush_group(&mut self, column: usize, label: impl Into<String>) -> Option<TotalsLine> {
        let group = self.groups.get_mut(&column)?;
        let totals = group.clone();
        group.reset();
        Some(TotalsLine {
            label: label.into(),
            anchor_column: column,
            totals,
        })
    }

    /// Snapshot of the grand totals. Grand totals are never reset.
    pub fn flush_grand(&self) -> TotalsLine {
        TotalsLine {
            label: String::new(),
            anchor_column: 0,
            totals: self.grand.clone(),
        }
    }
}
