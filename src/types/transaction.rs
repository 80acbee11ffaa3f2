//! Transaction-related types for the statement digest
//!
//! This module defines the decoded input row, the parsed transaction and the
//! category a transaction is classified into.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Transaction identifier
///
/// Parsed from the first column of each data row.
pub type TransactionId = u64;

/// English month names, indexed by `month0`
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One decoded line of the batch
///
/// Fields are kept as raw text; positions 0, 1 and 2 hold the identifier,
/// the `month/day` date and the signed amount. The index is the position of
/// the row in the decoded sequence, so the header is row 0 and the first
/// data row is row 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Position of the row in the decoded sequence
    pub index: usize,

    /// Raw field values, already trimmed
    pub fields: Vec<String>,
}

impl Row {
    pub fn new(index: usize, fields: Vec<String>) -> Self {
        Self { index, fields }
    }

    /// Raw value at `position`, or an empty string when the row is short
    pub fn field(&self, position: usize) -> &str {
        self.fields.get(position).map(String::as_str).unwrap_or("")
    }
}

/// Category a transaction is classified into
///
/// Positive amounts are debits, zero and negative amounts are credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Movements with an amount strictly greater than zero
    Debit,

    /// Movements with an amount less than or equal to zero
    Credit,
}

impl Category {
    /// Classify a signed amount
    pub fn of(amount: Decimal) -> Self {
        if amount > Decimal::ZERO {
            Category::Debit
        } else {
            Category::Credit
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Debit => "debit",
            Category::Credit => "credit",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed financial movement
///
/// The date carries no year of its own; it is anchored to year zero, which
/// is a leap year, so `2/29` is a valid date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    /// Identifier from the first column
    pub id: TransactionId,

    /// Signed amount, kept exact
    pub amount: Decimal,

    /// Calendar date anchored to year zero
    pub date: NaiveDate,
}

impl Transaction {
    pub fn new(id: TransactionId, amount: Decimal, date: NaiveDate) -> Self {
        Self { id, amount, date }
    }

    pub fn category(&self) -> Category {
        Category::of(self.amount)
    }

    /// Month number, 1 through 12
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// English name of the transaction's month
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.date.month0() as usize]
    }

    /// Date rendered back in the input's `month/day` form
    pub fn month_day(&self) -> String {
        format!("{}/{}", self.date.month(), self.date.day())
    }
}
