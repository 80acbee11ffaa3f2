//! Result types for one pipeline invocation
//!
//! This module defines the externally visible `Summary` and the monthly
//! histogram that travels beside it to the notification step.

use super::transaction::{Category, Transaction, MONTH_NAMES};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Final result of one batch
///
/// Built once from the merged aggregate after every worker has joined.
/// Order within each category list follows processing order, which is not
/// deterministic under the concurrent strategy.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    /// Transactions with a positive amount
    pub debit: Vec<Transaction>,

    /// Transactions with a zero or negative amount
    pub credit: Vec<Transaction>,

    /// Sum of the debit amounts
    pub debit_total: Decimal,

    /// Sum of the credit amounts
    pub credit_total: Decimal,

    /// Sum of every transaction amount
    #[serde(rename = "balance")]
    pub running_balance: Decimal,
}

impl Summary {
    /// Transactions of one category
    pub fn category(&self, category: Category) -> &[Transaction] {
        match category {
            Category::Debit => &self.debit,
            Category::Credit => &self.credit,
        }
    }

    /// Sum of one category, as accumulated during aggregation
    pub fn total(&self, category: Category) -> Decimal {
        match category {
            Category::Debit => self.debit_total,
            Category::Credit => self.credit_total,
        }
    }

    /// Mean amount of one category
    ///
    /// Returns zero when the category holds no transactions. Uses the
    /// already checked total, so no addition happens here.
    pub fn average(&self, category: Category) -> Decimal {
        let count = self.category(category).len();
        if count == 0 {
            return Decimal::ZERO;
        }

        self.total(category) / Decimal::from(count)
    }

    /// Debit transactions followed by credit transactions
    pub fn transactions(&self) -> Vec<Transaction> {
        let mut all = Vec::with_capacity(self.len());
        all.extend(self.debit.iter().cloned());
        all.extend(self.credit.iter().cloned());
        all
    }

    pub fn len(&self) -> usize {
        self.debit.len() + self.credit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the summary with both category lists sorted by id
    ///
    /// Used wherever output must not depend on worker interleaving.
    pub fn sorted(&self) -> Self {
        let mut sorted = self.clone();
        sorted.debit.sort_by_key(|t| t.id);
        sorted.credit.sort_by_key(|t| t.id);
        sorted
    }
}

/// Count of transactions per calendar month
///
/// Keyed by month number so iteration follows the calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlyHistogram {
    counts: BTreeMap<u32, usize>,
}

impl MonthlyHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one transaction in `month` (1 through 12)
    pub fn record(&mut self, month: u32) {
        *self.counts.entry(month).or_insert(0) += 1;
    }

    /// Fold another histogram into this one
    pub fn merge(&mut self, other: &MonthlyHistogram) {
        for (month, count) in &other.counts {
            *self.counts.entry(*month).or_insert(0) += count;
        }
    }

    /// Count for a month given by its English name
    pub fn count(&self, month_name: &str) -> usize {
        MONTH_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(month_name))
            .and_then(|month0| self.counts.get(&(month0 as u32 + 1)))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(month name, count)` pairs in calendar order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.counts
            .iter()
            .filter_map(|(month, count)| {
                MONTH_NAMES
                    .get((*month as usize).wrapping_sub(1))
                    .map(|name| (*name, *count))
            })
    }
}
