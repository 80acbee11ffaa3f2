//! Aggregate state
//!
//! The accumulator every row is folded into: one list per category, one
//! total per category and the monthly histogram.
//!
//! # Concurrency
//!
//! An `Aggregate` is never shared. Each worker folds into a private partial
//! aggregate and the partials are merged once the pool has joined. Merging
//! is commutative and associative (list concatenation, sum, per-month
//! counts), so the merged totals do not depend on which worker handled which
//! row.
//!
//! # Overflow
//!
//! Totals are kept per category rather than as one signed running sum.
//! Every debit is positive and every credit is zero or negative, so each
//! category total only moves in one direction: any partial sum of a subset
//! is bounded by the total of the whole category. A category overflows in
//! some split of the rows exactly when it overflows in every split, which
//! makes the outcome independent of how rows were spread across workers.
//! The running balance adds two totals of opposite sign and cannot overflow.

use crate::types::{Category, MonthlyHistogram, PipelineError, Summary, Transaction};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    debit: Vec<Transaction>,
    credit: Vec<Transaction>,
    debit_total: Decimal,
    credit_total: Decimal,
    monthly: MonthlyHistogram,
}

fn checked_total(
    total: Decimal,
    amount: Decimal,
    category: Category,
) -> Result<Decimal, PipelineError> {
    total.checked_add(amount).ok_or_else(|| {
        PipelineError::arithmetic_overflow(&format!("summing {} amounts", category))
    })
}

impl Aggregate {
    /// Create an empty aggregate with a zero balance
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one transaction and account for it
    ///
    /// The category total is checked before anything is mutated, so a
    /// failed fold leaves the aggregate unchanged.
    pub fn fold(&mut self, transaction: Transaction) -> Result<(), PipelineError> {
        let category = transaction.category();
        match category {
            Category::Debit => {
                self.debit_total = checked_total(self.debit_total, transaction.amount, category)?;
            }
            Category::Credit => {
                self.credit_total = checked_total(self.credit_total, transaction.amount, category)?;
            }
        }

        self.monthly.record(transaction.month());

        match category {
            Category::Debit => self.debit.push(transaction),
            Category::Credit => self.credit.push(transaction),
        }

        Ok(())
    }

    /// Fold a partial aggregate produced by another worker into this one
    ///
    /// Both totals are checked first; on error `self` is unchanged.
    pub fn merge(&mut self, other: Aggregate) -> Result<(), PipelineError> {
        let debit_total = checked_total(self.debit_total, other.debit_total, Category::Debit)?;
        let credit_total = checked_total(self.credit_total, other.credit_total, Category::Credit)?;
        self.debit_total = debit_total;
        self.credit_total = credit_total;

        self.monthly.merge(&other.monthly);
        self.debit.extend(other.debit);
        self.credit.extend(other.credit);

        Ok(())
    }

    /// Number of transactions folded so far
    pub fn len(&self) -> usize {
        self.debit.len() + self.credit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of every folded amount
    pub fn running_balance(&self) -> Decimal {
        // Opposite signs, cannot overflow
        self.debit_total + self.credit_total
    }

    pub fn monthly(&self) -> &MonthlyHistogram {
        &self.monthly
    }

    /// Split into the externally visible summary and the monthly histogram
    pub fn into_summary(self) -> (Summary, MonthlyHistogram) {
        let running_balance = self.running_balance();
        let summary = Summary {
            debit: self.debit,
            credit: self.credit,
            debit_total: self.debit_total,
            credit_total: self.credit_total,
            running_balance,
        };
        (summary, self.monthly)
    }
}
