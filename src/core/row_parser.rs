//! Row parsing and classification
//!
//! Turns one decoded row into a `Transaction` and folds it into an
//! aggregate. Parsing is a pure function of the row, so the same row always
//! yields the same transaction and category no matter which worker handles
//! it.

use super::aggregate::Aggregate;
use crate::io::decoder::{AMOUNT_COLUMN, DATE_COLUMN, ID_COLUMN};
use crate::types::{PipelineError, Row, Transaction, TransactionId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

/// Year every `month/day` date is anchored to
///
/// Year zero is a leap year in the proleptic Gregorian calendar, so
/// February 29th is accepted.
const ANCHOR_YEAR: i32 = 0;

/// Parse a row and fold it into `aggregate`
///
/// # Arguments
///
/// * `row` - A data row (never the header)
/// * `aggregate` - Accumulator the transaction contributes to
///
/// # Returns
///
/// * `Ok(())` - The transaction was classified and counted
/// * `Err(PipelineError::Parse)` - A field was malformed; the aggregate is untouched
/// * `Err(PipelineError::ArithmeticOverflow)` - The running balance overflowed
pub fn process_record(row: &Row, aggregate: &mut Aggregate) -> Result<(), PipelineError> {
    let transaction = parse_row(row)?;
    debug!(
        row = row.index,
        id = transaction.id,
        amount = %transaction.amount,
        category = %transaction.category(),
        "row parsed"
    );
    aggregate.fold(transaction)
}

/// Parse a row into a transaction without classifying it
pub fn parse_row(row: &Row) -> Result<Transaction, PipelineError> {
    let id = parse_id(row.field(ID_COLUMN))
        .ok_or_else(|| PipelineError::parse("id", row.index, row.field(ID_COLUMN)))?;
    let date = parse_month_day(row.field(DATE_COLUMN))
        .ok_or_else(|| PipelineError::parse("date", row.index, row.field(DATE_COLUMN)))?;
    let amount = parse_amount(row.field(AMOUNT_COLUMN))
        .ok_or_else(|| PipelineError::parse("amount", row.index, row.field(AMOUNT_COLUMN)))?;

    Ok(Transaction::new(id, amount, date))
}

fn parse_id(value: &str) -> Option<TransactionId> {
    value.parse().ok()
}

/// Parse `month/day`, each part one or two digits
fn parse_month_day(value: &str) -> Option<NaiveDate> {
    let (month, day) = value.split_once('/')?;
    let month = parse_date_part(month)?;
    let day = parse_date_part(day)?;
    NaiveDate::from_ymd_opt(ANCHOR_YEAR, month, day)
}

fn parse_date_part(part: &str) -> Option<u32> {
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Parse a signed decimal, accepting plain or scientific notation
fn parse_amount(value: &str) -> Option<Decimal> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}
