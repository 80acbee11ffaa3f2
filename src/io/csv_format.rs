//! CSV output for batch summaries
//!
//! Writes a summary with columns: id, date, amount, category.
//! Debit rows come first, then credit rows, each sorted by id so the output
//! does not depend on how workers interleaved.
//!
//! All functions are pure apart from writing to the supplied writer.

use crate::types::{Summary, Transaction};
use serde::Serialize;
use std::io::Write;

/// One output line
#[derive(Debug, Serialize, PartialEq)]
struct SummaryRecord<'a> {
    id: u64,
    date: String,
    amount: String,
    category: &'a str,
}

impl<'a> SummaryRecord<'a> {
    fn from_transaction(transaction: &'a Transaction) -> Self {
        Self {
            id: transaction.id,
            date: transaction.month_day(),
            amount: transaction.amount.normalize().to_string(),
            category: transaction.category().as_str(),
        }
    }
}

/// Write a summary to CSV format
///
/// # Arguments
///
/// * `summary` - Summary to write
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_summary_csv(summary: &Summary, output: &mut dyn Write) -> Result<(), String> {
    use csv::WriterBuilder;

    // Header is written explicitly so an empty summary still produces one
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);

    writer
        .write_record(["id", "date", "amount", "category"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let sorted = summary.sorted();
    for transaction in sorted.debit.iter().chain(sorted.credit.iter()) {
        writer
            .serialize(SummaryRecord::from_transaction(transaction))
            .map_err(|e| format!("Failed to write summary record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
