//! Record decoder
//!
//! Splits the raw batch into an ordered sequence of rows.
//!
//! # Format
//!
//! - `,`-delimited text, UTF-8
//! - the first row is a header; it is decoded like any other row so that
//!   field counts are checked against it, but it is never parsed
//! - every row carries exactly three fields: id, `month/day` date, amount
//! - surrounding whitespace is trimmed from every field
//!
//! Decoding has no side effects and materializes the whole batch; batches are
//! expected to be small enough to hold in memory alongside their aggregate.

use crate::types::{PipelineError, Row};
use csv::{ReaderBuilder, Trim};

/// Number of fields every row must carry
pub const COLUMN_COUNT: usize = 3;

/// Number of leading rows that are headers rather than data
pub const HEADER_ROWS: usize = 1;

/// Column positions within a row
pub const ID_COLUMN: usize = 0;
pub const DATE_COLUMN: usize = 1;
pub const AMOUNT_COLUMN: usize = 2;

/// Decode raw bytes into rows, header included
///
/// # Arguments
///
/// * `bytes` - Raw batch content
///
/// # Returns
///
/// * `Ok(Vec<Row>)` - Every row in input order; row 0 is the header
/// * `Err(PipelineError::Decode)` - Invalid UTF-8, inconsistent field counts,
///   or a row that does not have exactly three fields
pub fn decode(bytes: &[u8]) -> Result<Vec<Row>, PipelineError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b',')
        .trim(Trim::All)
        .flexible(false)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;

        if record.len() != COLUMN_COUNT {
            let line = record.position().map(|pos| pos.line());
            return Err(PipelineError::decode(
                line,
                format!(
                    "expected {} fields per row, found {}",
                    COLUMN_COUNT,
                    record.len()
                ),
            ));
        }

        rows.push(Row::new(
            index,
            record.iter().map(str::to_string).collect(),
        ));
    }

    Ok(rows)
}

/// Iterate over data rows only, skipping the header
pub fn data_rows(rows: Vec<Row>) -> impl Iterator<Item = Row> {
    rows.into_iter().skip(HEADER_ROWS)
}
