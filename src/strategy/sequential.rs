//! Sequential aggregation strategy
//!
//! Folds every data row on the calling thread, in input order. It is the
//! reference the concurrent strategy is checked against and needs no
//! threads or channels.

use crate::core::{process_record, Aggregate};
use crate::io::data_rows;
use crate::strategy::AggregationStrategy;
use crate::types::{PipelineError, Row};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct SequentialStrategy;

impl AggregationStrategy for SequentialStrategy {
    fn aggregate(&self, rows: Vec<Row>) -> Result<Aggregate, PipelineError> {
        let mut aggregate = Aggregate::new();

        // The first malformed row aborts the batch
        for row in data_rows(rows) {
            process_record(&row, &mut aggregate)?;
        }

        debug!(transactions = aggregate.len(), "sequential aggregation complete");
        Ok(aggregate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::decode;
    use rust_decimal::Decimal;

    #[test]
    fn test_sequential_preserves_input_order() {
        let rows = decode(b"id,date,amount\n5,1/1,1\n2,1/2,2\n9,1/3,3\n").unwrap();
        let (summary, _) = SequentialStrategy.aggregate(rows).unwrap().into_summary();

        let ids: Vec<u64> = summary.debit.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![5, 2, 9]);
        assert_eq!(summary.running_balance, Decimal::new(6, 0));
    }

    #[test]
    fn test_sequential_header_only_is_empty() {
        let rows = decode(b"id,date,amount\n").unwrap();
        let aggregate = SequentialStrategy.aggregate(rows).unwrap();
        assert!(aggregate.is_empty());
        assert_eq!(aggregate.running_balance(), Decimal::ZERO);
    }

    #[test]
    fn test_sequential_stops_at_first_malformed_row() {
        let rows = decode(b"id,date,amount\n0,7/15,1\n1,7/16,oops\n2,7/17,bad\n").unwrap();
        let result = SequentialStrategy.aggregate(rows);
        assert_eq!(result, Err(PipelineError::parse("amount", 2, "oops")));
    }
}
