//! Aggregation strategy module
//!
//! This module defines the Strategy pattern for the aggregation stage: the
//! part of the pipeline that turns decoded rows into a merged `Aggregate`.
//! Two implementations can be selected at runtime:
//!
//! - **sequential**: a single fold on the calling thread
//! - **concurrent**: a dispatcher feeding a fixed pool of worker threads
//!
//! Both produce the same aggregate for the same rows, up to the order of
//! transactions within each category list.

use crate::cli::StrategyType;
use crate::core::Aggregate;
use crate::types::{PipelineError, Row};
use std::fmt::Debug;
use std::sync::Arc;

pub mod concurrent;
pub mod sequential;

pub use concurrent::{ConcurrentStrategy, PoolConfig, DEFAULT_POOL_SIZE};
pub use sequential::SequentialStrategy;

/// Aggregation strategy trait
///
/// Implementations block the calling thread until every row has been
/// folded or the first error has been reported.
pub trait AggregationStrategy: Send + Sync + Debug {
    /// Aggregate decoded rows
    ///
    /// # Arguments
    ///
    /// * `rows` - Every decoded row; row 0 is the header and is skipped
    ///
    /// # Returns
    ///
    /// * `Ok(Aggregate)` - Every data row was parsed and folded
    /// * `Err(PipelineError)` - The first error reported; no partial aggregate is returned
    fn aggregate(&self, rows: Vec<Row>) -> Result<Aggregate, PipelineError>;
}

/// Create an aggregation strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of strategy to create
/// * `config` - Optional pool configuration (ignored for sequential)
///
/// # Returns
///
/// A shared trait object implementing `AggregationStrategy`
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<PoolConfig>,
) -> Arc<dyn AggregationStrategy> {
    match strategy_type {
        StrategyType::Sequential => Arc::new(SequentialStrategy),
        StrategyType::Concurrent => {
            let config = config.unwrap_or_default();
            Arc::new(ConcurrentStrategy::new(config))
        }
    }
}
