//! Concurrent aggregation strategy
//!
//! A dispatcher on the calling thread hands rows to a fixed pool of worker
//! threads through a zero-capacity channel, so every send waits for a worker
//! to be ready and neither side can run ahead of the other.
//!
//! # Architecture
//!
//! ```text
//! dispatcher ──rendezvous──▶ worker 0 ─┐
//!     ▲                  ├─▶ worker 1 ─┼─▶ partial aggregates ─▶ merge
//!     │                  └─▶ worker N ─┘
//!     └──────── error report (capacity 1, first error wins)
//! ```
//!
//! # Failure Handling
//!
//! Every send also watches the error-report channel. The first worker to
//! fail parks its error there and stops; the dispatcher sees it, stops
//! sending and closes the row channel. Rows already claimed by other workers
//! are still parsed, but every partial aggregate is discarded and the
//! reported error becomes the result. Later errors from other workers find
//! the report channel full and are dropped without blocking.
//!
//! # Thread Safety
//!
//! Workers never share mutable state. Each owns a private `Aggregate` that is
//! only read after its thread has been joined.

use crate::core::{process_record, Aggregate};
use crate::io::data_rows;
use crate::strategy::AggregationStrategy;
use crate::types::{PipelineError, Row};
use crossbeam::channel::{self, Receiver, Sender};
use crossbeam::select;
use std::thread;
use tracing::{debug, info, warn};

/// Default number of worker threads
pub const DEFAULT_POOL_SIZE: usize = 5;

/// Configuration for the worker pool
#[derive(Clone, Debug, PartialEq)]
pub struct PoolConfig {
    /// Number of worker threads per invocation
    pub pool_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl PoolConfig {
    /// Create a new PoolConfig, falling back to the default for a zero pool
    pub fn new(pool_size: usize) -> Self {
        let pool_size = if pool_size == 0 {
            warn!(
                requested = pool_size,
                default = DEFAULT_POOL_SIZE,
                "invalid pool_size, using default"
            );
            DEFAULT_POOL_SIZE
        } else {
            pool_size
        };

        Self { pool_size }
    }
}

/// Concurrent aggregation strategy
///
/// Spawns `pool_size` scoped threads per call; nothing outlives the call.
#[derive(Debug, Clone)]
pub struct ConcurrentStrategy {
    config: PoolConfig,
}

impl ConcurrentStrategy {
    pub fn new(config: PoolConfig) -> Self {
        Self { config }
    }

    pub fn pool_size(&self) -> usize {
        self.config.pool_size
    }
}

/// Outcome of one dispatch attempt
enum Handoff {
    Sent,
    Reported(PipelineError),
    WorkersGone,
}

impl AggregationStrategy for ConcurrentStrategy {
    fn aggregate(&self, rows: Vec<Row>) -> Result<Aggregate, PipelineError> {
        let pool_size = self.pool_size();
        let (row_sender, row_receiver) = channel::bounded::<Row>(0);
        let (error_sender, error_receiver) = channel::bounded::<PipelineError>(1);

        thread::scope(|scope| -> Result<Aggregate, PipelineError> {
            let mut workers = Vec::with_capacity(pool_size);
            let mut spawn_failure = None;

            for worker_id in 0..pool_size {
                let receiver = row_receiver.clone();
                let reporter = error_sender.clone();
                let spawned = thread::Builder::new()
                    .name(format!("row-worker-{worker_id}"))
                    .spawn_scoped(scope, move || run_worker(worker_id, receiver, reporter));

                match spawned {
                    Ok(handle) => workers.push(handle),
                    Err(e) => {
                        spawn_failure = Some(e);
                        break;
                    }
                }
            }

            // Only workers hold these ends from here on, so disconnection
            // tracks worker exits.
            drop(row_receiver);
            drop(error_sender);

            let dispatched = match spawn_failure {
                None => dispatch(data_rows(rows), row_sender, &error_receiver),
                Some(e) => {
                    drop(row_sender);
                    Err(PipelineError::internal(format!(
                        "failed to spawn worker thread: {}",
                        e
                    )))
                }
            };

            let mut partials = Vec::with_capacity(workers.len());
            let mut panicked = 0usize;
            for handle in workers {
                match handle.join() {
                    Ok(partial) => partials.push(partial),
                    Err(_) => panicked += 1,
                }
            }

            let dispatched = dispatched?;

            // A worker may fail on the last rows after dispatch has finished
            if let Ok(error) = error_receiver.try_recv() {
                return Err(error);
            }

            if panicked > 0 {
                return Err(PipelineError::internal(format!(
                    "{} worker thread(s) panicked",
                    panicked
                )));
            }

            let mut aggregate = Aggregate::new();
            for partial in partials {
                aggregate.merge(partial)?;
            }

            debug!(
                pool_size,
                dispatched,
                transactions = aggregate.len(),
                "concurrent aggregation complete"
            );
            Ok(aggregate)
        })
    }
}

/// Hand rows to the pool until exhausted or an error is reported
///
/// Consumes the sender so the row channel closes as soon as this returns,
/// whichever way it returns.
fn dispatch(
    rows: impl Iterator<Item = Row>,
    sender: Sender<Row>,
    errors: &Receiver<PipelineError>,
) -> Result<usize, PipelineError> {
    let mut dispatched = 0usize;

    for row in rows {
        // Prefer an already reported error over another send
        if let Ok(error) = errors.try_recv() {
            info!(dispatched, "error reported, halting dispatch");
            return Err(error);
        }

        let handoff = select! {
            send(sender, row) -> sent => match sent {
                Ok(()) => Handoff::Sent,
                Err(_) => Handoff::WorkersGone,
            },
            recv(errors) -> reported => match reported {
                Ok(error) => Handoff::Reported(error),
                Err(_) => Handoff::WorkersGone,
            },
        };

        match handoff {
            Handoff::Sent => dispatched += 1,
            Handoff::Reported(error) => {
                info!(dispatched, "error reported, halting dispatch");
                return Err(error);
            }
            Handoff::WorkersGone => {
                warn!(dispatched, "every worker has exited, halting dispatch");
                break;
            }
        }
    }

    Ok(dispatched)
}

/// Worker loop: parse and fold rows until the channel closes or a row fails
fn run_worker(
    worker_id: usize,
    rows: Receiver<Row>,
    errors: Sender<PipelineError>,
) -> Aggregate {
    let mut partial = Aggregate::new();

    for row in rows.iter() {
        if let Err(error) = process_record(&row, &mut partial) {
            warn!(worker_id, row = row.index, %error, "row rejected, worker stopping");
            if errors.try_send(error).is_err() {
                debug!(worker_id, "an earlier error was already reported");
            }
            break;
        }
    }

    debug!(worker_id, transactions = partial.len(), "worker finished");
    partial
}
