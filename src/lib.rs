//! Statement Digest Library
//! # Overview
//!
//! This library ingests a CSV batch of account movements, classifies every
//! row as a debit or a credit, computes the running balance and a per-month
//! movement count, then persists the rows in the background and sends a
//! summary notification.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Transaction, Summary, errors)
//! - [`cli`] - CLI arguments parsing and wiring
//! - [`core`] - Business logic components:
//!   - [`core::row_parser`] - Row parsing and classification
//!   - [`core::aggregate`] - Aggregate state and merging
//!   - [`core::pipeline`] - Fetch, aggregate, persist and notify
//! - [`strategy`] - Sequential and concurrent aggregation
//! - [`io`] - Record sources, decoding and summary output
//! - [`storage`] - Transaction persistence
//! - [`notify`] - Notification payload, rendering and transports
//! - [`logging`] - `tracing` subscriber setup
//!
//! # Classification
//!
//! - **Debit**: amount strictly greater than zero
//! - **Credit**: amount zero or negative
//!
//! # Failure Model
//!
//! A batch either produces a complete summary or exactly one error. The
//! first malformed row aborts the batch with no persistence and no
//! notification. Persistence failures are logged only; a notification
//! failure is the pipeline's failure.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod notify;
pub mod storage;
pub mod strategy;
pub mod types;

pub use core::{Aggregate, Notifier, PersistHook, Persister, Pipeline, RecordSource};
pub use io::write_summary_csv;
pub use types::{
    Category, DeliveryError, MonthlyHistogram, PipelineError, SourceError, StorageError, Summary,
    Transaction, TransactionId,
};
