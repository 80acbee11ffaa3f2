//! Core business logic module
//!
//! This module contains the batch processing components:
//! - `traits` - Boundaries to the source, persister and notifier
//! - `aggregate` - Accumulated debit/credit lists, balance and histogram
//! - `row_parser` - Row parsing and classification
//! - `pipeline` - Orchestration from fetch to notification

pub mod aggregate;
pub mod pipeline;
pub mod row_parser;
pub mod traits;

pub use aggregate::Aggregate;
pub use pipeline::{PersistHook, Pipeline};
pub use row_parser::{parse_row, process_record};
pub use traits::{Notifier, Persister, RecordSource};
