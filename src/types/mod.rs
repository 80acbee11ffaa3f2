//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transaction`: Rows, transactions and their categories
//! - `summary`: The batch summary and monthly histogram
//! - `error`: Error types for the pipeline and its collaborators

pub mod error;
pub mod summary;
pub mod transaction;

pub use error::{DeliveryError, PipelineError, SourceError, StorageError};
pub use summary::{MonthlyHistogram, Summary};
pub use transaction::{Category, Row, Transaction, TransactionId, MONTH_NAMES};
