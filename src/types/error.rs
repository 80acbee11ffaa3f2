//! Error types for the statement digest
//!
//! This module defines every error that can occur while fetching, decoding,
//! aggregating and reporting a batch.
//!
//! # Error Categories
//!
//! - **Source Errors**: the batch could not be fetched. Fatal, nothing is parsed.
//! - **Decode Errors**: the bytes are not well-formed delimited text. Fatal.
//! - **Parse Errors**: one row holds a malformed id, date or amount. Fatal for
//!   the whole batch, no partial summary is produced.
//! - **Storage Errors**: persisting the parsed rows failed. Logged only, they
//!   never reach the caller of the pipeline.
//! - **Delivery Errors**: the notification could not be sent. Surfaces as the
//!   pipeline's error even though the summary was fully computed.

use thiserror::Error;

/// Failure to obtain the raw batch from its source
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// The batch does not exist at the configured location
    #[error("Batch not found: {location}")]
    NotFound {
        /// Location that was looked up
        location: String,
    },

    /// The batch exists but could not be transferred
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transfer failure
        message: String,
    },
}

impl SourceError {
    pub fn not_found(location: impl Into<String>) -> Self {
        SourceError::NotFound {
            location: location.into(),
        }
    }
}

impl From<std::io::Error> for SourceError {
    fn from(error: std::io::Error) -> Self {
        SourceError::Transport {
            message: error.to_string(),
        }
    }
}

/// Failure to persist parsed transactions
///
/// Never propagated out of the pipeline; the persistence task logs it and
/// hands it to the completion hook, if one is installed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Storage error: {message}")]
pub struct StorageError {
    pub message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        StorageError {
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(error: rusqlite::Error) -> Self {
        StorageError::new(error.to_string())
    }
}

/// Failure to deliver the summary notification
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Delivery error: {message}")]
pub struct DeliveryError {
    pub message: String,
}

impl DeliveryError {
    pub fn new(message: impl Into<String>) -> Self {
        DeliveryError {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for DeliveryError {
    fn from(error: std::io::Error) -> Self {
        DeliveryError::new(error.to_string())
    }
}

/// Main error type returned by the pipeline
///
/// Callers receive either a complete summary or exactly one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// The batch could not be fetched
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The batch is not well-formed delimited text
    #[error("Decode error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Decode {
        /// Line number where decoding failed (if available)
        line: Option<u64>,
        /// Description of the decoding failure
        message: String,
    },

    /// A row field could not be parsed
    ///
    /// Aborts the whole batch.
    #[error("Invalid {field} '{value}' at row {row}: expected {}", expected_form(.field))]
    Parse {
        /// Name of the offending field: `id`, `date` or `amount`
        field: &'static str,
        /// Index of the row in the decoded sequence (header is row 0)
        row: usize,
        /// Raw field value
        value: String,
    },

    /// The running balance or an aggregate merge overflowed
    #[error("Arithmetic overflow while {operation}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
    },

    /// The notification could not be delivered
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// A worker or background task failed unexpectedly
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the failure
        message: String,
    },
}

/// Accepted form of each row field, for parse error messages
fn expected_form(field: &str) -> &'static str {
    match field {
        "id" => "an unsigned integer",
        "date" => "month/day",
        "amount" => "a decimal number",
        _ => "a valid value",
    }
}

// Conversion from csv::Error to PipelineError
impl From<csv::Error> for PipelineError {
    fn from(error: csv::Error) -> Self {
        // Extract line number if available
        let line = error.position().map(|pos| pos.line());

        PipelineError::Decode {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl PipelineError {
    /// Create a Decode error
    pub fn decode(line: Option<u64>, message: impl Into<String>) -> Self {
        PipelineError::Decode {
            line,
            message: message.into(),
        }
    }

    /// Create a Parse error
    pub fn parse(field: &'static str, row: usize, value: &str) -> Self {
        PipelineError::Parse {
            field,
            row,
            value: value.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str) -> Self {
        PipelineError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PipelineError::Internal {
            message: message.into(),
        }
    }

    /// Whether the error was raised before or during aggregation
    ///
    /// Such errors never trigger persistence or notification.
    pub fn is_ingestion_failure(&self) -> bool {
        !matches!(self, PipelineError::Delivery(_))
    }
}
