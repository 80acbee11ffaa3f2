//! Boundaries between the pipeline and its external collaborators
//!
//! This module defines the trait abstractions the pipeline is written
//! against, so sources, storage and notification transports can be swapped
//! without touching the aggregation core.

use crate::notify::Notification;
use crate::types::{DeliveryError, SourceError, StorageError, Transaction};
use async_trait::async_trait;

/// Supplier of the raw batch
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the whole batch as bytes
    async fn fetch(&self) -> Result<Vec<u8>, SourceError>;

    /// Human-readable location, used in logs
    fn describe(&self) -> String;
}

/// Durable store for parsed transactions
///
/// Called from a detached task after a successful aggregation. An empty
/// slice must succeed without touching the store.
#[async_trait]
pub trait Persister: Send + Sync {
    async fn insert_transactions(&self, transactions: Vec<Transaction>)
        -> Result<(), StorageError>;
}

/// Delivery transport for the batch summary
///
/// Awaited by the pipeline; a failure here is the pipeline's failure.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError>;
}
