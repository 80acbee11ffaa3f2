//! Transaction persistence
//!
//! - `sqlite` - `SqlitePersister`, a file-backed store
//! - `NoopPersister` - accepts every batch and keeps nothing

pub mod sqlite;

pub use sqlite::SqlitePersister;

use crate::core::traits::Persister;
use crate::types::{StorageError, Transaction};
use async_trait::async_trait;
use tracing::debug;

/// Persister used when no database is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPersister;

#[async_trait]
impl Persister for NoopPersister {
    async fn insert_transactions(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<(), StorageError> {
        debug!(count = transactions.len(), "persistence disabled, discarding transactions");
        Ok(())
    }
}
