use crate::core::traits::Persister;
use crate::types::{StorageError, Transaction};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS transactions (
    row_id INTEGER PRIMARY KEY,
    id INTEGER NOT NULL,
    amount TEXT NOT NULL,
    month INTEGER NOT NULL,
    day INTEGER NOT NULL,
    category TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);
";

/// Persister backed by a SQLite file
///
/// Each call opens its own connection on a blocking thread, so the persister
/// can be shared freely between tasks. Amounts are stored as text to keep
/// full decimal precision.
#[derive(Debug, Clone)]
pub struct SqlitePersister {
    path: PathBuf,
}

impl SqlitePersister {
    /// Open (or create) the database and make sure the schema exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { path })
    }

    /// Every stored transaction, in insertion order
    pub fn stored_transactions(&self) -> Result<Vec<Transaction>, StorageError> {
        let conn = Connection::open(&self.path)?;
        let mut stmt =
            conn.prepare("SELECT id, amount, month, day FROM transactions ORDER BY row_id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, u32>(3)?,
            ))
        })?;

        let mut transactions = Vec::new();
        for row in rows {
            let (id, amount, month, day) = row?;
            let amount = Decimal::from_str(&amount)
                .map_err(|e| StorageError::new(format!("stored amount '{}': {}", amount, e)))?;
            let date = chrono::NaiveDate::from_ymd_opt(0, month, day)
                .ok_or_else(|| StorageError::new(format!("stored date {}/{}", month, day)))?;
            transactions.push(Transaction::new(id as u64, amount, date));
        }
        Ok(transactions)
    }
}

fn insert_all(path: &Path, transactions: &[Transaction]) -> Result<(), StorageError> {
    let mut conn = Connection::open(path)?;
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO transactions (id, amount, month, day, category) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for t in transactions {
            stmt.execute(params![
                t.id as i64,
                t.amount.to_string(),
                t.month(),
                chrono::Datelike::day(&t.date),
                t.category().as_str(),
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

#[async_trait]
impl Persister for SqlitePersister {
    async fn insert_transactions(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<(), StorageError> {
        if transactions.is_empty() {
            return Ok(());
        }

        let path = self.path.clone();
        let count = transactions.len();
        tokio::task::spawn_blocking(move || insert_all(&path, &transactions))
            .await
            .map_err(|e| StorageError::new(format!("insert task failed: {}", e)))??;

        debug!(path = %self.path.display(), count, "transactions persisted");
        Ok(())
    }
}
