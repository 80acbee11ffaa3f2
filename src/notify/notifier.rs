//! Notification transports
//!
//! - `LogNotifier` emits the notification through `tracing`
//! - `OutboxNotifier` writes the rendered HTML and a JSON envelope to a directory

use super::Notification;
use crate::core::traits::Notifier;
use crate::types::DeliveryError;
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// Notifier that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        info!(
            recipients = ?notification.recipients,
            subject = %notification.subject,
            ending_balance = %notification.payload.ending_balance,
            debit_average = %notification.payload.debit_average,
            credit_average = %notification.payload.credit_average,
            "summary notification"
        );
        debug!(body = %notification.render(), "rendered notification");
        Ok(())
    }
}

/// Notifier that drops each message into an outbox directory
///
/// Every send writes `summary-<timestamp>-<seq>.html` with the rendered body
/// and a matching `.json` envelope holding recipients, subject and payload.
#[derive(Debug)]
pub struct OutboxNotifier {
    dir: PathBuf,
    sequence: AtomicU64,
}

impl OutboxNotifier {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl Notifier for OutboxNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let stem = format!(
            "summary-{}-{:04}",
            Utc::now().format("%Y%m%dT%H%M%S%.6f"),
            sequence
        );

        let envelope = serde_json::to_vec_pretty(notification)
            .map_err(|e| DeliveryError::new(format!("failed to encode envelope: {}", e)))?;

        let html_path = self.dir.join(format!("{}.html", stem));
        let json_path = self.dir.join(format!("{}.json", stem));
        tokio::fs::write(&html_path, notification.render()).await?;
        tokio::fs::write(&json_path, envelope).await?;

        info!(
            recipients = ?notification.recipients,
            path = %html_path.display(),
            "summary notification written to outbox"
        );
        Ok(())
    }
}
