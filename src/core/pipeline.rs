//! Batch pipeline orchestration
//!
//! One call to [`Pipeline::process_batch`] walks a batch through every
//! stage:
//!
//! `Idle → Decoding → Dispatching/Parsing → {Aborted | Aggregated} → Notifying → {Done | Failed}`
//!
//! Fetching and notification are async; decoding and aggregation are CPU
//! bound and run on tokio's blocking pool. Persistence is detached from the
//! call and its outcome is only observable through the optional hook.

use super::aggregate::Aggregate;
use super::traits::{Notifier, Persister, RecordSource};
use crate::io::decode;
use crate::notify::{NotificationConfig, NotificationPayload};
use crate::strategy::AggregationStrategy;
use crate::types::{PipelineError, StorageError, Summary, Transaction};
use std::sync::Arc;
use tracing::{error, info};

/// Callback receiving the outcome of the detached persistence task
///
/// `Ok` carries the number of transactions handed to the persister.
pub type PersistHook = Arc<dyn Fn(&Result<usize, StorageError>) + Send + Sync>;

/// Ingestion pipeline wired to its collaborators
pub struct Pipeline {
    source: Arc<dyn RecordSource>,
    persister: Arc<dyn Persister>,
    notifier: Arc<dyn Notifier>,
    strategy: Arc<dyn AggregationStrategy>,
    notification: NotificationConfig,
    persist_hook: Option<PersistHook>,
}

impl Pipeline {
    /// Create a pipeline with the default notification settings
    ///
    /// # Arguments
    ///
    /// * `source` - Supplier of the raw batch
    /// * `persister` - Store receiving every parsed transaction after success
    /// * `notifier` - Transport for the summary notification
    /// * `strategy` - Aggregation strategy (sequential or concurrent)
    pub fn new(
        source: Arc<dyn RecordSource>,
        persister: Arc<dyn Persister>,
        notifier: Arc<dyn Notifier>,
        strategy: Arc<dyn AggregationStrategy>,
    ) -> Self {
        Self {
            source,
            persister,
            notifier,
            strategy,
            notification: NotificationConfig::default(),
            persist_hook: None,
        }
    }

    pub fn with_notification(mut self, notification: NotificationConfig) -> Self {
        self.notification = notification;
        self
    }

    pub fn with_persist_hook(mut self, hook: PersistHook) -> Self {
        self.persist_hook = Some(hook);
        self
    }

    /// Process one batch end to end
    ///
    /// # Returns
    ///
    /// * `Ok(Summary)` - Every row parsed and the notification was delivered
    /// * `Err(PipelineError)` - Fetching, decoding, parsing or delivery failed.
    ///   Failures before notification never trigger persistence.
    pub async fn process_batch(&self) -> Result<Summary, PipelineError> {
        let location = self.source.describe();
        info!(source = %location, "fetching batch");
        let bytes = self.source.fetch().await?;

        info!(source = %location, bytes = bytes.len(), "aggregating batch");
        let strategy = Arc::clone(&self.strategy);
        let aggregate = tokio::task::spawn_blocking(move || {
            let rows = decode(&bytes)?;
            strategy.aggregate(rows)
        })
        .await
        .map_err(|e| PipelineError::internal(format!("aggregation task failed: {}", e)))??;

        self.finalize(aggregate).await
    }

    async fn finalize(&self, aggregate: Aggregate) -> Result<Summary, PipelineError> {
        let (summary, monthly) = aggregate.into_summary();
        info!(
            debit = summary.debit.len(),
            credit = summary.credit.len(),
            balance = %summary.running_balance,
            "batch aggregated"
        );

        self.spawn_persistence(summary.transactions());

        let payload = NotificationPayload::from_summary(
            &summary,
            &monthly,
            &self.notification.display_name(),
        );
        let notification = self.notification.notification(payload);
        self.notifier.send(&notification).await?;

        info!(recipients = ?notification.recipients, "summary delivered");
        Ok(summary)
    }

    fn spawn_persistence(&self, transactions: Vec<Transaction>) {
        let persister = Arc::clone(&self.persister);
        let hook = self.persist_hook.clone();

        tokio::spawn(async move {
            let count = transactions.len();
            let result = persister
                .insert_transactions(transactions)
                .await
                .map(|()| count);

            if let Err(e) = &result {
                error!(error = %e, count, "failed to persist transactions");
            }
            if let Some(hook) = hook {
                hook(&result);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemorySource;
    use crate::notify::Notification;
    use crate::strategy::{ConcurrentStrategy, PoolConfig, SequentialStrategy};
    use crate::types::{DeliveryError, SourceError};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    const EXAMPLE: &str = "id,date,amount\n0,7/15,+60.5\n1,7/28,-10.3\n2,8/2,-20.46\n3,8/13,+10\n";

    #[derive(Default)]
    struct RecordingPersister {
        fail: bool,
        batches: Mutex<Vec<Vec<Transaction>>>,
    }

    #[async_trait]
    impl Persister for RecordingPersister {
        async fn insert_transactions(
            &self,
            transactions: Vec<Transaction>,
        ) -> Result<(), StorageError> {
            self.batches.lock().unwrap().push(transactions);
            if self.fail {
                Err(StorageError::new("database unavailable"))
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        fail: bool,
        sent: Mutex<Vec<Notification>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
            self.sent.lock().unwrap().push(notification.clone());
            if self.fail {
                Err(DeliveryError::new("mailbox unavailable"))
            } else {
                Ok(())
            }
        }
    }

    struct MissingSource;

    #[async_trait]
    impl RecordSource for MissingSource {
        async fn fetch(&self) -> Result<Vec<u8>, SourceError> {
            Err(SourceError::not_found("bucket/batch.csv"))
        }

        fn describe(&self) -> String {
            "bucket/batch.csv".to_string()
        }
    }

    struct Harness {
        persister: Arc<RecordingPersister>,
        notifier: Arc<RecordingNotifier>,
        outcomes: mpsc::UnboundedReceiver<Result<usize, StorageError>>,
        pipeline: Pipeline,
    }

    fn harness(
        source: Arc<dyn RecordSource>,
        persister: RecordingPersister,
        notifier: RecordingNotifier,
    ) -> Harness {
        let persister = Arc::new(persister);
        let notifier = Arc::new(notifier);
        let (sender, outcomes) = mpsc::unbounded_channel();

        let pipeline = Pipeline::new(
            source,
            persister.clone(),
            notifier.clone(),
            Arc::new(ConcurrentStrategy::new(PoolConfig::default())),
        )
        .with_notification(NotificationConfig::new(vec!["ops@example.com".into()]))
        .with_persist_hook(Arc::new(move |outcome: &Result<usize, StorageError>| {
            let _ = sender.send(outcome.clone());
        }));

        Harness {
            persister,
            notifier,
            outcomes,
            pipeline,
        }
    }

    fn memory(text: &str) -> Arc<dyn RecordSource> {
        Arc::new(MemorySource::new(text.as_bytes().to_vec()))
    }

    #[tokio::test]
    async fn test_example_batch_persists_and_notifies() {
        let mut h = harness(
            memory(EXAMPLE),
            RecordingPersister::default(),
            RecordingNotifier::default(),
        );

        let summary = h.pipeline.process_batch().await.unwrap();
        assert_eq!(summary.running_balance, Decimal::new(3974, 2));

        let sent = h.notifier.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients, vec!["ops@example.com".to_string()]);
        assert_eq!(sent[0].payload.ending_balance, "39.74");
        assert_eq!(sent[0].payload.debit_average, "35.25");
        assert_eq!(sent[0].payload.credit_average, "-15.38");

        assert_eq!(h.outcomes.recv().await, Some(Ok(4)));
        let batches = h.persister.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0], summary.transactions());
    }

    #[tokio::test]
    async fn test_malformed_row_skips_persistence_and_notification() {
        let h = harness(
            memory("id,date,amount\n0,7/15,+60.5\n1,7/28,ten\n"),
            RecordingPersister::default(),
            RecordingNotifier::default(),
        );

        let result = h.pipeline.process_batch().await;
        assert_eq!(result, Err(PipelineError::parse("amount", 2, "ten")));
        assert!(h.notifier.sent.lock().unwrap().is_empty());
        assert!(h.persister.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_source_is_reported() {
        let h = harness(
            Arc::new(MissingSource),
            RecordingPersister::default(),
            RecordingNotifier::default(),
        );

        let result = h.pipeline.process_batch().await;
        assert_eq!(
            result,
            Err(PipelineError::Source(SourceError::not_found("bucket/batch.csv")))
        );
        assert!(h.notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_header_only_still_notifies() {
        let mut h = harness(
            memory("id,date,amount\n"),
            RecordingPersister::default(),
            RecordingNotifier::default(),
        );

        let summary = h.pipeline.process_batch().await.unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.running_balance, Decimal::ZERO);

        let sent = h.notifier.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].payload.ending_balance, "0.00");
        assert_eq!(sent[0].payload.monthly_summary_markup, "");
        assert_eq!(h.outcomes.recv().await, Some(Ok(0)));
    }

    #[tokio::test]
    async fn test_delivery_failure_is_the_pipeline_error() {
        let h = harness(
            memory(EXAMPLE),
            RecordingPersister::default(),
            RecordingNotifier {
                fail: true,
                ..RecordingNotifier::default()
            },
        );

        let result = h.pipeline.process_batch().await;
        assert_eq!(
            result,
            Err(PipelineError::Delivery(DeliveryError::new("mailbox unavailable")))
        );
    }

    #[tokio::test]
    async fn test_storage_failure_does_not_surface() {
        let mut h = harness(
            memory(EXAMPLE),
            RecordingPersister {
                fail: true,
                ..RecordingPersister::default()
            },
            RecordingNotifier::default(),
        );

        let summary = h.pipeline.process_batch().await.unwrap();
        assert_eq!(summary.len(), 4);
        assert_eq!(
            h.outcomes.recv().await,
            Some(Err(StorageError::new("database unavailable")))
        );
    }

    #[tokio::test]
    async fn test_strategies_agree_through_pipeline() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut summaries = Vec::new();

        let strategies: [Arc<dyn AggregationStrategy>; 2] = [
            Arc::new(SequentialStrategy),
            Arc::new(ConcurrentStrategy::new(PoolConfig::new(3))),
        ];
        for strategy in strategies {
            let pipeline = Pipeline::new(
                memory(EXAMPLE),
                Arc::new(RecordingPersister::default()),
                notifier.clone(),
                strategy,
            );
            let summary = pipeline.process_batch().await.unwrap();
            summaries.push(summary.sorted());
        }

        assert_eq!(summaries[0], summaries[1]);
        assert_eq!(notifier.sent.lock().unwrap().len(), 2);
    }

    fn strategies() -> [Arc<dyn AggregationStrategy>; 3] {
        [
            Arc::new(SequentialStrategy),
            Arc::new(ConcurrentStrategy::new(PoolConfig::new(2))),
            Arc::new(ConcurrentStrategy::new(PoolConfig::new(5))),
        ]
    }

    fn bounds_batch(amounts: &[Decimal]) -> String {
        let mut text = String::from("id,date,amount\n");
        for (i, amount) in amounts.iter().enumerate() {
            text.push_str(&format!("{},3/{},{}\n", i, i + 1, amount));
        }
        text
    }

    #[tokio::test]
    async fn test_category_overflow_is_an_error_not_a_panic() {
        let batch = bounds_batch(&[Decimal::MAX, Decimal::MIN, Decimal::MAX]);

        for strategy in strategies() {
            let persister = Arc::new(RecordingPersister::default());
            let notifier = Arc::new(RecordingNotifier::default());
            let pipeline =
                Pipeline::new(memory(&batch), persister.clone(), notifier.clone(), strategy);

            let result = pipeline.process_batch().await;
            assert_eq!(
                result,
                Err(PipelineError::arithmetic_overflow("summing debit amounts"))
            );
            assert!(notifier.sent.lock().unwrap().is_empty());
            assert!(persister.batches.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_batch_at_decimal_bounds_is_notified() {
        let batch = bounds_batch(&[Decimal::MAX, Decimal::MIN, Decimal::ZERO]);

        for strategy in strategies() {
            let notifier = Arc::new(RecordingNotifier::default());
            let pipeline = Pipeline::new(
                memory(&batch),
                Arc::new(RecordingPersister::default()),
                notifier.clone(),
                strategy,
            );

            let summary = pipeline.process_batch().await.unwrap();
            assert_eq!(summary.running_balance, Decimal::ZERO);

            let sent = notifier.sent.lock().unwrap();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].payload.ending_balance, "0.00");
            assert_eq!(
                sent[0].payload.debit_average,
                format!("{}.00", Decimal::MAX)
            );
        }
    }
}
