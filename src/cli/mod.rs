// CLI module
// Command-line interface, argument parsing and collaborator wiring

mod args;

pub use args::{CliArgs, StrategyType};

use crate::core::{Notifier, PersistHook, Persister, Pipeline};
use crate::io::{write_summary_csv, FileSource};
use crate::notify::{LogNotifier, OutboxNotifier};
use crate::storage::{NoopPersister, SqlitePersister};
use crate::strategy::create_strategy;
use crate::types::{StorageError, Summary};
use clap::Parser;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing input, or `--help`), clap
/// prints the message and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Process the batch named by `args` and write the summary CSV to `output`
///
/// # Arguments
///
/// * `args` - Parsed command-line arguments
/// * `output` - Destination for the summary CSV (stdout in the binary)
///
/// # Returns
///
/// * `Ok(())` - The batch was aggregated, notified and written
/// * `Err(String)` - Error message describing what failed
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .thread_name("digest-runtime")
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start runtime: {}", e))?;

    let summary = runtime.block_on(process(args))?;
    write_summary_csv(&summary, output)
}

async fn process(args: &CliArgs) -> Result<Summary, String> {
    let persister: Arc<dyn Persister> = match &args.database {
        Some(path) => Arc::new(SqlitePersister::open(path).map_err(|e| e.to_string())?),
        None => Arc::new(NoopPersister),
    };
    let notifier: Arc<dyn Notifier> = match &args.outbox {
        Some(dir) => Arc::new(OutboxNotifier::new(dir)),
        None => Arc::new(LogNotifier),
    };

    let config = if matches!(args.strategy, StrategyType::Concurrent) {
        Some(args.to_pool_config())
    } else {
        None
    };
    let strategy = create_strategy(args.strategy, config);
    debug!(strategy = ?strategy, "strategy selected");

    let (sender, persisted) = oneshot::channel();
    let sender = Mutex::new(Some(sender));
    let hook: PersistHook = Arc::new(move |outcome: &Result<usize, StorageError>| {
        if let Some(sender) = sender.lock().ok().and_then(|mut slot| slot.take()) {
            let _ = sender.send(outcome.is_ok());
        }
    });

    let pipeline = Pipeline::new(
        Arc::new(FileSource::new(&args.input_file)),
        persister,
        notifier,
        strategy,
    )
    .with_notification(args.to_notification_config())
    .with_persist_hook(hook);

    let summary = pipeline.process_batch().await.map_err(|e| {
        if e.is_ingestion_failure() {
            warn!(error = %e, "batch rejected");
        } else {
            warn!(error = %e, "batch aggregated but summary not delivered");
        }
        e.to_string()
    })?;
    info!(
        transactions = summary.len(),
        balance = %summary.running_balance,
        "batch complete"
    );

    // The runtime is dropped on return, which would cancel persistence
    let grace = Duration::from_millis(args.persist_grace_ms);
    match tokio::time::timeout(grace, persisted).await {
        Ok(Ok(true)) => debug!("persistence finished"),
        Ok(Ok(false)) => warn!("persistence failed, transactions were not stored"),
        Ok(Err(_)) => warn!("persistence task ended without reporting"),
        Err(_) => warn!(
            grace_ms = args.persist_grace_ms,
            "persistence still running at exit"
        ),
    }

    Ok(summary)
}
