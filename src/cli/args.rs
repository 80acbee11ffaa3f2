use crate::notify::NotificationConfig;
use crate::strategy::PoolConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Summarize a batch of account movements and notify the account holder
#[derive(Parser, Debug)]
#[command(name = "statement-digest")]
#[command(about = "Summarize a batch of account movements and notify the account holder", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing `id,date,amount` rows
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Aggregation strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "concurrent",
        help = "Aggregation strategy: 'sequential' or 'concurrent'"
    )]
    pub strategy: StrategyType,

    /// Worker pool size (concurrent mode only)
    #[arg(
        long = "pool-size",
        value_name = "SIZE",
        env = "DIGEST_POOL_SIZE",
        help = "Number of worker threads (default: 5)"
    )]
    pub pool_size: Option<usize>,

    /// Notification recipients
    #[arg(
        long = "recipient",
        value_name = "ADDRESS",
        env = "DIGEST_RECIPIENTS",
        value_delimiter = ',',
        help = "Notification recipient, repeatable or comma separated"
    )]
    pub recipients: Vec<String>,

    /// Notification subject
    #[arg(long = "subject", value_name = "SUBJECT")]
    pub subject: Option<String>,

    /// Greeting name (defaults to the recipient list)
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// SQLite database receiving the parsed transactions
    #[arg(
        long = "database",
        value_name = "PATH",
        env = "DIGEST_DATABASE",
        help = "SQLite file for persistence (disabled when omitted)"
    )]
    pub database: Option<PathBuf>,

    /// Directory receiving rendered notifications
    #[arg(
        long = "outbox",
        value_name = "DIR",
        help = "Write notifications to this directory instead of the log"
    )]
    pub outbox: Option<PathBuf>,

    /// How long to wait for background persistence before exiting
    #[arg(long = "persist-grace-ms", value_name = "MILLIS", default_value_t = 2000)]
    pub persist_grace_ms: u64,
}

/// Available aggregation strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sequential,
    Concurrent,
}

impl CliArgs {
    /// Create a PoolConfig from CLI arguments
    ///
    /// A zero pool size falls back to the default with a warning.
    pub fn to_pool_config(&self) -> PoolConfig {
        match self.pool_size {
            Some(pool_size) => PoolConfig::new(pool_size),
            None => PoolConfig::default(),
        }
    }

    /// Create a NotificationConfig from CLI arguments
    ///
    /// # Returns
    ///
    /// A `NotificationConfig` with the given recipients and, where provided,
    /// subject and greeting name; the built-in template is always used.
    pub fn to_notification_config(&self) -> NotificationConfig {
        let mut config = NotificationConfig::new(self.recipients.clone());
        if let Some(subject) = &self.subject {
            config.subject = subject.clone();
        }
        config.name = self.name.clone();
        config
    }
}
