//! Summary notification
//!
//! Builds the message sent after a successful batch and provides the
//! transports that deliver it.
//!
//! # Components
//!
//! - `payload` - Payload derivation, amount formatting and template rendering
//! - `notifier` - Log and outbox transports

pub mod notifier;
pub mod payload;

pub use notifier::{LogNotifier, OutboxNotifier};
pub use payload::{
    format_amount, monthly_summary_markup, render_template, NotificationPayload,
    DEFAULT_SUBJECT, DEFAULT_TEMPLATE,
};

use serde::Serialize;

/// Who receives the summary and how it is presented
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationConfig {
    pub recipients: Vec<String>,
    pub subject: String,
    pub template: String,
    /// Greeting name; defaults to the recipient list
    pub name: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            recipients: Vec::new(),
            subject: DEFAULT_SUBJECT.to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
            name: None,
        }
    }
}

impl NotificationConfig {
    pub fn new(recipients: Vec<String>) -> Self {
        Self {
            recipients,
            ..Self::default()
        }
    }

    /// Name shown in the greeting
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.recipients.join(", "),
        }
    }

    /// Assemble a notification around a payload
    pub fn notification(&self, payload: NotificationPayload) -> Notification {
        Notification {
            recipients: self.recipients.clone(),
            subject: self.subject.clone(),
            template: self.template.clone(),
            payload,
        }
    }
}

/// One message handed to a `Notifier`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub recipients: Vec<String>,
    pub subject: String,
    #[serde(skip)]
    pub template: String,
    pub payload: NotificationPayload,
}

impl Notification {
    /// Render the template with this notification's payload
    pub fn render(&self) -> String {
        render_template(&self.template, &self.payload)
    }
}
