//! Email adapter that writes outbound messages to the structured log.
//!
//! Stands in for an SMTP relay: operators read verification links from the
//! log stream in development and staging.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::OutboundEmail;
use crate::domain::ports::{EmailNotifier, EmailNotifierError};

/// [`EmailNotifier`] that logs each message instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct LoggingEmailNotifier;

impl LoggingEmailNotifier {
    /// Create a new logging notifier.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmailNotifier for LoggingEmailNotifier {
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailNotifierError> {
        info!(to = %email.to, subject = %email.subject, "email queued for delivery");
        debug!(to = %email.to, body = %email.body, "email body");
        Ok(())
    }
}
