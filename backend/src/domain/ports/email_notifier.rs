//! Driven port for delivering account emails.

use async_trait::async_trait;

use crate::domain::OutboundEmail;

use super::define_port_error;

define_port_error! {
    /// Errors raised by email delivery adapters.
    pub enum EmailNotifierError {
        /// The relay could not be reached.
        Unavailable { message: String } => "email relay unavailable: {message}",
        /// The relay refused the message.
        Rejected { message: String } => "email rejected: {message}",
    }
}

/// Sends composed emails to recipients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailNotifier: Send + Sync {
    /// Deliver a single message.
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailNotifierError>;
}
