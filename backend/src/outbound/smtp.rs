//! Email adapter that delivers messages through an SMTP relay.
//!
//! Connects with STARTTLS, authenticates with the configured credentials,
//! and sends plain-text messages. Permanent SMTP replies surface as
//! [`EmailNotifierError::Rejected`]; everything else (connection, TLS,
//! timeouts, transient replies) as [`EmailNotifierError::Unavailable`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::domain::OutboundEmail;
use crate::domain::ports::{EmailNotifier, EmailNotifierError};

/// Submission port used when none is configured.
pub const DEFAULT_SMTP_PORT: u16 = 587;
/// Upper bound on each SMTP exchange.
const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Relay location and login for [`SmtpEmailNotifier`].
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address; the username is used when unset.
    pub from: Option<String>,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from", &self.from)
            .finish()
    }
}

impl SmtpConfig {
    fn sender(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.username)
    }
}

/// Errors raised while preparing the SMTP transport.
#[derive(Debug, thiserror::Error)]
pub enum SmtpSetupError {
    /// The sender is not a valid mailbox.
    #[error("invalid SMTP sender '{value}': {source}")]
    InvalidSender {
        value: String,
        #[source]
        source: lettre::address::AddressError,
    },
    /// The relay host cannot be used for STARTTLS.
    #[error("invalid SMTP relay '{host}': {source}")]
    InvalidRelay {
        host: String,
        #[source]
        source: lettre::transport::smtp::Error,
    },
}

/// [`EmailNotifier`] backed by an authenticated STARTTLS relay.
#[derive(Clone)]
pub struct SmtpEmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailNotifier {
    /// Build a notifier for the given relay.
    ///
    /// No connection is made until the first message is sent.
    pub fn new(config: SmtpConfig) -> Result<Self, SmtpSetupError> {
        let sender = config.sender();
        let from = sender
            .parse::<Mailbox>()
            .map_err(|source| SmtpSetupError::InvalidSender {
                value: sender.to_owned(),
                source,
            })?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|source| SmtpSetupError::InvalidRelay {
                host: config.host.clone(),
                source,
            })?
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .timeout(Some(SMTP_TIMEOUT))
            .build();
        Ok(Self { transport, from })
    }

    fn message(&self, email: &OutboundEmail) -> Result<Message, EmailNotifierError> {
        let to = email
            .to
            .as_ref()
            .parse::<Mailbox>()
            .map_err(|err| EmailNotifierError::rejected(format!("recipient: {err}")))?;
        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|err| EmailNotifierError::rejected(err.to_string()))
    }
}

fn map_smtp_error(error: &lettre::transport::smtp::Error) -> EmailNotifierError {
    if error.is_permanent() {
        EmailNotifierError::rejected(error.to_string())
    } else {
        EmailNotifierError::unavailable(error.to_string())
    }
}

#[async_trait]
impl EmailNotifier for SmtpEmailNotifier {
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailNotifierError> {
        let message = self.message(email)?;
        self.transport
            .send(message)
            .await
            .map_err(|err| map_smtp_error(&err))?;
        info!(to = %email.to, subject = %email.subject, "email delivered via SMTP");
        Ok(())
    }
}
