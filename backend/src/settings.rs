//! Application configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `EVENT_MANAGER_*` environment variables, and
//! an optional configuration file. Unset values fall back to the defaults
//! exposed by the accessors below.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::inbound::http::session_config::SessionToggles;
use crate::outbound::smtp::{DEFAULT_SMTP_PORT, SmtpConfig};

const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(std::net::SocketAddrV4::new(std::net::Ipv4Addr::UNSPECIFIED, 8080));
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MAX_LOGIN_ATTEMPTS: u32 = 3;
const DEFAULT_SERVER_BASE_URL: &str = "http://localhost:8080";

/// Errors raised when a configured value cannot be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `server_base_url` is not an absolute URL.
    #[error("invalid server_base_url '{value}': {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    /// A numeric limit must be positive.
    #[error("{name} must be greater than zero")]
    ZeroLimit { name: &'static str },
    /// `smtp_host` is set but a credential is missing.
    #[error("smtp_host is set but {name} is missing")]
    IncompleteSmtp { name: &'static str },
}

/// Configuration values for the Event Manager server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EVENT_MANAGER")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection string; the in-memory repository is used when unset.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Consecutive failed logins before an account locks.
    pub max_login_attempts: Option<u32>,
    /// Public base URL used in verification and pagination links.
    pub server_base_url: Option<String>,
    /// Path to the session cookie key material.
    pub session_key_file: Option<PathBuf>,
    /// `Secure` cookie flag, as a boolean string.
    pub session_cookie_secure: Option<String>,
    /// `SameSite` cookie policy.
    pub session_same_site: Option<String>,
    /// Permit a generated session key when the key file is unreadable.
    pub session_allow_ephemeral: Option<String>,
    /// SMTP relay host; verification emails are only logged when unset.
    pub smtp_host: Option<String>,
    /// SMTP submission port.
    pub smtp_port: Option<u16>,
    /// SMTP login name, also the default sender.
    pub smtp_username: Option<String>,
    /// SMTP login password.
    pub smtp_password: Option<String>,
    /// Sender mailbox, when it differs from the login name.
    pub smtp_from: Option<String>,
}

impl AppSettings {
    /// Socket address to bind, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Configured database URL, if any.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    /// Maximum pool size.
    pub fn db_max_connections(&self) -> Result<u32, SettingsError> {
        positive(
            "db_max_connections",
            self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
        )
    }

    /// Failed login threshold.
    pub fn max_login_attempts(&self) -> Result<u32, SettingsError> {
        positive(
            "max_login_attempts",
            self.max_login_attempts.unwrap_or(DEFAULT_MAX_LOGIN_ATTEMPTS),
        )
    }

    /// Public base URL, defaulting to `http://localhost:8080`.
    pub fn server_base_url(&self) -> Result<Url, SettingsError> {
        let value = self
            .server_base_url
            .as_deref()
            .unwrap_or(DEFAULT_SERVER_BASE_URL);
        Url::parse(value).map_err(|source| SettingsError::InvalidBaseUrl {
            value: value.to_owned(),
            source,
        })
    }

    /// SMTP relay settings, or `None` when no relay host is configured.
    pub fn smtp(&self) -> Result<Option<SmtpConfig>, SettingsError> {
        let Some(host) = non_blank(self.smtp_host.as_deref()) else {
            return Ok(None);
        };
        let username = non_blank(self.smtp_username.as_deref())
            .ok_or(SettingsError::IncompleteSmtp { name: "smtp_username" })?;
        let password = self
            .smtp_password
            .clone()
            .filter(|password| !password.is_empty())
            .ok_or(SettingsError::IncompleteSmtp { name: "smtp_password" })?;
        Ok(Some(SmtpConfig {
            host,
            port: self.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
            username,
            password,
            from: non_blank(self.smtp_from.as_deref()),
        }))
    }

    /// Raw session toggles for [`session_settings_from_toggles`](crate::inbound::http::session_config::session_settings_from_toggles).
    pub fn session_toggles(&self) -> SessionToggles {
        SessionToggles {
            key_file: self.session_key_file.clone(),
            cookie_secure: self.session_cookie_secure.clone(),
            same_site: self.session_same_site.clone(),
            allow_ephemeral: self.session_allow_ephemeral.clone(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

fn positive(name: &'static str, value: u32) -> Result<u32, SettingsError> {
    if value == 0 {
        Err(SettingsError::ZeroLimit { name })
    } else {
        Ok(value)
    }
}
