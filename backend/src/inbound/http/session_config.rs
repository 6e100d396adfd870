//! Session configuration parsing and validation.
//!
//! Turns the raw session toggles from [`AppSettings`](crate::settings::AppSettings)
//! into a cookie key and cookie policy, applying stricter rules in release
//! builds.

pub mod fingerprint;
mod parsing;

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

use parsing::{BoolToggle, parse_bool_toggle, parse_same_site_value};

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const COOKIE_SECURE_SETTING: &str = "session_cookie_secure";
const SAMESITE_SETTING: &str = "session_same_site";
const ALLOW_EPHEMERAL_SETTING: &str = "session_allow_ephemeral";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate invalid toggles and fall back with a warning.
    Debug,
    /// Release builds reject invalid toggles and short keys.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use event_manager::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Raw session toggles as loaded from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionToggles {
    /// Path to the key material; defaults to `/var/run/secrets/session_key`.
    pub key_file: Option<PathBuf>,
    /// `Secure` cookie flag; defaults to enabled.
    pub cookie_secure: Option<String>,
    /// `SameSite` policy; defaults to `Lax` in debug and `Strict` in release.
    pub same_site: Option<String>,
    /// Permit a generated key when the key file is unreadable.
    pub allow_ephemeral: Option<String>,
}

/// Session settings derived from configuration toggles.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// Configured `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A setting is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file exists but is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` requires a secure cookie in release builds.
    #[error("session_same_site=None requires session_cookie_secure=true")]
    InsecureSameSiteNone,
    /// Release builds must not allow ephemeral session keys.
    #[error("session_allow_ephemeral must be disabled in release builds")]
    EphemeralNotAllowed,
}

/// Build session settings from configuration toggles and build mode.
///
/// # Examples
///
/// ```rust
/// use event_manager::inbound::http::session_config::{
///     BuildMode, SessionToggles, session_settings_from_toggles,
/// };
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("event_manager_session_key_example");
/// std::fs::write(&key_path, vec![b'a'; 64])?;
///
/// let toggles = SessionToggles {
///     key_file: Some(key_path.clone()),
///     cookie_secure: Some("1".into()),
///     same_site: Some("Strict".into()),
///     allow_ephemeral: Some("0".into()),
/// };
/// let settings = session_settings_from_toggles(&toggles, BuildMode::Release)?;
/// assert!(settings.cookie_secure);
///
/// std::fs::remove_file(&key_path)?;
/// # Ok(())
/// # }
/// ```
pub fn session_settings_from_toggles(
    toggles: &SessionToggles,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = parse_bool_toggle(
        toggles.cookie_secure.as_deref(),
        mode,
        BoolToggle::new(COOKIE_SECURE_SETTING, true),
    )?;
    let same_site = same_site_from_toggles(toggles, mode, cookie_secure)?;
    let allow_ephemeral = parse_bool_toggle(
        toggles.allow_ephemeral.as_deref(),
        mode,
        BoolToggle::new(ALLOW_EPHEMERAL_SETTING, false),
    )?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = session_key(toggles, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn same_site_from_toggles(
    toggles: &SessionToggles,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    match toggles.same_site.as_deref() {
        Some(value) => parse_same_site_value(value, mode, cookie_secure, default_same_site),
        None => Ok(default_same_site),
    }
}

fn session_key(
    toggles: &SessionToggles,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = toggles
        .key_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH));

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) => {
            if mode.is_debug() || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(SessionConfigError::KeyRead {
                    path,
                    source: error,
                })
            }
        }
    }
}
