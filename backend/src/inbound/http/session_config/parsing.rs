//! Value parsing helpers for session configuration.

use actix_web::cookie::SameSite;
use tracing::warn;

use super::{BuildMode, SAMESITE_SETTING, SessionConfigError};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Name and fallback for a boolean toggle.
pub(super) struct BoolToggle {
    name: &'static str,
    default_value: bool,
}

impl BoolToggle {
    pub(super) const fn new(name: &'static str, default_value: bool) -> Self {
        Self {
            name,
            default_value,
        }
    }
}

/// Parse a boolean toggle, using its default when unset.
///
/// Invalid values fall back to the default in debug builds and are rejected
/// in release builds.
pub(super) fn parse_bool_toggle(
    value: Option<&str>,
    mode: BuildMode,
    toggle: BoolToggle,
) -> Result<bool, SessionConfigError> {
    let Some(value) = value else {
        return Ok(toggle.default_value);
    };
    match parse_bool(value) {
        Some(flag) => Ok(flag),
        None => debug_warn_or_error(
            mode,
            toggle.default_value,
            SessionConfigError::InvalidSetting {
                name: toggle.name,
                value: value.to_owned(),
                expected: BOOL_EXPECTED,
            },
            || {
                warn!(
                    value = %value,
                    setting = toggle.name,
                    default = toggle.default_value,
                    "invalid session toggle; using default"
                );
            },
        ),
    }
}

pub(super) fn debug_warn_or_error<T, F>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
    warn_fn: F,
) -> Result<T, SessionConfigError>
where
    F: FnOnce(),
{
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}

pub(super) fn parse_same_site_value(
    value: &str,
    mode: BuildMode,
    cookie_secure: bool,
    default_same_site: SameSite,
) -> Result<SameSite, SessionConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" => {
            validate_same_site_none(mode, cookie_secure)?;
            Ok(SameSite::None)
        }
        _ => debug_warn_or_error(
            mode,
            default_same_site,
            SessionConfigError::InvalidSetting {
                name: SAMESITE_SETTING,
                value: value.to_owned(),
                expected: SAMESITE_EXPECTED,
            },
            || warn!(value = %value, "invalid session_same_site, using default"),
        ),
    }
}

fn validate_same_site_none(mode: BuildMode, cookie_secure: bool) -> Result<(), SessionConfigError> {
    if cookie_secure {
        return Ok(());
    }

    debug_warn_or_error(mode, (), SessionConfigError::InsecureSameSiteNone, || {
        warn!("session_same_site=None without a secure cookie; browsers may reject it");
    })
}

pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
