//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call it to authenticate credentials without knowing the
//! backing infrastructure, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, User};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the signed-in account.
    ///
    /// Unknown emails, wrong passwords and unverified accounts all fail with
    /// the same `unauthorized` error; locked accounts fail with
    /// `invalid_request`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}
