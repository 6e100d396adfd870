//! Driving port for account mutations.
//!
//! HTTP handlers call this port for registration, administration and email
//! verification. The domain service is the production implementation; handler
//! tests substitute the generated mock.

use async_trait::async_trait;

use crate::domain::{
    EmailAddress, Error, Nickname, Password, User, UserId, UserProfile, UserRole, UserUpdate,
};

/// Validated input for a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: EmailAddress,
    /// Generated when absent.
    pub nickname: Option<Nickname>,
    pub profile: UserProfile,
    pub password: Password,
}

/// Domain use-case port for creating and changing accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccountsCommand: Send + Sync {
    /// Self-service registration; sends a verification email.
    async fn register(&self, account: NewAccount) -> Result<User, Error>;

    /// Staff-initiated creation with an optional explicit role.
    async fn create(&self, account: NewAccount, role: Option<UserRole>) -> Result<User, Error>;

    /// Apply a partial update to an existing account.
    async fn update(&self, id: &UserId, update: UserUpdate) -> Result<User, Error>;

    /// Remove an account.
    async fn delete(&self, id: &UserId) -> Result<(), Error>;

    /// Confirm an email address using the emailed token.
    async fn verify_email(&self, id: &UserId, token: &str) -> Result<User, Error>;

    /// Clear a lockout; fails with `not_found` when the account is not locked.
    async fn unlock(&self, id: &UserId) -> Result<User, Error>;

    /// Replace the password and clear any lockout.
    async fn reset_password(&self, id: &UserId, password: Password) -> Result<(), Error>;
}
