//! Port abstraction for user persistence adapters and their errors.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{EmailAddress, Nickname, User, UserId};

use super::define_port_error;

/// Column guarded by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Nickname,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => f.write_str("email"),
            Self::Nickname => f.write_str("nickname"),
        }
    }
}

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A write collided with an existing email or nickname.
        Duplicate { field: UniqueField } => "user repository rejected duplicate {field}",
    }
}

/// Result of a versioned overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The stored row matched the expected version and was replaced.
    Updated,
    /// No row has this identifier.
    Missing,
    /// The row was written by someone else after it was read.
    Stale,
}

/// Driven port for storing user accounts.
///
/// Lookups by email expect the already-normalised (lower-case) address.
/// Every write advances the stored [`User::version`]; `update` only replaces
/// a row still at the version the caller read, while the login counters are
/// changed in place so concurrent attempts never overwrite each other.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user record.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Insert `user` only while no account exists; returns `false` without
    /// writing when the store already holds one.
    ///
    /// The emptiness check and the insert are a single atomic step.
    async fn insert_first(&self, user: &User) -> Result<bool, UserPersistenceError>;

    /// Overwrite a record that is still at `user.version()`.
    async fn update(&self, user: &User) -> Result<UpdateOutcome, UserPersistenceError>;

    /// Count one failed login and lock the account once the count reaches
    /// `max_attempts`; returns the stored user afterwards.
    async fn record_failed_login(
        &self,
        id: &UserId,
        max_attempts: u32,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Clear the failure count and stamp `at` as the last login, unless the
    /// account is locked. Returns `None` for locked or missing accounts.
    async fn record_login(
        &self,
        id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Remove a record; returns `false` when no row matched.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by nickname.
    async fn find_by_nickname(
        &self,
        nickname: &Nickname,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Page through users ordered by creation time.
    async fn list(&self, skip: u64, limit: u32) -> Result<Vec<User>, UserPersistenceError>;

    /// Count every stored user.
    async fn count(&self) -> Result<u64, UserPersistenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(UserPersistenceError::connection("refused"), "user repository connection failed: refused")]
    #[case(UserPersistenceError::query("syntax"), "user repository query failed: syntax")]
    #[case(UserPersistenceError::duplicate(UniqueField::Nickname), "user repository rejected duplicate nickname")]
    fn errors_render_messages(#[case] error: UserPersistenceError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }
}
