//! Driving port for user-facing queries.
//!
//! Inbound adapters use this port to read accounts without importing
//! persistence concerns.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, User, UserId};

/// Domain use-case port for reading accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch one account or fail with `not_found`.
    async fn get_user(&self, id: &UserId) -> Result<User, Error>;

    /// Page through every account.
    async fn list_users(&self, request: PageRequest) -> Result<Page<User>, Error>;
}
