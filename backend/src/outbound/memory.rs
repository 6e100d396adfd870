//! In-process user repository used when no database is configured.
//!
//! Enforces the same email and nickname uniqueness and version checks as the
//! PostgreSQL adapter so the service behaves identically in local runs and
//! tests. Every operation holds the mutex for its whole read-modify-write.
//! Data is lost when the process exits.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{UniqueField, UpdateOutcome, UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, Nickname, User, UserId};

/// Mutex-guarded vector of users kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<User>> {
        self.users.lock().unwrap_or_else(|err| err.into_inner())
    }
}

fn clash(users: &[User], candidate: &User) -> Option<UniqueField> {
    let others = users.iter().filter(|user| user.id() != candidate.id());
    for user in others {
        if user.email() == candidate.email() {
            return Some(UniqueField::Email);
        }
        if user.nickname() == candidate.nickname() {
            return Some(UniqueField::Nickname);
        }
    }
    None
}

fn stored_mut<'a>(users: &'a mut [User], id: &UserId) -> Option<&'a mut User> {
    users.iter_mut().find(|user| user.id() == id)
}

fn find_cloned(users: &[User], predicate: impl Fn(&User) -> bool) -> Option<User> {
    users.iter().find(|user| predicate(user)).cloned()
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.lock();
        if users.iter().any(|existing| existing.id() == user.id()) {
            return Err(UserPersistenceError::query(format!(
                "user {} already stored",
                user.id()
            )));
        }
        if let Some(field) = clash(&users, user) {
            return Err(UserPersistenceError::duplicate(field));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn insert_first(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut users = self.lock();
        if !users.is_empty() {
            return Ok(false);
        }
        users.push(user.clone());
        Ok(true)
    }

    async fn update(&self, user: &User) -> Result<UpdateOutcome, UserPersistenceError> {
        let mut users = self.lock();
        if let Some(field) = clash(&users, user) {
            return Err(UserPersistenceError::duplicate(field));
        }
        let Some(slot) = stored_mut(&mut users, user.id()) else {
            return Ok(UpdateOutcome::Missing);
        };
        if slot.version() != user.version() {
            return Ok(UpdateOutcome::Stale);
        }
        *slot = user.clone();
        slot.bump_version();
        Ok(UpdateOutcome::Updated)
    }

    async fn record_failed_login(
        &self,
        id: &UserId,
        max_attempts: u32,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut users = self.lock();
        Ok(stored_mut(&mut users, id).map(|slot| {
            slot.record_failed_login(max_attempts, at);
            slot.bump_version();
            slot.clone()
        }))
    }

    async fn record_login(
        &self,
        id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut users = self.lock();
        Ok(stored_mut(&mut users, id)
            .filter(|slot| !slot.is_locked())
            .map(|slot| {
                slot.record_successful_login(at);
                slot.bump_version();
                slot.clone()
            }))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut users = self.lock();
        let before = users.len();
        users.retain(|user| user.id() != id);
        Ok(users.len() != before)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(find_cloned(&self.lock(), |user| user.id() == id))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(find_cloned(&self.lock(), |user| user.email() == email))
    }

    async fn find_by_nickname(
        &self,
        nickname: &Nickname,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(find_cloned(&self.lock(), |user| user.nickname() == nickname))
    }

    async fn list(&self, skip: u64, limit: u32) -> Result<Vec<User>, UserPersistenceError> {
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self.lock().iter().skip(skip).take(limit).cloned().collect())
    }

    async fn count(&self) -> Result<u64, UserPersistenceError> {
        Ok(u64::try_from(self.lock().len()).unwrap_or(u64::MAX))
    }
}
