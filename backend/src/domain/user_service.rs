//! Account domain service.
//!
//! Implements the [`UserAccountsCommand`], [`UsersQuery`] and [`LoginService`]
//! driving ports on top of a [`UserRepository`] and an [`EmailNotifier`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use serde_json::json;
use tracing::{info, warn};
use url::Url;

use crate::domain::ports::{
    EmailNotifier, LoginService, NewAccount, UniqueField, UpdateOutcome, UserAccountsCommand,
    UserPersistenceError, UserRepository, UsersQuery,
};
use crate::domain::{
    EmailAddress, Error, LoginCredentials, NewUser, Nickname, Password, PasswordHash, User,
    UserId, UserRole, UserUpdate, VerificationToken, generate_nickname, verification_email,
};

/// Message returned for every credential failure that must not leak detail.
pub const LOGIN_FAILED_MESSAGE: &str = "Incorrect email or password.";
/// Message returned when a locked account tries to log in.
pub const ACCOUNT_LOCKED_MESSAGE: &str = "Account locked due to too many failed login attempts.";
/// Message returned for unknown or stale verification links.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired verification token";
/// Generated-nickname collisions tolerated before giving up.
const NICKNAME_ATTEMPTS: usize = 10;

/// Tunables for the account service.
#[derive(Debug, Clone)]
pub struct AccountPolicy {
    /// Consecutive failures that lock an account.
    pub max_login_attempts: u32,
    /// Public origin used in emailed links.
    pub public_base_url: Url,
}

fn duplicate_error(field: UniqueField) -> Error {
    let (message, code) = match field {
        UniqueField::Email => ("Email already exists", "email_taken"),
        UniqueField::Nickname => ("Nickname already exists", "nickname_taken"),
    };
    Error::invalid_request(message).with_details(json!({
        "field": field.to_string(),
        "code": code,
    }))
}

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { field } => duplicate_error(field),
    }
}

fn user_not_found(id: &UserId) -> Error {
    Error::not_found(format!("User {id} not found"))
}

/// Account service implementing the user driving ports.
#[derive(Clone)]
pub struct UserService<R: ?Sized> {
    repo: Arc<R>,
    notifier: Arc<dyn EmailNotifier>,
    clock: Arc<dyn Clock>,
    policy: AccountPolicy,
}

impl<R> UserService<R>
where
    R: UserRepository + ?Sized,
{
    /// Create a service over the given adapters.
    pub fn new(
        repo: Arc<R>,
        notifier: Arc<dyn EmailNotifier>,
        clock: Arc<dyn Clock>,
        policy: AccountPolicy,
    ) -> Self {
        Self {
            repo,
            notifier,
            clock,
            policy,
        }
    }

    async fn load(&self, id: &UserId) -> Result<User, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| user_not_found(id))
    }

    /// Write back a modified user, refusing to clobber a concurrent change.
    async fn store(&self, user: &mut User) -> Result<(), Error> {
        match self.repo.update(user).await.map_err(map_repository_error)? {
            UpdateOutcome::Updated => {
                user.bump_version();
                Ok(())
            }
            UpdateOutcome::Missing => Err(user_not_found(user.id())),
            UpdateOutcome::Stale => Err(Error::conflict(format!(
                "User {} was modified concurrently; retry the request",
                user.id()
            ))),
        }
    }

    async fn ensure_email_free(
        &self,
        email: &EmailAddress,
        owner: Option<&UserId>,
    ) -> Result<(), Error> {
        let existing = self
            .repo
            .find_by_email(email)
            .await
            .map_err(map_repository_error)?;
        match existing {
            Some(user) if Some(user.id()) != owner => Err(duplicate_error(UniqueField::Email)),
            _ => Ok(()),
        }
    }

    async fn ensure_nickname_free(
        &self,
        nickname: &Nickname,
        owner: Option<&UserId>,
    ) -> Result<(), Error> {
        let existing = self
            .repo
            .find_by_nickname(nickname)
            .await
            .map_err(map_repository_error)?;
        match existing {
            Some(user) if Some(user.id()) != owner => Err(duplicate_error(UniqueField::Nickname)),
            _ => Ok(()),
        }
    }

    async fn allocate_nickname(&self, requested: Option<Nickname>) -> Result<Nickname, Error> {
        if let Some(nickname) = requested {
            self.ensure_nickname_free(&nickname, None).await?;
            return Ok(nickname);
        }
        for _ in 0..NICKNAME_ATTEMPTS {
            let candidate = generate_nickname(&mut rand::thread_rng());
            let taken = self
                .repo
                .find_by_nickname(&candidate)
                .await
                .map_err(map_repository_error)?;
            if taken.is_none() {
                return Ok(candidate);
            }
        }
        Err(Error::conflict("Could not generate a unique nickname; please choose one"))
    }

    /// Create and persist an account, then send its verification email.
    ///
    /// The very first account becomes a verified `ADMIN`; the repository
    /// decides that atomically so concurrent registrations cannot both win.
    async fn provision(&self, account: NewAccount, role: Option<UserRole>) -> Result<User, Error> {
        let NewAccount {
            email,
            nickname,
            profile,
            password,
        } = account;
        self.ensure_email_free(&email, None).await?;
        let nickname = self.allocate_nickname(nickname).await?;
        let password_hash = hash_password(password).await?;

        let now = self.clock.utc();
        let build = |role: UserRole,
                     email_verified: bool,
                     verification_token: Option<VerificationToken>| {
            User::register(
                NewUser {
                    email: email.clone(),
                    nickname: nickname.clone(),
                    profile: profile.clone(),
                    role,
                    password_hash: password_hash.clone(),
                    verification_token,
                    email_verified,
                },
                now,
            )
        };

        if self.repo.count().await.map_err(map_repository_error)? == 0 {
            let admin = build(UserRole::Admin, true, None);
            if self
                .repo
                .insert_first(&admin)
                .await
                .map_err(map_repository_error)?
            {
                info!(user_id = %admin.id(), "first account created as administrator");
                return Ok(admin);
            }
        }

        let user = build(
            role.unwrap_or(UserRole::Anonymous),
            false,
            Some(VerificationToken::generate()),
        );
        self.repo.insert(&user).await.map_err(map_repository_error)?;
        info!(user_id = %user.id(), role = %user.role(), "account created");

        self.send_verification(&user).await;
        Ok(user)
    }

    async fn send_verification(&self, user: &User) {
        let Some(email) = verification_email(&self.policy.public_base_url, user) else {
            return;
        };
        if let Err(error) = self.notifier.send(&email).await {
            warn!(user_id = %user.id(), %error, "verification email not delivered");
        }
    }
}

async fn hash_password(password: Password) -> Result<PasswordHash, Error> {
    tokio::task::spawn_blocking(move || PasswordHash::hash(&password))
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
        .map_err(|err| Error::internal(err.to_string()))
}

async fn verify_password(hash: PasswordHash, candidate: String) -> Result<bool, Error> {
    let candidate = zeroize::Zeroizing::new(candidate);
    tokio::task::spawn_blocking(move || hash.verify(candidate.as_str()))
        .await
        .map_err(|err| Error::internal(format!("password verification task failed: {err}")))
}

#[async_trait]
impl<R> UserAccountsCommand for UserService<R>
where
    R: UserRepository + ?Sized,
{
    async fn register(&self, account: NewAccount) -> Result<User, Error> {
        self.provision(account, None).await
    }

    async fn create(&self, account: NewAccount, role: Option<UserRole>) -> Result<User, Error> {
        self.provision(account, Some(role.unwrap_or(UserRole::Authenticated)))
            .await
    }

    async fn update(&self, id: &UserId, update: UserUpdate) -> Result<User, Error> {
        let update = update
            .ensure_not_empty()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let mut user = self.load(id).await?;

        if let Some(email) = update.email.as_ref() {
            self.ensure_email_free(email, Some(id)).await?;
        }
        if let Some(nickname) = update.nickname.as_ref() {
            self.ensure_nickname_free(nickname, Some(id)).await?;
        }

        user.apply_update(update, self.clock.utc());
        self.store(&mut user).await?;
        info!(user_id = %id, "account updated");
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), Error> {
        let removed = self.repo.delete(id).await.map_err(map_repository_error)?;
        if !removed {
            return Err(user_not_found(id));
        }
        info!(user_id = %id, "account deleted");
        Ok(())
    }

    async fn verify_email(&self, id: &UserId, token: &str) -> Result<User, Error> {
        let invalid = || Error::invalid_request(INVALID_TOKEN_MESSAGE);
        let mut user = self
            .repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(invalid)?;
        let matches = user
            .verification_token()
            .is_some_and(|expected| expected.matches(token));
        if !matches {
            return Err(invalid());
        }

        user.mark_email_verified(self.clock.utc());
        self.store(&mut user).await?;
        info!(user_id = %id, "email verified");
        Ok(user)
    }

    async fn unlock(&self, id: &UserId) -> Result<User, Error> {
        let mut user = self.load(id).await?;
        if !user.is_locked() {
            return Err(Error::not_found(format!("User {id} is not locked")));
        }
        user.unlock(self.clock.utc());
        self.store(&mut user).await?;
        info!(user_id = %id, "account unlocked");
        Ok(user)
    }

    async fn reset_password(&self, id: &UserId, password: Password) -> Result<(), Error> {
        let mut user = self.load(id).await?;
        let hash = hash_password(password).await?;
        user.reset_password(hash, self.clock.utc());
        self.store(&mut user).await?;
        info!(user_id = %id, "password reset");
        Ok(())
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository + ?Sized,
{
    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        self.load(id).await
    }

    async fn list_users(&self, request: PageRequest) -> Result<Page<User>, Error> {
        let users = self
            .repo
            .list(request.skip(), request.limit())
            .await
            .map_err(map_repository_error)?;
        let total = self.repo.count().await.map_err(map_repository_error)?;
        Ok(Page::new(users, total, request))
    }
}

#[async_trait]
impl<R> LoginService for UserService<R>
where
    R: UserRepository + ?Sized,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(user) = self
            .repo
            .find_by_email(credentials.email())
            .await
            .map_err(map_repository_error)?
        else {
            return Err(Error::unauthorized(LOGIN_FAILED_MESSAGE));
        };

        if user.is_locked() {
            warn!(user_id = %user.id(), "login attempt on locked account");
            return Err(Error::invalid_request(ACCOUNT_LOCKED_MESSAGE));
        }
        if !user.email_verified() {
            return Err(Error::unauthorized(LOGIN_FAILED_MESSAGE));
        }

        let valid = verify_password(
            user.password_hash().clone(),
            credentials.password().to_owned(),
        )
        .await?;
        let now = self.clock.utc();
        if !valid {
            let counted = self
                .repo
                .record_failed_login(user.id(), self.policy.max_login_attempts, now)
                .await
                .map_err(map_repository_error)?;
            if let Some(counted) = counted.filter(User::is_locked) {
                warn!(
                    user_id = %counted.id(),
                    attempts = counted.failed_login_attempts(),
                    "account locked after repeated login failures"
                );
            }
            return Err(Error::unauthorized(LOGIN_FAILED_MESSAGE));
        }

        match self
            .repo
            .record_login(user.id(), now)
            .await
            .map_err(map_repository_error)?
        {
            Some(user) => {
                info!(user_id = %user.id(), "login succeeded");
                Ok(user)
            }
            // Locked or removed between the lookup and the write.
            None => {
                let locked = self
                    .repo
                    .find_by_id(user.id())
                    .await
                    .map_err(map_repository_error)?
                    .is_some_and(|current| current.is_locked());
                if locked {
                    Err(Error::invalid_request(ACCOUNT_LOCKED_MESSAGE))
                } else {
                    Err(Error::unauthorized(LOGIN_FAILED_MESSAGE))
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
