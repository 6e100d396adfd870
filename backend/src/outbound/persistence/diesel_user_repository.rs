//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Rows are converted through the domain constructors on the way out, so a
//! corrupt row surfaces as a query error rather than an invalid aggregate.
//!
//! Overwrites are guarded by the `version` column and the login counters are
//! changed with single `UPDATE ... RETURNING` statements, so interleaved
//! requests never write back stale columns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::exists;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{UpdateOutcome, UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, Nickname, User, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, RowConversionError, UserChangeset, UserRow, version_to_column};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn first_user(
        &self,
        query: users::BoxedQuery<'static, Pg>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = query
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }
}

fn map_conversion_error(error: RowConversionError) -> UserPersistenceError {
    UserPersistenceError::query(error.to_string())
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    User::try_from(row).map_err(map_conversion_error)
}

/// Attempt count at which the next failure locks the account.
fn lock_threshold(max_attempts: u32) -> i32 {
    i32::try_from(max_attempts.saturating_sub(1)).unwrap_or(i32::MAX)
}

/// Serialises first-account inserts against every other insert.
const LOCK_USERS_TABLE: &str = "LOCK TABLE users IN SHARE ROW EXCLUSIVE MODE";

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow::from_user(user).map_err(map_conversion_error)?;

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn insert_first(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow::from_user(user).map_err(map_conversion_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::sql_query(LOCK_USERS_TABLE).execute(conn).await?;
                let existing: i64 = users::table.count().get_result(conn).await?;
                if existing > 0 {
                    return Ok(false);
                }
                diesel::insert_into(users::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn update(&self, user: &User) -> Result<UpdateOutcome, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserChangeset::from_user(user).map_err(map_conversion_error)?;
        let expected = version_to_column(user).map_err(map_conversion_error)?;
        let id = *user.id().as_uuid();

        let affected = diesel::update(
            users::table
                .filter(users::id.eq(id))
                .filter(users::version.eq(expected)),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        if affected > 0 {
            return Ok(UpdateOutcome::Updated);
        }

        let present: bool = diesel::select(exists(users::table.filter(users::id.eq(id))))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(if present {
            UpdateOutcome::Stale
        } else {
            UpdateOutcome::Missing
        })
    }

    async fn record_failed_login(
        &self,
        id: &UserId,
        max_attempts: u32,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(users::table.filter(users::id.eq(*id.as_uuid())))
            .set((
                users::failed_login_attempts.eq(users::failed_login_attempts + 1),
                users::is_locked.eq(users::is_locked
                    .or(users::failed_login_attempts.ge(lock_threshold(max_attempts)))),
                users::updated_at.eq(at),
                users::version.eq(users::version + 1),
            ))
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn record_login(
        &self,
        id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(
            users::table
                .filter(users::id.eq(*id.as_uuid()))
                .filter(users::is_locked.eq(false)),
        )
        .set((
            users::failed_login_attempts.eq(0),
            users::last_login_at.eq(Some(at)),
            users::updated_at.eq(at),
            users::version.eq(users::version + 1),
        ))
        .returning(UserRow::as_returning())
        .get_result::<UserRow>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::delete(users::table.filter(users::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        self.first_user(users::table.filter(users::id.eq(*id.as_uuid())).into_boxed())
            .await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.first_user(
            users::table
                .filter(users::email.eq(email.as_ref().to_owned()))
                .into_boxed(),
        )
        .await
    }

    async fn find_by_nickname(
        &self,
        nickname: &Nickname,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.first_user(
            users::table
                .filter(users::nickname.eq(nickname.as_ref().to_owned()))
                .into_boxed(),
        )
        .await
    }

    async fn list(&self, skip: u64, limit: u32) -> Result<Vec<User>, UserPersistenceError> {
        let offset = i64::try_from(skip)
            .map_err(|_| UserPersistenceError::query("offset exceeds supported range"))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .order((users::created_at.asc(), users::id.asc()))
            .offset(offset)
            .limit(i64::from(limit))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn count(&self) -> Result<u64, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        u64::try_from(total).map_err(|_| UserPersistenceError::query("negative row count"))
    }
}
