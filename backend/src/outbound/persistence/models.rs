//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversion to and from [`UserParts`] keeps
//! validation inside the domain constructors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Bio, EmailAddress, Nickname, PasswordHash, PersonName, ProfileUrl, User, UserId, UserParts,
    UserProfile, UserRole, VerificationToken,
};

use super::schema::users;

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub role: String,
    pub email_verified: bool,
    pub verification_token: Option<String>,
    pub hashed_password: String,
    pub failed_login_attempts: i32,
    pub is_locked: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub nickname: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub profile_picture_url: Option<&'a str>,
    pub linkedin_profile_url: Option<&'a str>,
    pub github_profile_url: Option<&'a str>,
    pub role: &'a str,
    pub email_verified: bool,
    pub verification_token: Option<&'a str>,
    pub hashed_password: &'a str,
    pub failed_login_attempts: i32,
    pub is_locked: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}

/// Changeset struct for overwriting an existing user record.
///
/// Nullable columns are written as `NULL` when the domain value is absent.
/// `version` carries the next revision; the caller filters on the current one.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserChangeset<'a> {
    pub email: &'a str,
    pub nickname: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub profile_picture_url: Option<&'a str>,
    pub linkedin_profile_url: Option<&'a str>,
    pub github_profile_url: Option<&'a str>,
    pub role: &'a str,
    pub email_verified: bool,
    pub verification_token: Option<&'a str>,
    pub hashed_password: &'a str,
    pub failed_login_attempts: i32,
    pub is_locked: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}

/// Failure converting between rows and domain users.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stored user {column}: {message}")]
pub(crate) struct RowConversionError {
    pub column: &'static str,
    pub message: String,
}

impl RowConversionError {
    fn new(column: &'static str, message: impl ToString) -> Self {
        Self {
            column,
            message: message.to_string(),
        }
    }
}

fn optional<T, E: ToString>(
    column: &'static str,
    value: Option<String>,
    parse: impl FnOnce(String) -> Result<T, E>,
) -> Result<Option<T>, RowConversionError> {
    value
        .map(parse)
        .transpose()
        .map_err(|err| RowConversionError::new(column, err))
}

fn url_str(value: Option<&ProfileUrl>) -> Option<&str> {
    value.map(AsRef::as_ref)
}

fn attempts_to_column(user: &User) -> Result<i32, RowConversionError> {
    i32::try_from(user.failed_login_attempts())
        .map_err(|err| RowConversionError::new("failed_login_attempts", err))
}

/// Stored `version` column for the revision `user` was read at.
pub(crate) fn version_to_column(user: &User) -> Result<i64, RowConversionError> {
    i64::try_from(user.version()).map_err(|err| RowConversionError::new("version", err))
}

impl TryFrom<UserRow> for User {
    type Error = RowConversionError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            id,
            email,
            nickname,
            first_name,
            last_name,
            bio,
            profile_picture_url,
            linkedin_profile_url,
            github_profile_url,
            role,
            email_verified,
            verification_token,
            hashed_password,
            failed_login_attempts,
            is_locked,
            last_login_at,
            created_at,
            updated_at,
            version,
        } = row;

        let profile = UserProfile {
            first_name: optional("first_name", first_name, PersonName::new)?,
            last_name: optional("last_name", last_name, PersonName::new)?,
            bio: optional("bio", bio, Bio::new)?,
            profile_picture_url: optional(
                "profile_picture_url",
                profile_picture_url,
                ProfileUrl::new,
            )?,
            linkedin_profile_url: optional(
                "linkedin_profile_url",
                linkedin_profile_url,
                ProfileUrl::new,
            )?,
            github_profile_url: optional("github_profile_url", github_profile_url, ProfileUrl::new)?,
        };

        Ok(User::from_parts(UserParts {
            id: UserId::from_uuid(id),
            email: EmailAddress::new(email).map_err(|err| RowConversionError::new("email", err))?,
            nickname: Nickname::new(nickname)
                .map_err(|err| RowConversionError::new("nickname", err))?,
            profile,
            role: role
                .parse::<UserRole>()
                .map_err(|err| RowConversionError::new("role", err))?,
            email_verified,
            verification_token: verification_token.map(VerificationToken::from_string),
            password_hash: PasswordHash::parse(hashed_password)
                .map_err(|err| RowConversionError::new("hashed_password", err))?,
            failed_login_attempts: u32::try_from(failed_login_attempts)
                .map_err(|err| RowConversionError::new("failed_login_attempts", err))?,
            is_locked,
            last_login_at,
            created_at,
            updated_at,
            version: u64::try_from(version).map_err(|err| RowConversionError::new("version", err))?,
        }))
    }
}

impl<'a> NewUserRow<'a> {
    pub(crate) fn from_user(user: &'a User) -> Result<Self, RowConversionError> {
        let profile = user.profile();
        Ok(Self {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            nickname: user.nickname().as_ref(),
            first_name: profile.first_name.as_ref().map(AsRef::as_ref),
            last_name: profile.last_name.as_ref().map(AsRef::as_ref),
            bio: profile.bio.as_ref().map(AsRef::as_ref),
            profile_picture_url: url_str(profile.profile_picture_url.as_ref()),
            linkedin_profile_url: url_str(profile.linkedin_profile_url.as_ref()),
            github_profile_url: url_str(profile.github_profile_url.as_ref()),
            role: user.role().as_str(),
            email_verified: user.email_verified(),
            verification_token: user.verification_token().map(VerificationToken::as_str),
            hashed_password: user.password_hash().as_str(),
            failed_login_attempts: attempts_to_column(user)?,
            is_locked: user.is_locked(),
            last_login_at: user.last_login_at(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
            version: version_to_column(user)?,
        })
    }
}

impl<'a> UserChangeset<'a> {
    pub(crate) fn from_user(user: &'a User) -> Result<Self, RowConversionError> {
        let NewUserRow {
            email,
            nickname,
            first_name,
            last_name,
            bio,
            profile_picture_url,
            linkedin_profile_url,
            github_profile_url,
            role,
            email_verified,
            verification_token,
            hashed_password,
            failed_login_attempts,
            is_locked,
            last_login_at,
            updated_at,
            version,
            ..
        } = NewUserRow::from_user(user)?;
        let version = version
            .checked_add(1)
            .ok_or_else(|| RowConversionError::new("version", "revision overflow"))?;
        Ok(Self {
            email,
            nickname,
            first_name,
            last_name,
            bio,
            profile_picture_url,
            linkedin_profile_url,
            github_profile_url,
            role,
            email_verified,
            verification_token,
            hashed_password,
            failed_login_attempts,
            is_locked,
            last_login_at,
            updated_at,
            version,
        })
    }
}
