//! Request and response bodies for the account endpoints.
//!
//! Inbound DTOs are plain strings; conversion into domain values happens
//! here so handlers receive validated types or a field-level 400 error.

use chrono::{DateTime, Utc};
use pagination::{Link, Page, PageLinks};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::NewAccount;
use crate::domain::{
    Bio, EmailAddress, Error, LoginCredentials, Nickname, Password, PersonName, ProfileUrl, User,
    UserProfile, UserRole, UserUpdate, UserValidationError,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, credential_error, user_field_error};

const EMAIL: FieldName = FieldName::new("email");
const NICKNAME: FieldName = FieldName::new("nickname");
const PASSWORD: FieldName = FieldName::new("password");

/// Optional profile fields shared by registration, creation, and update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFields {
    #[schema(example = "John")]
    pub first_name: Option<String>,
    #[schema(example = "Doe")]
    pub last_name: Option<String>,
    #[schema(example = "Experienced software developer specialising in web applications.")]
    pub bio: Option<String>,
    #[schema(example = "https://example.com/profiles/john.jpg")]
    pub profile_picture_url: Option<String>,
    #[schema(example = "https://linkedin.com/in/johndoe")]
    pub linkedin_profile_url: Option<String>,
    #[schema(example = "https://github.com/johndoe")]
    pub github_profile_url: Option<String>,
}

fn optional<T>(
    value: Option<String>,
    field: &'static str,
    parse: impl FnOnce(String) -> Result<T, UserValidationError>,
) -> Result<Option<T>, Error> {
    value
        .map(|raw| parse(raw).map_err(|err| user_field_error(FieldName::new(field), &err)))
        .transpose()
}

/// Drop values that are empty once trimmed.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

impl ProfileFields {
    /// Treat blank strings as omitted fields.
    fn without_blanks(self) -> Self {
        Self {
            first_name: non_blank(self.first_name),
            last_name: non_blank(self.last_name),
            bio: non_blank(self.bio),
            profile_picture_url: non_blank(self.profile_picture_url),
            linkedin_profile_url: non_blank(self.linkedin_profile_url),
            github_profile_url: non_blank(self.github_profile_url),
        }
    }

    fn into_profile(self) -> Result<UserProfile, Error> {
        Ok(UserProfile {
            first_name: optional(self.first_name, "firstName", PersonName::new)?,
            last_name: optional(self.last_name, "lastName", PersonName::new)?,
            bio: optional(self.bio, "bio", Bio::new)?,
            profile_picture_url: optional(
                self.profile_picture_url,
                "profilePictureUrl",
                ProfileUrl::new,
            )?,
            linkedin_profile_url: optional(
                self.linkedin_profile_url,
                "linkedinProfileUrl",
                ProfileUrl::new,
            )?,
            github_profile_url: optional(
                self.github_profile_url,
                "githubProfileUrl",
                ProfileUrl::new,
            )?,
        })
    }
}

/// Body for `POST /register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "john.doe@example.com")]
    pub email: String,
    /// Generated when omitted.
    #[schema(example = "clever_fox_123")]
    pub nickname: Option<String>,
    #[schema(example = "Secure*1234")]
    pub password: String,
    #[serde(flatten)]
    pub profile: ProfileFields,
}

impl TryFrom<RegisterRequest> for NewAccount {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let email = EmailAddress::new(&value.email).map_err(|err| user_field_error(EMAIL, &err))?;
        let nickname = optional(value.nickname, "nickname", Nickname::new)?;
        let password = Password::new(value.password).map_err(|err| credential_error(PASSWORD, &err))?;
        Ok(Self {
            email,
            nickname,
            profile: value.profile.into_profile()?,
            password,
        })
    }
}

/// Body for `POST /users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(flatten)]
    pub account: RegisterRequest,
    /// Defaults to `AUTHENTICATED`.
    pub role: Option<UserRole>,
}

impl CreateUserRequest {
    /// Split into the validated account and the requested role.
    pub fn into_parts(self) -> Result<(NewAccount, Option<UserRole>), Error> {
        Ok((NewAccount::try_from(self.account)?, self.role))
    }
}

/// Body for `PUT /users/{id}`; at least one non-blank field must be present.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub nickname: Option<String>,
    #[serde(flatten)]
    pub profile: ProfileFields,
    pub role: Option<UserRole>,
}

impl TryFrom<UpdateUserRequest> for UserUpdate {
    type Error = Error;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        let email = non_blank(value.email)
            .map(|raw| EmailAddress::new(&raw).map_err(|err| user_field_error(EMAIL, &err)))
            .transpose()?;
        let nickname = non_blank(value.nickname)
            .map(|raw| Nickname::new(raw).map_err(|err| user_field_error(NICKNAME, &err)))
            .transpose()?;
        let profile = value.profile.without_blanks().into_profile()?;
        let update = Self {
            email,
            nickname,
            first_name: profile.first_name,
            last_name: profile.last_name,
            bio: profile.bio,
            profile_picture_url: profile.profile_picture_url,
            linkedin_profile_url: profile.linkedin_profile_url,
            github_profile_url: profile.github_profile_url,
            role: value.role,
        };
        update
            .ensure_not_empty()
            .map_err(|err| Error::invalid_request(err.to_string()))
    }
}

/// Body for `POST /login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "john.doe@example.com")]
    pub email: String,
    #[schema(example = "Secure*1234")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
            .map_err(|err| credential_error(PASSWORD, &err))
    }
}

/// Successful login payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[schema(value_type = String, format = Uuid)]
    pub user_id: String,
    pub role: UserRole,
}

/// Body for `POST /users/{id}/reset-password`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[schema(example = "N3w*Secret")]
    pub password: String,
}

impl ResetPasswordRequest {
    pub fn into_password(self) -> Result<Password, Error> {
        Password::new(self.password).map_err(|err| credential_error(PASSWORD, &err))
    }
}

/// Public view of an account with hypermedia links.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: String,
    pub email: String,
    pub nickname: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub role: UserRole,
    pub email_verified: bool,
    pub is_locked: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// `self`, `update`, and `delete` links.
    #[schema(value_type = Vec<Object>)]
    pub links: Vec<Link>,
}

fn text<T: AsRef<str>>(value: Option<&T>) -> Option<String> {
    value.map(|inner| inner.as_ref().to_owned())
}

impl UserResponse {
    pub fn from_user(user: &User, state: &HttpState) -> Self {
        let href = state.link(&format!("/users/{}", user.id())).to_string();
        let profile = user.profile();
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            nickname: user.nickname().to_string(),
            first_name: text(profile.first_name.as_ref()),
            last_name: text(profile.last_name.as_ref()),
            bio: text(profile.bio.as_ref()),
            profile_picture_url: text(profile.profile_picture_url.as_ref()),
            linkedin_profile_url: text(profile.linkedin_profile_url.as_ref()),
            github_profile_url: text(profile.github_profile_url.as_ref()),
            role: user.role(),
            email_verified: user.email_verified(),
            is_locked: user.is_locked(),
            last_login_at: user.last_login_at(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
            links: vec![
                Link::new("self", href.clone()),
                Link::new("update", href.clone()),
                Link::new("delete", href),
            ],
        }
    }
}

/// Paginated account listing.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserListResponse {
    pub items: Vec<UserResponse>,
    pub total: u64,
    pub page: u64,
    pub size: usize,
    #[schema(value_type = Object)]
    pub links: PageLinks,
}

impl UserListResponse {
    pub fn from_page(page: Page<User>, state: &HttpState) -> Self {
        let envelope = page
            .map(|user| UserResponse::from_user(&user, state))
            .into_envelope(&state.link("/users"));
        Self {
            items: envelope.items,
            total: envelope.total,
            page: envelope.page,
            size: envelope.size,
            links: envelope.links,
        }
    }
}

/// Query string for `GET /users`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Rows to skip; defaults to 0.
    pub skip: Option<u64>,
    /// Page size between 1 and 100; defaults to 10.
    pub limit: Option<u32>,
}
