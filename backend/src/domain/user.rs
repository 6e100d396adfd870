//! User data model.
//!
//! Every field that arrives from a client passes through a validating newtype
//! here before a service sees it. Persistence adapters rebuild aggregates via
//! [`User::from_parts`] and never bypass these constructors for values that
//! came from outside the database.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;
use uuid::Uuid;

use super::auth::{PasswordHash, VerificationToken};

/// Validation errors returned by the user field constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    NicknameTooShort { min: usize },
    NicknameTooLong { max: usize },
    NicknameInvalidCharacters,
    InvalidEmail { reason: &'static str },
    EmailTooLong { max: usize },
    InvalidUrl,
    UnsupportedUrlScheme { scheme: String },
    NameTooLong { max: usize },
    BioTooLong { max: usize },
    UnknownRole,
    EmptyUpdate,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::NicknameTooShort { min } => {
                write!(f, "nickname must be at least {min} characters")
            }
            Self::NicknameTooLong { max } => {
                write!(f, "nickname must be at most {max} characters")
            }
            Self::NicknameInvalidCharacters => write!(
                f,
                "nickname may only contain letters, numbers, underscores, or hyphens",
            ),
            Self::InvalidEmail { reason } => {
                write!(f, "value is not a valid email address: {reason}")
            }
            Self::EmailTooLong { max } => {
                write!(f, "email address must be at most {max} characters")
            }
            Self::InvalidUrl => write!(f, "URL must be an absolute http or https address"),
            Self::UnsupportedUrlScheme { scheme } => {
                write!(f, "URL scheme '{scheme}' is not allowed; use http or https")
            }
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::BioTooLong { max } => write!(f, "bio must be at most {max} characters"),
            Self::UnknownRole => write!(
                f,
                "role must be one of ANONYMOUS, AUTHENTICATED, MANAGER, or ADMIN",
            ),
            Self::EmptyUpdate => write!(f, "At least one field must be provided for update"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap a UUID read from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Public, unique handle chosen by (or generated for) a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nickname(String);

/// Minimum allowed length for a nickname.
pub const NICKNAME_MIN: usize = 3;
/// Maximum allowed length for a nickname.
pub const NICKNAME_MAX: usize = 50;

static NICKNAME_RE: OnceLock<Regex> = OnceLock::new();

fn nickname_regex() -> &'static Regex {
    NICKNAME_RE.get_or_init(|| {
        // Length is enforced separately; `\w` is Unicode-aware.
        Regex::new(r"^[\w-]+$")
            .unwrap_or_else(|error| panic!("nickname regex failed to compile: {error}"))
    })
}

impl Nickname {
    /// Validate and construct a [`Nickname`].
    ///
    /// # Examples
    /// ```
    /// use event_manager::domain::Nickname;
    ///
    /// assert!(Nickname::new("test-user").is_ok());
    /// assert!(Nickname::new("test user").is_err());
    /// ```
    pub fn new(nickname: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(nickname.into())
    }

    /// Wrap a value already known to satisfy the nickname rules.
    pub(crate) fn from_trusted(nickname: String) -> Self {
        Self(nickname)
    }

    fn from_owned(nickname: String) -> Result<Self, UserValidationError> {
        let length = nickname.chars().count();
        if length < NICKNAME_MIN {
            return Err(UserValidationError::NicknameTooShort { min: NICKNAME_MIN });
        }
        if length > NICKNAME_MAX {
            return Err(UserValidationError::NicknameTooLong { max: NICKNAME_MAX });
        }
        if !nickname_regex().is_match(&nickname) {
            return Err(UserValidationError::NicknameInvalidCharacters);
        }

        Ok(Self(nickname))
    }
}

impl AsRef<str> for Nickname {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Nickname> for String {
    fn from(value: Nickname) -> Self {
        value.0
    }
}

impl TryFrom<String> for Nickname {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Syntactically valid, lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 254;

static EMAIL_LOCAL_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_DOMAIN_RE: OnceLock<Regex> = OnceLock::new();

fn email_local_regex() -> &'static Regex {
    EMAIL_LOCAL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*$")
            .unwrap_or_else(|error| panic!("email local-part regex failed to compile: {error}"))
    })
}

fn email_domain_regex() -> &'static Regex {
    EMAIL_DOMAIN_RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$")
            .unwrap_or_else(|error| panic!("email domain regex failed to compile: {error}"))
    })
}

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    ///
    /// Surrounding whitespace is trimmed and the address is lower-cased so
    /// uniqueness checks are case-insensitive.
    ///
    /// # Examples
    /// ```
    /// use event_manager::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new(" John.Doe@Example.com ").unwrap();
    /// assert_eq!(email.as_ref(), "john.doe@example.com");
    /// assert!(EmailAddress::new("john.doe.example.com").is_err());
    /// ```
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::InvalidEmail {
                reason: "The email address is empty.",
            });
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(UserValidationError::InvalidEmail {
                reason: "The email address is not valid. It must have exactly one @-sign.",
            });
        };
        if domain.contains('@') {
            return Err(UserValidationError::InvalidEmail {
                reason: "The email address is not valid. It must have exactly one @-sign.",
            });
        }
        if !email_local_regex().is_match(local) {
            return Err(UserValidationError::InvalidEmail {
                reason: "The part before the @-sign is not valid.",
            });
        }
        if !email_domain_regex().is_match(domain) {
            return Err(UserValidationError::InvalidEmail {
                reason: "The part after the @-sign is not a valid domain name.",
            });
        }

        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Absolute `http` or `https` URL attached to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileUrl(String);

impl ProfileUrl {
    /// Validate and construct a [`ProfileUrl`].
    ///
    /// The caller's spelling is preserved; only the parse result is checked.
    ///
    /// # Examples
    /// ```
    /// use event_manager::domain::ProfileUrl;
    ///
    /// assert!(ProfileUrl::new("https://github.com/ada").is_ok());
    /// assert!(ProfileUrl::new("ftp://files.example.com").is_err());
    /// assert!(ProfileUrl::new("http//missing-colon.com").is_err());
    /// ```
    pub fn new(url: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = url.into();
        let parsed = Url::parse(raw.trim()).map_err(|_| UserValidationError::InvalidUrl)?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(UserValidationError::UnsupportedUrlScheme {
                    scheme: other.to_owned(),
                });
            }
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(UserValidationError::InvalidUrl);
        }
        Ok(Self(raw.trim().to_owned()))
    }
}

impl AsRef<str> for ProfileUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ProfileUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ProfileUrl> for String {
    fn from(value: ProfileUrl) -> Self {
        value.0
    }
}

impl TryFrom<String> for ProfileUrl {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum length of a first or last name.
pub const PERSON_NAME_MAX: usize = 100;
/// Maximum length of a biography.
pub const BIO_MAX: usize = 500;

/// First or last name, trimmed and length-limited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a [`PersonName`].
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.chars().count() > PERSON_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: PERSON_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PersonName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Free-form profile biography.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Bio(String);

impl Bio {
    /// Validate and construct a [`Bio`].
    pub fn new(bio: impl Into<String>) -> Result<Self, UserValidationError> {
        let bio = bio.into();
        if bio.chars().count() > BIO_MAX {
            return Err(UserValidationError::BioTooLong { max: BIO_MAX });
        }
        Ok(Self(bio))
    }
}

impl AsRef<str> for Bio {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Bio> for String {
    fn from(value: Bio) -> Self {
        value.0
    }
}

impl TryFrom<String> for Bio {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Access level granted to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Registered but not yet verified.
    Anonymous,
    /// Verified account with standard access.
    Authenticated,
    /// May administer user records.
    Manager,
    /// Full administrative access.
    Admin,
}

impl UserRole {
    /// Upper-case wire and storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "ANONYMOUS",
            Self::Authenticated => "AUTHENTICATED",
            Self::Manager => "MANAGER",
            Self::Admin => "ADMIN",
        }
    }

    /// Whether this role may manage other users' records.
    pub const fn can_manage_users(self) -> bool {
        matches!(self, Self::Manager | Self::Admin)
    }

    /// Whether this role may assign `role` to an account.
    ///
    /// Managers may grant any role up to their own; only administrators
    /// may grant `ADMIN`.
    pub const fn may_grant(self, role: UserRole) -> bool {
        match self {
            Self::Admin => true,
            Self::Manager => !matches!(role, Self::Admin),
            Self::Anonymous | Self::Authenticated => false,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ANONYMOUS" => Ok(Self::Anonymous),
            "AUTHENTICATED" => Ok(Self::Authenticated),
            "MANAGER" => Ok(Self::Manager),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(UserValidationError::UnknownRole),
        }
    }
}

/// Optional descriptive profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    /// Given name.
    pub first_name: Option<PersonName>,
    /// Family name.
    pub last_name: Option<PersonName>,
    /// Short biography.
    pub bio: Option<Bio>,
    /// Avatar image location.
    pub profile_picture_url: Option<ProfileUrl>,
    /// LinkedIn profile.
    pub linkedin_profile_url: Option<ProfileUrl>,
    /// GitHub profile.
    pub github_profile_url: Option<ProfileUrl>,
}

/// Partial update of a user's editable fields.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub email: Option<EmailAddress>,
    pub nickname: Option<Nickname>,
    pub first_name: Option<PersonName>,
    pub last_name: Option<PersonName>,
    pub bio: Option<Bio>,
    pub profile_picture_url: Option<ProfileUrl>,
    pub linkedin_profile_url: Option<ProfileUrl>,
    pub github_profile_url: Option<ProfileUrl>,
    pub role: Option<UserRole>,
}

impl UserUpdate {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Reject updates that carry no fields.
    pub fn ensure_not_empty(self) -> Result<Self, UserValidationError> {
        if self.is_empty() {
            return Err(UserValidationError::EmptyUpdate);
        }
        Ok(self)
    }
}

/// Plain field bag used to rebuild a [`User`] from storage.
#[derive(Debug, Clone)]
pub struct UserParts {
    pub id: UserId,
    pub email: EmailAddress,
    pub nickname: Nickname,
    pub profile: UserProfile,
    pub role: UserRole,
    pub email_verified: bool,
    pub verification_token: Option<VerificationToken>,
    pub password_hash: PasswordHash,
    pub failed_login_attempts: u32,
    pub is_locked: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

/// Registered account and its login state.
///
/// ## Invariants
/// - `email` and `nickname` are unique across all users (enforced by the
///   repository).
/// - `updated_at >= created_at`.
/// - A locked account has `failed_login_attempts` at or above the configured
///   limit at the time it locked.
/// - `version` increases by one with every stored write; repositories refuse
///   an overwrite whose version no longer matches the stored row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    nickname: Nickname,
    profile: UserProfile,
    role: UserRole,
    email_verified: bool,
    verification_token: Option<VerificationToken>,
    password_hash: PasswordHash,
    failed_login_attempts: u32,
    is_locked: bool,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

/// Inputs for creating a brand new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: EmailAddress,
    pub nickname: Nickname,
    pub profile: UserProfile,
    pub role: UserRole,
    pub password_hash: PasswordHash,
    pub verification_token: Option<VerificationToken>,
    pub email_verified: bool,
}

impl User {
    /// Create a fresh account with a random identifier.
    pub fn register(new_user: NewUser, now: DateTime<Utc>) -> Self {
        let NewUser {
            email,
            nickname,
            profile,
            role,
            password_hash,
            verification_token,
            email_verified,
        } = new_user;
        Self {
            id: UserId::random(),
            email,
            nickname,
            profile,
            role,
            email_verified,
            verification_token,
            password_hash,
            failed_login_attempts: 0,
            is_locked: false,
            last_login_at: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Rebuild an aggregate from stored fields.
    pub fn from_parts(parts: UserParts) -> Self {
        let UserParts {
            id,
            email,
            nickname,
            profile,
            role,
            email_verified,
            verification_token,
            password_hash,
            failed_login_attempts,
            is_locked,
            last_login_at,
            created_at,
            updated_at,
            version,
        } = parts;
        Self {
            id,
            email,
            nickname,
            profile,
            role,
            email_verified,
            verification_token,
            password_hash,
            failed_login_attempts,
            is_locked,
            last_login_at,
            created_at,
            updated_at,
            version,
        }
    }

    /// Decompose into stored fields.
    pub fn into_parts(self) -> UserParts {
        UserParts {
            id: self.id,
            email: self.email,
            nickname: self.nickname,
            profile: self.profile,
            role: self.role,
            email_verified: self.email_verified,
            verification_token: self.verification_token,
            password_hash: self.password_hash,
            failed_login_attempts: self.failed_login_attempts,
            is_locked: self.is_locked,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
            version: self.version,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn nickname(&self) -> &Nickname {
        &self.nickname
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn email_verified(&self) -> bool {
        self.email_verified
    }

    pub fn verification_token(&self) -> Option<&VerificationToken> {
        self.verification_token.as_ref()
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn failed_login_attempts(&self) -> u32 {
        self.failed_login_attempts
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Revision of the stored row this aggregate was read from.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Advance the revision after a successful write.
    pub fn bump_version(&mut self) {
        self.version = self.version.saturating_add(1);
    }

    /// Apply a partial update and bump `updated_at`.
    pub fn apply_update(&mut self, update: UserUpdate, now: DateTime<Utc>) {
        let UserUpdate {
            email,
            nickname,
            first_name,
            last_name,
            bio,
            profile_picture_url,
            linkedin_profile_url,
            github_profile_url,
            role,
        } = update;

        if let Some(value) = email {
            self.email = value;
        }
        if let Some(value) = nickname {
            self.nickname = value;
        }
        if let Some(value) = role {
            self.role = value;
        }
        let profile = &mut self.profile;
        replace_if_some(&mut profile.first_name, first_name);
        replace_if_some(&mut profile.last_name, last_name);
        replace_if_some(&mut profile.bio, bio);
        replace_if_some(&mut profile.profile_picture_url, profile_picture_url);
        replace_if_some(&mut profile.linkedin_profile_url, linkedin_profile_url);
        replace_if_some(&mut profile.github_profile_url, github_profile_url);
        self.touch(now);
    }

    /// Count a failed login; returns `true` when this attempt locked the account.
    pub fn record_failed_login(&mut self, max_attempts: u32, now: DateTime<Utc>) -> bool {
        self.failed_login_attempts = self.failed_login_attempts.saturating_add(1);
        let newly_locked = !self.is_locked && self.failed_login_attempts >= max_attempts;
        if newly_locked {
            self.is_locked = true;
        }
        self.touch(now);
        newly_locked
    }

    /// Reset the failure counter and stamp the login time.
    pub fn record_successful_login(&mut self, now: DateTime<Utc>) {
        self.failed_login_attempts = 0;
        self.last_login_at = Some(now);
        self.touch(now);
    }

    /// Clear the lock and the failure counter.
    pub fn unlock(&mut self, now: DateTime<Utc>) {
        self.is_locked = false;
        self.failed_login_attempts = 0;
        self.touch(now);
    }

    /// Replace the password hash and clear any lockout.
    pub fn reset_password(&mut self, password_hash: PasswordHash, now: DateTime<Utc>) {
        self.password_hash = password_hash;
        self.unlock(now);
    }

    /// Mark the email verified, promoting anonymous accounts.
    pub fn mark_email_verified(&mut self, now: DateTime<Utc>) {
        self.email_verified = true;
        self.verification_token = None;
        if self.role == UserRole::Anonymous {
            self.role = UserRole::Authenticated;
        }
        self.touch(now);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

fn replace_if_some<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}
