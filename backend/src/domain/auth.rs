//! Authentication primitives: credentials, passwords, and verification tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::RngCore;
use zeroize::Zeroizing;

use super::user::{EmailAddress, UserValidationError};

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 8;
/// Maximum accepted password length.
pub const PASSWORD_MAX: usize = 128;
const VERIFICATION_TOKEN_BYTES: usize = 32;

/// Domain error returned when login or password inputs are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Email was not a valid address.
    InvalidEmail(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Password shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
    /// Password longer than [`PASSWORD_MAX`].
    PasswordTooLong { max: usize },
    /// Password lacks a required character class.
    PasswordTooWeak,
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail(inner) => inner.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} characters")
            }
            Self::PasswordTooWeak => write!(
                f,
                "password must contain an upper-case letter, a lower-case letter, a digit, and a symbol",
            ),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is a syntactically valid, lower-cased address.
/// - `password` is non-empty but otherwise unchecked so legacy passwords can
///   still log in.
///
/// # Examples
/// ```
/// use event_manager::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@Example.com", "pw").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password(), "pw");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let email = EmailAddress::new(email).map_err(CredentialValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Address used for the account lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// New password that satisfies the strength policy.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a candidate password.
    ///
    /// # Examples
    /// ```
    /// use event_manager::domain::Password;
    ///
    /// assert!(Password::new("Secur3*Pass").is_ok());
    /// assert!(Password::new("password").is_err());
    /// ```
    pub fn new(password: impl Into<String>) -> Result<Self, CredentialValidationError> {
        let password = Zeroizing::new(password.into());
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        let length = password.chars().count();
        if length < PASSWORD_MIN {
            return Err(CredentialValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(CredentialValidationError::PasswordTooLong { max: PASSWORD_MAX });
        }
        let has_upper = password.chars().any(char::is_uppercase);
        let has_lower = password.chars().any(char::is_lowercase);
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_symbol = password
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace());
        if !(has_upper && has_lower && has_digit && has_symbol) {
            return Err(CredentialValidationError::PasswordTooWeak);
        }
        Ok(Self(password))
    }

    /// Plain-text value for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Errors raised while producing or parsing password hashes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The hasher rejected its inputs.
    #[error("password hashing failed: {0}")]
    Hash(String),
    /// A stored value is not a PHC-formatted hash.
    #[error("stored password hash is malformed: {0}")]
    Malformed(String),
}

/// Argon2id hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a password with a fresh random salt.
    ///
    /// Argon2 is deliberately slow; call this from a blocking context.
    pub fn hash(password: &Password) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|err| PasswordHashError::Hash(err.to_string()))?;
        Ok(Self(hash.to_string()))
    }

    /// Wrap a hash loaded from storage after checking its format.
    pub fn parse(stored: impl Into<String>) -> Result<Self, PasswordHashError> {
        let stored = stored.into();
        password_hash::PasswordHash::new(&stored)
            .map_err(|err| PasswordHashError::Malformed(err.to_string()))?;
        Ok(Self(stored))
    }

    /// Check a candidate password against this hash.
    pub fn verify(&self, candidate: &str) -> bool {
        let Ok(parsed) = password_hash::PasswordHash::new(&self.0) else {
            return false;
        };
        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }

    /// PHC string for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Opaque token proving control of an email address.
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationToken(String);

impl VerificationToken {
    /// Generate a random hex token.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0_u8; VERIFICATION_TOKEN_BYTES]);
        rand::thread_rng().fill_bytes(&mut bytes[..]);
        Self(hex::encode(&bytes[..]))
    }

    /// Wrap a token loaded from storage or received in a link.
    pub fn from_string(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Compare against a presented token without early exit.
    pub fn matches(&self, presented: &str) -> bool {
        let expected = self.0.as_bytes();
        let presented = presented.as_bytes();
        if expected.len() != presented.len() {
            return false;
        }
        expected
            .iter()
            .zip(presented)
            .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    /// Token text for persistence and links.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for VerificationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerificationToken(<redacted>)")
    }
}
