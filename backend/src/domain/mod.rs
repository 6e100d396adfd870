//! Domain primitives, aggregates, ports and services.
//!
//! Purpose: define strongly typed account entities used by the HTTP and
//! persistence adapters, together with the use-case services that operate on
//! them. Nothing in this module depends on Actix or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User and its value objects (EmailAddress, Nickname, ProfileUrl, ...).
//! - Auth primitives (LoginCredentials, Password, PasswordHash,
//!   VerificationToken).
//! - UserService: implementation of the account driving ports.

pub mod auth;
pub mod error;
pub mod nickname;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;
pub mod verification_email;

pub use self::auth::{
    CredentialValidationError, LoginCredentials, PASSWORD_MAX, PASSWORD_MIN, Password,
    PasswordHash, PasswordHashError, VerificationToken,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::nickname::generate_nickname;
pub use self::trace_id::TraceId;
pub use self::user::{
    Bio, EmailAddress, NewUser, Nickname, PersonName, ProfileUrl, User, UserId, UserParts,
    UserProfile, UserRole, UserUpdate, UserValidationError,
};
pub use self::user_service::{
    ACCOUNT_LOCKED_MESSAGE, AccountPolicy, INVALID_TOKEN_MESSAGE, LOGIN_FAILED_MESSAGE,
    UserService,
};
pub use self::verification_email::{OutboundEmail, verification_email, verification_link};
