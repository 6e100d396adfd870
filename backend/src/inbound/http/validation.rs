//! Shared validation helpers for inbound HTTP adapters.
//!
//! Converts domain constructor failures and malformed payloads into
//! `invalid_request` errors whose details name the offending field.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::HttpRequest;
use pagination::PageRequestError;
use serde_json::json;

use crate::domain::{CredentialValidationError, Error, UserId, UserValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidEmail,
    InvalidNickname,
    InvalidUrl,
    TooLong,
    InvalidRole,
    InvalidPassword,
    EmptyUpdate,
    InvalidPagination,
    MalformedBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidNickname => "invalid_nickname",
            ErrorCode::InvalidUrl => "invalid_url",
            ErrorCode::TooLong => "too_long",
            ErrorCode::InvalidRole => "invalid_role",
            ErrorCode::InvalidPassword => "invalid_password",
            ErrorCode::EmptyUpdate => "empty_update",
            ErrorCode::InvalidPagination => "invalid_pagination",
            ErrorCode::MalformedBody => "malformed_body",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }
}

fn user_error_code(error: &UserValidationError) -> ErrorCode {
    match error {
        UserValidationError::EmptyId | UserValidationError::InvalidId => ErrorCode::InvalidUuid,
        UserValidationError::NicknameTooShort { .. }
        | UserValidationError::NicknameTooLong { .. }
        | UserValidationError::NicknameInvalidCharacters => ErrorCode::InvalidNickname,
        UserValidationError::InvalidEmail { .. } | UserValidationError::EmailTooLong { .. } => {
            ErrorCode::InvalidEmail
        }
        UserValidationError::InvalidUrl | UserValidationError::UnsupportedUrlScheme { .. } => {
            ErrorCode::InvalidUrl
        }
        UserValidationError::NameTooLong { .. } | UserValidationError::BioTooLong { .. } => {
            ErrorCode::TooLong
        }
        UserValidationError::UnknownRole => ErrorCode::InvalidRole,
        UserValidationError::EmptyUpdate => ErrorCode::EmptyUpdate,
    }
}

/// Map a user field constructor failure onto a 400 error for `field`.
pub(crate) fn user_field_error(field: FieldName, error: &UserValidationError) -> Error {
    ValidationError::new(field.as_str(), error.to_string()).with_code(user_error_code(error))
}

/// Map a password or credential failure onto a 400 error for `field`.
pub(crate) fn credential_error(field: FieldName, error: &CredentialValidationError) -> Error {
    match error {
        CredentialValidationError::InvalidEmail(inner) => {
            user_field_error(FieldName::new("email"), inner)
        }
        other => ValidationError::new(field.as_str(), other.to_string())
            .with_code(ErrorCode::InvalidPassword),
    }
}

/// Parse a path segment as a user id.
pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value).map_err(|err| user_field_error(field, &err))
}

/// Map an out-of-range page request onto a 400 error.
pub(crate) fn pagination_error(error: &PageRequestError) -> Error {
    ValidationError::new("limit", error.to_string()).with_code(ErrorCode::InvalidPagination)
}

/// Reject malformed JSON bodies with the standard error envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ValidationError::new("body", format!("malformed request body: {err}"))
        .with_code(ErrorCode::MalformedBody)
        .into()
}

/// Reject malformed query strings with the standard error envelope.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ValidationError::new("query", format!("invalid pagination parameters: {err}"))
        .with_code(ErrorCode::InvalidPagination)
        .into()
}
