//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when a migration changes the table shape.

diesel::table! {
    /// Registered accounts.
    ///
    /// `email` and `nickname` carry the `users_email_key` and
    /// `users_nickname_key` unique constraints. `version` counts writes and
    /// guards overwrites.
    users (id) {
        id -> Uuid,
        #[max_length = 254]
        email -> Varchar,
        #[max_length = 50]
        nickname -> Varchar,
        #[max_length = 100]
        first_name -> Nullable<Varchar>,
        #[max_length = 100]
        last_name -> Nullable<Varchar>,
        #[max_length = 500]
        bio -> Nullable<Varchar>,
        profile_picture_url -> Nullable<Text>,
        linkedin_profile_url -> Nullable<Text>,
        github_profile_url -> Nullable<Text>,
        #[max_length = 16]
        role -> Varchar,
        email_verified -> Bool,
        #[max_length = 128]
        verification_token -> Nullable<Varchar>,
        hashed_password -> Text,
        failed_login_attempts -> Int4,
        is_locked -> Bool,
        last_login_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        version -> Int8,
    }
}
