//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every account and health endpoint together with the
//! request, response, and error schemas. Swagger UI serves it in debug builds
//! and `cargo run --bin openapi-dump` prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, UserRole};
use crate::inbound::http::health::ProbeStatus;
use crate::inbound::http::users::dto::ProfileFields;
use crate::inbound::http::users::{
    CreateUserRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    ResetPasswordRequest, UpdateUserRequest, UserListResponse, UserResponse,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Event Manager API",
        description = "User registration, authentication, and account administration."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::verify_email,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::unlock_user,
        crate::inbound::http::users::reset_password,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserRole,
        ProfileFields,
        RegisterRequest,
        CreateUserRequest,
        UpdateUserRequest,
        LoginRequest,
        LoginResponse,
        ResetPasswordRequest,
        UserResponse,
        UserListResponse,
        MessageResponse,
        ProbeStatus,
    )),
    tags(
        (name = "users", description = "Registration, login, and account administration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
