//! Account API handlers.
//!
//! ```text
//! POST /register {"email":"john.doe@example.com","password":"Secure*1234"}
//! POST /login {"email":"john.doe@example.com","password":"Secure*1234"}
//! GET /users?skip=0&limit=10
//! ```

pub mod dto;

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::PageRequest;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, LoginCredentials, User, UserId, UserRole, UserUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, pagination_error, parse_user_id};

pub use dto::{
    CreateUserRequest, ListUsersQuery, LoginRequest, LoginResponse, RegisterRequest,
    ResetPasswordRequest, UpdateUserRequest, UserListResponse, UserResponse,
};

const USER_ID: FieldName = FieldName::new("userId");

/// Confirmation body for actions without a resource payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Resolve the signed-in account, treating a vanished account as signed out.
async fn signed_in_user(session: &SessionContext, state: &HttpState) -> Result<User, Error> {
    let id = session.require_user_id()?;
    match state.users.get_user(&id).await {
        Ok(user) => Ok(user),
        Err(err) if err.code() == ErrorCode::NotFound => {
            session.purge();
            Err(Error::unauthorized("login required"))
        }
        Err(err) => Err(err),
    }
}

/// Require a signed-in `ADMIN` or `MANAGER`.
async fn require_staff(session: &SessionContext, state: &HttpState) -> Result<User, Error> {
    let user = signed_in_user(session, state).await?;
    if user.role().can_manage_users() {
        Ok(user)
    } else {
        Err(Error::forbidden("administrator or manager role required"))
    }
}

/// Refuse role assignments above the caller's own authority.
fn ensure_may_grant(caller: &User, role: Option<UserRole>) -> Result<(), Error> {
    match role {
        Some(role) if !caller.role().may_grant(role) => Err(Error::forbidden(format!(
            "{} role cannot grant {role}",
            caller.role()
        ))),
        _ => Ok(()),
    }
}

fn target_id(path: web::Path<String>) -> Result<UserId, Error> {
    parse_user_id(&path.into_inner(), USER_ID)
}

/// Self-register a new account.
///
/// The first account ever registered becomes a verified administrator; later
/// accounts must confirm their email address before logging in.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request or duplicate email/nickname", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let account = payload.into_inner().try_into()?;
    let user = state.accounts.register(account).await?;
    Ok(HttpResponse::Created().json(UserResponse::from_user(&user, &state)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request or locked account", body = Error),
        (status = 401, description = "Incorrect email or password", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let user = state.login.authenticate(&credentials).await?;
    session.persist_user(user.id())?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        user_id: user.id().to_string(),
        role: user.role(),
    }))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Confirm an email address using the emailed token.
#[utoipa::path(
    get,
    path = "/verify-email/{user_id}/{token}",
    params(
        ("user_id" = String, Path, description = "Account id from the verification link"),
        ("token" = String, Path, description = "Verification token")
    ),
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Invalid or expired verification token", body = Error)
    ),
    tags = ["users"],
    operation_id = "verifyEmail",
    security([])
)]
#[get("/verify-email/{user_id}/{token}")]
pub async fn verify_email(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (raw_id, token) = path.into_inner();
    let invalid = || Error::invalid_request(crate::domain::INVALID_TOKEN_MESSAGE);
    let id = UserId::new(&raw_id).map_err(|_| invalid())?;
    state.accounts.verify_email(&id, &token).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Email verified successfully",
    }))
}

/// Return the signed-in account.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let user = signed_in_user(&session, &state).await?;
    Ok(web::Json(UserResponse::from_user(&user, &state)))
}

/// Create an account on behalf of someone else.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request or duplicate email/nickname", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let caller = require_staff(&session, &state).await?;
    let (account, role) = payload.into_inner().into_parts()?;
    ensure_may_grant(&caller, role)?;
    let user = state.accounts.create(account, role).await?;
    Ok(HttpResponse::Created().json(UserResponse::from_user(&user, &state)))
}

/// List accounts a page at a time.
#[utoipa::path(
    get,
    path = "/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Accounts", body = UserListResponse),
        (status = 400, description = "Invalid pagination parameters", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListUsersQuery>,
) -> ApiResult<web::Json<UserListResponse>> {
    require_staff(&session, &state).await?;
    let ListUsersQuery { skip, limit } = query.into_inner();
    let request = PageRequest::new(skip, limit).map_err(|err| pagination_error(&err))?;
    let page = state.users.list_users(request).await?;
    Ok(web::Json(UserListResponse::from_page(page, &state)))
}

/// Fetch one account.
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(("user_id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account", body = UserResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    require_staff(&session, &state).await?;
    let id = target_id(path)?;
    let user = state.users.get_user(&id).await?;
    Ok(web::Json(UserResponse::from_user(&user, &state)))
}

/// Change profile fields, email, nickname, or role.
#[utoipa::path(
    put,
    path = "/users/{user_id}",
    params(("user_id" = String, Path, description = "Account id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated account", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{user_id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let caller = require_staff(&session, &state).await?;
    let id = target_id(path)?;
    let update = UserUpdate::try_from(payload.into_inner())?;
    ensure_may_grant(&caller, update.role)?;
    let user = state.accounts.update(&id, update).await?;
    Ok(web::Json(UserResponse::from_user(&user, &state)))
}

/// Remove an account.
#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    params(("user_id" = String, Path, description = "Account id")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{user_id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    require_staff(&session, &state).await?;
    let id = target_id(path)?;
    state.accounts.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Clear a login lockout.
#[utoipa::path(
    post,
    path = "/users/{user_id}/unlock",
    params(("user_id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account unlocked", body = UserResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found or not locked", body = Error)
    ),
    tags = ["users"],
    operation_id = "unlockUser"
)]
#[post("/users/{user_id}/unlock")]
pub async fn unlock_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    require_staff(&session, &state).await?;
    let id = target_id(path)?;
    let user = state.accounts.unlock(&id).await?;
    Ok(web::Json(UserResponse::from_user(&user, &state)))
}

/// Replace an account's password.
#[utoipa::path(
    post,
    path = "/users/{user_id}/reset-password",
    params(("user_id" = String, Path, description = "Account id")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 204, description = "Password replaced"),
        (status = 400, description = "Password does not meet the policy", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "resetPassword"
)]
#[post("/users/{user_id}/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ResetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    require_staff(&session, &state).await?;
    let id = target_id(path)?;
    let password = payload.into_inner().into_password()?;
    state.accounts.reset_password(&id, password).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register every account handler on a service config.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(logout)
        .service(verify_email)
        .service(current_user)
        .service(create_user)
        .service(list_users)
        .service(get_user)
        .service(update_user)
        .service(delete_user)
        .service(unlock_user)
        .service(reset_password);
}
