//! Authentication handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, optional_auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::{Credentials, UserResponse, UserRole};
use crate::errors::AppResult;
use crate::services::{LoginResponse, Registration};
use crate::types::MessageResponse;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name and email are required"))]
    #[schema(example = "Asha Rao")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "asha@example.com")]
    pub email: String,
    pub phone_number: Option<String>,
    /// Generated when omitted
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    /// Generated when omitted
    #[schema(example = "asharao")]
    pub username: Option<String>,
    /// `client` unless an admin registers staff
    #[schema(example = "client")]
    pub role: Option<String>,
}

/// Registration result with the one-time credentials
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    #[schema(example = "User registered successfully")]
    pub message: String,
    pub user: UserResponse,
    pub credentials: Credentials,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// E-mail address or username
    #[validate(length(min = 1, message = "Email/username and password are required"))]
    #[schema(example = "asha@example.com")]
    pub email_or_username: String,
    #[validate(length(min = 1, message = "Email/username and password are required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    #[schema(example = "asha@example.com")]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current and new passwords are required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// `{user}` wrapper returned by `/auth/me`
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentUserResponse {
    pub user: UserResponse,
}

/// Create authentication routes
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me))
        .route("/change-password", post(change_password))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let register = Router::new()
        .route("/register", post(register))
        .route_layer(middleware::from_fn_with_state(
            state,
            optional_auth_middleware,
        ));

    Router::new()
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password/:token", post(reset_password))
        .merge(register)
        .merge(protected)
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = RegisterResponse),
        (status = 400, description = "Validation error or duplicate e-mail/username"),
        (status = 403, description = "Staff roles can only be assigned by an admin")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    actor: Option<Extension<CurrentUser>>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let role = payload.role.as_deref().map(UserRole::parse).transpose()?;
    let registration = Registration {
        name: payload.name,
        email: payload.email,
        phone_number: payload.phone_number,
        username: payload.username,
        password: payload.password,
        role,
    };

    let actor = actor.as_ref().map(|Extension(current)| &current.0);
    let (user, credentials) = state.auth_service.register(registration, actor).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user: UserResponse::from(user),
            credentials,
        }),
    ))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state
        .auth_service
        .login(&payload.email_or_username, &payload.password)
        .await?;

    Ok(Json(response))
}

/// Request a password reset link
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    tag = "Authentication",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Same answer whether or not the address is known", body = MessageResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state.auth_service.forgot_password(&payload.email).await?;
    Ok(Json(MessageResponse::new(
        "If the email exists, a reset link will be sent",
    )))
}

/// Set a new password using a reset token
#[utoipa::path(
    post,
    path = "/auth/reset-password/{token}",
    tag = "Authentication",
    params(("token" = String, Path, description = "Raw reset token from the e-mail")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Invalid or expired reset token")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth_service
        .reset_password(&token, &payload.password)
        .await?;
    Ok(Json(MessageResponse::new("Password reset successfully")))
}

/// Get current authenticated user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponse),
        (status = 401, description = "Missing token or inactive user")
    )
)]
pub async fn me(Extension(current): Extension<CurrentUser>) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse {
        user: UserResponse::from(current.0),
    })
}

/// Change own password
#[utoipa::path(
    post,
    path = "/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Current password is incorrect")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth_service
        .change_password(current.id, &payload.current_password, &payload.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}
