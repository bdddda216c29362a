//! User management handlers.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{UpdateUser, UserResponse};
use crate::errors::AppResult;
use crate::types::MessageResponse;

/// Admin-initiated password reset
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminResetPasswordRequest {
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/reset-password", post(reset_user_password))
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users, newest first", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_users(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list_users(&current).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get user by ID (own account or admin)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Can only view own account unless admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(&current, id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update user (own account or admin; role, activation and assignments admin only)
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.update_user(&current, id, payload).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Set a user's password (admin only)
#[utoipa::path(
    post,
    path = "/users/{id}/reset-password",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = AdminResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn reset_user_password(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AdminResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .user_service
        .reset_user_password(&current, id, &payload.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password reset successfully")))
}

/// Delete user (admin only)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.user_service.delete_user(&current, id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
