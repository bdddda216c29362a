//! Storage availability gate for data routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::errors::AppError;

/// Answer 503 before touching a handler when the database is unreachable.
pub async fn require_storage(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    state.storage.ping().await?;
    Ok(next.run(request).await)
}
