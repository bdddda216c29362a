//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::User;
use crate::errors::AppError;

/// The active user behind the request's bearer token.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl std::ops::Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// JWT authentication middleware.
///
/// Validates the bearer token, loads the user and rejects inactive
/// accounts, then injects `CurrentUser` into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let user = state.auth_service.authenticate(token).await?;

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Like `auth_middleware`, but anonymous requests pass through and a bad
/// token is simply ignored.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match state.auth_service.authenticate(token).await {
            Ok(user) => {
                request.extensions_mut().insert(CurrentUser(user));
            }
            Err(e) => tracing::debug!(error = %e, "ignoring unusable bearer token"),
        }
    }
    next.run(request).await
}
