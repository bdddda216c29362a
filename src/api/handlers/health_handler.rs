//! Banner and health check handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub services: ServiceHealth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceHealth {
    pub database: ServiceStatus,
}

/// Service health with optional error message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatus {
    #[schema(example = "healthy")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Root endpoint
pub async fn root() -> &'static str {
    "Share Registry API"
}

/// Health check endpoint - verifies database connectivity.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "All dependencies reachable", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Response {
    let database = match state.storage.ping().await {
        Ok(()) => ServiceStatus {
            status: "healthy".into(),
            error: None,
        },
        Err(e) => ServiceStatus {
            status: "unhealthy".into(),
            error: Some(e.to_string()),
        },
    };

    let healthy = database.error.is_none();
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.into(),
        services: ServiceHealth { database },
    };

    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(response)).into_response()
}
