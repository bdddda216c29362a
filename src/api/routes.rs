//! Application route configuration.

use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::health_handler::{health, root};
use super::handlers::{
    auth_routes, client_profile_routes, dmat_routes, shareholder_routes, user_routes,
};
use super::middleware::{auth_middleware, require_storage};
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let auth = || middleware::from_fn_with_state(state.clone(), auth_middleware);
    let storage = || middleware::from_fn_with_state(state.clone(), require_storage);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Login, registration and password recovery
        .nest("/auth", auth_routes(state.clone()))
        .nest("/users", user_routes().route_layer(auth()))
        // Database-backed resources answer 503 while storage is down. The
        // storage check is the outer layer: authentication reads the database.
        .nest(
            "/client-profiles",
            client_profile_routes()
                .route_layer(auth())
                .route_layer(storage()),
        )
        .nest(
            "/dmat-accounts",
            dmat_routes().route_layer(auth()).route_layer(storage()),
        )
        // File-backed, so no storage check
        .nest("/shareholders", shareholder_routes().route_layer(auth()))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
