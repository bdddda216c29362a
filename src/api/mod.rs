//! HTTP surface: routers per resource, bearer-token middleware, the
//! storage check, JSON extractors and the OpenAPI document.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
