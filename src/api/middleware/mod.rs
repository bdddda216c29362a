//! API middleware.

mod auth;
mod database;

pub use auth::{auth_middleware, optional_auth_middleware, CurrentUser};
pub use database::require_storage;
