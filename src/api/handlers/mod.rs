//! HTTP request handlers.

pub mod auth_handler;
pub mod client_profile_handler;
pub mod dmat_handler;
pub mod health_handler;
pub mod shareholder_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use client_profile_handler::client_profile_routes;
pub use dmat_handler::dmat_routes;
pub use shareholder_handler::shareholder_routes;
pub use user_handler::user_routes;
