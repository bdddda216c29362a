//! Share Registry - client share-holding records with a review workflow
//!
//! Staff keep client profiles with embedded holdings, review each holding,
//! and provision a login for every client on creation.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Entities, value objects and access rules
//! - **services**: Use cases (auth, provisioning, profiles, users)
//! - **infra**: Database, shareholder file and mail transport
//! - **jobs**: Fire-and-forget e-mail delivery
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **utils**: E-mail templates
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Bootstrap an admin
//! cargo run -- create-admin --email admin@example.com --password changeme
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{ClientProfile, Password, User, UserRole};
pub use errors::{AppError, AppResult};
