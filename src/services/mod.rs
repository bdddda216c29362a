//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on repository traits reached through
//! the Unit of Work.

mod auth_service;
pub mod container;
pub mod credentials;
mod dmat_service;
mod profile_service;
pub mod provisioner;
mod shareholder_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, LoginResponse, Registration};
pub use credentials::Claims;
pub use dmat_service::{DmatManager, DmatService};
pub use profile_service::{ProfileManager, ProfileService};
pub use provisioner::{AccountProvisioner, Provisioned, Provisioner};
pub use shareholder_service::{ShareholderManager, ShareholderService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
