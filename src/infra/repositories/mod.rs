//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod dmat_repository;
pub(crate) mod entities;
mod profile_repository;
mod user_repository;

pub use dmat_repository::{DmatRepository, DmatStore};
pub use profile_repository::{ProfileFilter, ProfileRepository, ProfileStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use dmat_repository::MockDmatRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use profile_repository::MockProfileRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
