//! Shared request and response types.

pub mod lenient;
mod pagination;
mod response;

pub use pagination::{Paginated, PaginatedDmatAccounts, PaginatedProfiles, PaginationParams};
pub use response::{MessageResponse, SuccessResponse};
