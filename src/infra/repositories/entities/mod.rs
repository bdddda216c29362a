//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod client_profile;
pub mod dmat_account;
pub mod user;
