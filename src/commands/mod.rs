//! One module per CLI subcommand.

pub mod create_admin;
pub mod migrate;
pub mod serve;
