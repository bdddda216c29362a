//! Command-line interface: `serve`, `migrate` and `create-admin`.

pub mod args;

pub use args::{Cli, Commands};
