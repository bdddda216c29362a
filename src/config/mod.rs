//! Configuration: environment settings plus named defaults.

mod constants;
mod settings;

pub use constants::*;
pub use settings::{Config, SmtpSettings};
