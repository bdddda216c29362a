//! Background work spawned from request handlers.

pub mod email_job;

pub use email_job::dispatch as dispatch_email;
