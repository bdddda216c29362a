//! Infrastructure layer - External systems integration
//!
//! Database connection and repositories, the legacy shareholder file,
//! and outbound mail.

pub mod db;
pub mod mailer;
pub mod repositories;
pub mod shareholder_store;
pub mod unit_of_work;

pub use db::{Database, Migrator, StorageProbe};
pub use mailer::{mailer_from_settings, Email, EmailSender, LogMailer, SmtpMailer};
pub use repositories::{
    DmatRepository, DmatStore, ProfileFilter, ProfileRepository, ProfileStore, UserRepository,
    UserStore,
};
pub use shareholder_store::{JsonFileShareholders, ShareholderRepository};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockDmatRepository, MockProfileRepository, MockUserRepository};
