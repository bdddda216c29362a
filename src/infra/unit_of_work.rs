//! Unit of Work: one access point for every repository.
//!
//! Writes are per-document. Flows that touch several documents (profile
//! creation plus the user link) compensate on failure instead of opening
//! a transaction.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{
    DmatRepository, DmatStore, ProfileRepository, ProfileStore, UserRepository, UserStore,
};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn profiles(&self) -> Arc<dyn ProfileRepository>;

    fn dmat_accounts(&self) -> Arc<dyn DmatRepository>;
}

/// SeaORM-backed Unit of Work
pub struct Persistence {
    users: Arc<UserStore>,
    profiles: Arc<ProfileStore>,
    dmat_accounts: Arc<DmatStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            profiles: Arc::new(ProfileStore::new(db.clone())),
            dmat_accounts: Arc::new(DmatStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileRepository> {
        self.profiles.clone()
    }

    fn dmat_accounts(&self) -> Arc<dyn DmatRepository> {
        self.dmat_accounts.clone()
    }
}
