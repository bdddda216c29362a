//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::infra::StorageProbe;
use crate::services::{
    AuthService, DmatService, ProfileService, ServiceContainer, ShareholderService, UserService,
};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub profile_service: Arc<dyn ProfileService>,
    pub dmat_service: Arc<dyn DmatService>,
    pub shareholder_service: Arc<dyn ShareholderService>,
    /// Reachability of the database, checked before data routes
    pub storage: Arc<dyn StorageProbe>,
}

impl AppState {
    /// Take every service from a container.
    pub fn from_services(services: &dyn ServiceContainer, storage: Arc<dyn StorageProbe>) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            profile_service: services.profiles(),
            dmat_service: services.dmat_accounts(),
            shareholder_service: services.shareholders(),
            storage,
        }
    }
}
