//! Service container: builds every service over one Unit of Work.

use std::sync::Arc;

use super::{
    AccountProvisioner, AuthService, Authenticator, DmatManager, DmatService, ProfileManager,
    ProfileService, Provisioner, ShareholderManager, ShareholderService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::{EmailSender, Persistence, ShareholderRepository, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn profiles(&self) -> Arc<dyn ProfileService>;

    fn dmat_accounts(&self) -> Arc<dyn DmatService>;

    fn shareholders(&self) -> Arc<dyn ShareholderService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    profile_service: Arc<dyn ProfileService>,
    dmat_service: Arc<dyn DmatService>,
    shareholder_service: Arc<dyn ShareholderService>,
}

impl Services {
    /// Wire every service over the given storage and mailer.
    pub fn new<U: UnitOfWork + 'static>(
        uow: Arc<U>,
        shareholders: Arc<dyn ShareholderRepository>,
        mailer: Arc<dyn EmailSender>,
        config: Config,
    ) -> Self {
        let provisioner: Arc<dyn AccountProvisioner> = Arc::new(Provisioner::new(uow.clone()));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config, mailer.clone())),
            user_service: Arc::new(UserManager::new(uow.clone())),
            profile_service: Arc::new(ProfileManager::new(uow.clone(), provisioner, mailer)),
            dmat_service: Arc::new(DmatManager::new(uow)),
            shareholder_service: Arc::new(ShareholderManager::new(shareholders)),
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        shareholders: Arc<dyn ShareholderRepository>,
        mailer: Arc<dyn EmailSender>,
        config: Config,
    ) -> Self {
        Self::new(Arc::new(Persistence::new(db)), shareholders, mailer, config)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileService> {
        self.profile_service.clone()
    }

    fn dmat_accounts(&self) -> Arc<dyn DmatService> {
        self.dmat_service.clone()
    }

    fn shareholders(&self) -> Arc<dyn ShareholderService> {
        self.shareholder_service.clone()
    }
}
