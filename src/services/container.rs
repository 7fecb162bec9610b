//! Service Container - Centralized service access.
//!
//! Wires the services over one Unit of Work so handlers and CLI commands
//! share the same construction path.

use std::sync::Arc;

use super::{
    AccountManager, AccountService, Authenticator, AuthService, CoolingManager, CoolingService,
};
use crate::config::Config;
use crate::infra::Persistence;
use crate::jobs::EmailQueue;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn accounts(&self) -> Arc<dyn AccountService>;

    fn coolings(&self) -> Arc<dyn CoolingService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    account_service: Arc<dyn AccountService>,
    cooling_service: Arc<dyn CoolingService>,
}

impl Services {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        account_service: Arc<dyn AccountService>,
        cooling_service: Arc<dyn CoolingService>,
    ) -> Self {
        Self {
            auth_service,
            account_service,
            cooling_service,
        }
    }

    /// Build every service over a SeaORM connection.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        emails: Arc<dyn EmailQueue>,
        config: Config,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), &config)),
            account_service: Arc::new(AccountManager::new(uow.clone(), emails, config)),
            cooling_service: Arc::new(CoolingManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn accounts(&self) -> Arc<dyn AccountService> {
        self.account_service.clone()
    }

    fn coolings(&self) -> Arc<dyn CoolingService> {
        self.cooling_service.clone()
    }
}
