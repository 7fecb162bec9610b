//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{CacheStore, Database};
use crate::jobs::EmailQueue;
use crate::services::{AccountService, AuthService, CoolingService, ServiceContainer, Services};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub account_service: Arc<dyn AccountService>,
    pub cooling_service: Arc<dyn CoolingService>,
    /// Redis cache (rate limits, profile cache)
    pub cache: Arc<dyn CacheStore>,
    pub database: Arc<Database>,
}

impl AppState {
    /// Build every service over the database connection.
    pub fn from_config(
        database: Arc<Database>,
        cache: Arc<dyn CacheStore>,
        emails: Arc<dyn EmailQueue>,
        config: Config,
    ) -> Self {
        let container = Services::from_connection(database.get_connection(), emails, config);
        Self::from_container(&container, cache, database)
    }

    /// Take the services out of any container (real or mock).
    pub fn from_container(
        container: &dyn ServiceContainer,
        cache: Arc<dyn CacheStore>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service: container.auth(),
            account_service: container.accounts(),
            cooling_service: container.coolings(),
            cache,
            database,
        }
    }
}
