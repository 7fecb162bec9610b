//! Unit of Work: one entry point to every repository.
//!
//! Services are generic over the unit of work and pick the repositories
//! they need, so tests can swap in mocks per aggregate.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{
    CoolingRepository, CoolingStore, TokenBlacklistRepository, TokenBlacklistStore,
    UserRepository, UserStore,
};

pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn coolings(&self) -> Arc<dyn CoolingRepository>;

    fn blacklist(&self) -> Arc<dyn TokenBlacklistRepository>;
}

/// SeaORM-backed UnitOfWork sharing one connection pool
pub struct Persistence {
    user_repo: Arc<UserStore>,
    cooling_repo: Arc<CoolingStore>,
    blacklist_repo: Arc<TokenBlacklistStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            cooling_repo: Arc::new(CoolingStore::new(db.clone())),
            blacklist_repo: Arc::new(TokenBlacklistStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn coolings(&self) -> Arc<dyn CoolingRepository> {
        self.cooling_repo.clone()
    }

    fn blacklist(&self) -> Arc<dyn TokenBlacklistRepository> {
        self.blacklist_repo.clone()
    }
}
