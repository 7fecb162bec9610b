//! Infrastructure layer - External systems integration
//!
//! Database connection and migrations, repositories, the Unit of Work
//! over them, and the Redis cache.

pub mod cache;
pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use cache::{Cache, CacheStore};
pub use db::{Database, Migrator};
pub use repositories::{
    CoolingRepository, CoolingStore, TokenBlacklistRepository, TokenBlacklistStore,
    UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockCacheStore;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockCoolingRepository, MockTokenBlacklistRepository, MockUserRepository};
