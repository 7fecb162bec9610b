//! Repository layer - Data access abstraction
//!
//! One repository per aggregate. Services only see the traits; the
//! SeaORM-backed stores live next to them.

pub(crate) mod entities;
mod cooling_repository;
mod token_blacklist_repository;
mod user_repository;

pub use cooling_repository::{CoolingRepository, CoolingStore};
pub use token_blacklist_repository::{TokenBlacklistRepository, TokenBlacklistStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use cooling_repository::MockCoolingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use token_blacklist_repository::MockTokenBlacklistRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
