//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion and reach repositories through the Unit of Work.

mod account_service;
mod auth_service;
mod cooling_service;
pub mod container;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use account_service::{AccountManager, AccountService};
pub use auth_service::{
    AccessClaims, AccessToken, AuthService, Authenticator, JwtCodec, TokenClaims, TokenPair,
    TokenType,
};
pub use cooling_service::{CoolingInput, CoolingManager, CoolingScope, CoolingService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
