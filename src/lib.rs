//! Cooling API - simulation-configuration records behind JWT auth.
//!
//! Stores "cooling" configurations (arrays of opaque JSON blobs describing
//! thermal components, losses, faces, passages and fluids) for
//! authenticated users, with registration, token and password-reset flows.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core entities, password policy, reset tokens
//! - **services**: Application use cases
//! - **infra**: Database, repositories, Redis cache
//! - **jobs**: Background email jobs
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Create an administrator
//! cargo run -- users create-superuser --email admin@example.com --password '...'
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Cooling, Password, User};
pub use errors::{AppError, AppResult};
pub use infra::{Cache, CacheStore};
