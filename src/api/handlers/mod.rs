//! HTTP request handlers.

pub mod account_handler;
pub mod auth_handler;
pub mod cooling_handler;

pub use account_handler::{account_routes, public_account_routes};
pub use auth_handler::auth_routes;
pub use cooling_handler::{api_routes, cooling_routes};
