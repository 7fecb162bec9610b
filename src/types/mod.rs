//! Shared response and pagination types.

mod pagination;
mod response;

pub use pagination::{CoolingPage, Paginated, PaginationMeta, PaginationParams};
pub use response::{Created, NoContent, ResetContent};
