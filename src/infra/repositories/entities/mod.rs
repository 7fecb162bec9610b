//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod blacklisted_token;
pub mod cooling;
pub mod user;

#[allow(unused_imports)]
pub use blacklisted_token::{Entity as BlacklistedTokenEntity, Model as BlacklistedTokenModel};
#[allow(unused_imports)]
pub use cooling::{ActiveModel as CoolingActiveModel, Entity as CoolingEntity, Model as CoolingModel};
#[allow(unused_imports)]
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};
