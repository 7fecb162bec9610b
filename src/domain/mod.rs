//! Domain layer - Core business entities and logic
//!
//! Contains the user account, the cooling configuration record and the
//! value objects guarding passwords and password-reset tokens.

pub mod cooling;
pub mod password;
pub mod reset_token;
pub mod thermal;
pub mod user;

pub use cooling::{Cooling, CoolingData, CoolingDraft, CoolingRecord, CoolingResponse, JsonBlobs};
pub use password::Password;
pub use reset_token::{PasswordResetToken, ResetTokenGenerator};
pub use thermal::{demo_model, solve, ThermalModel, ThermalSolution};
pub use user::{normalize_email, NewUser, User, UserDraft, UserResponse};
