//! User domain entity and related types.
//!
//! Accounts are identified by email; there is no separate username.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Password;
use crate::errors::{AppError, AppResult};

/// User domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// First and last name separated by a space, trimmed
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Wrap the stored hash for verification
    pub fn password(&self) -> Password {
        Password::from_hash(self.password_hash.clone())
    }

    /// Staff members may see every account
    pub fn can_view(&self, other: Uuid) -> bool {
        self.is_staff || self.id == other
    }
}

/// Lower-case the domain part of an email and trim whitespace.
///
/// The local part is kept as typed, mailboxes may be case sensitive.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Account creation input, before hashing.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Validated account ready to be persisted.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl NewUser {
    /// Regular account, staff and superuser default to false.
    pub fn into_regular(self) -> AppResult<UserDraft> {
        let is_staff = self.is_staff.unwrap_or(false);
        let is_superuser = self.is_superuser.unwrap_or(false);
        self.into_draft(is_staff, is_superuser)
    }

    /// Superuser account, both flags forced to true.
    pub fn into_superuser(self) -> AppResult<UserDraft> {
        if self.is_staff == Some(false) {
            return Err(AppError::validation("Superuser must have is_staff=True."));
        }
        if self.is_superuser == Some(false) {
            return Err(AppError::validation("Superuser must have is_superuser=True."));
        }
        self.into_draft(true, true)
    }

    fn into_draft(self, is_staff: bool, is_superuser: bool) -> AppResult<UserDraft> {
        if self.email.trim().is_empty() {
            return Err(AppError::validation("The given email must be set"));
        }
        let email = normalize_email(&self.email);
        let password_hash = Password::for_user(&self.password, &email)?.into_string();

        Ok(UserDraft {
            email,
            password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            is_staff,
            is_superuser,
        })
    }
}

/// Public user view (registration response, nested cooling owner)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// User email address
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "Thermal-Flow-42".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_email_lowercases_domain_only() {
        assert_eq!(normalize_email("  Ada@EXAMPLE.Com "), "Ada@example.com");
        assert_eq!(normalize_email("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn test_regular_user_defaults() {
        let draft = new_user("ada@example.com").into_regular().unwrap();
        assert!(!draft.is_staff);
        assert!(!draft.is_superuser);
        assert_ne!(draft.password_hash, "Thermal-Flow-42");
    }

    #[test]
    fn test_superuser_forces_flags() {
        let draft = new_user("root@example.com").into_superuser().unwrap();
        assert!(draft.is_staff);
        assert!(draft.is_superuser);
    }

    #[test]
    fn test_superuser_rejects_explicit_false() {
        let mut input = new_user("root@example.com");
        input.is_staff = Some(false);
        assert!(matches!(input.into_superuser(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_missing_email_rejected() {
        assert!(new_user("   ").into_regular().is_err());
    }

    #[test]
    fn test_full_name_trims_missing_parts() {
        let draft = new_user("ada@example.com").into_regular().unwrap();
        let user = User {
            id: Uuid::new_v4(),
            email: draft.email,
            password_hash: draft.password_hash,
            first_name: "Ada".to_string(),
            last_name: String::new(),
            is_staff: false,
            is_superuser: false,
            is_active: true,
            date_joined: Utc::now(),
            last_login: None,
        };
        assert_eq!(user.full_name(), "Ada");
        assert!(user.can_view(user.id));
        assert!(!user.can_view(Uuid::new_v4()));
    }
}
