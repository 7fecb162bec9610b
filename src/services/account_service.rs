//! Account service - registration, profile, password management and reset.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{Config, INVALID_RESET_TOKEN_MESSAGE};
use crate::domain::{
    normalize_email, NewUser, Password, PasswordResetToken, ResetTokenGenerator, User,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::jobs::{EmailQueue, PasswordResetEmail};

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Self-service sign up; never grants staff or superuser
    async fn register(&self, input: NewUser) -> AppResult<User>;

    /// Manager-style creation honoring the staff/superuser flags given
    async fn create_user(&self, input: NewUser) -> AppResult<User>;

    async fn create_superuser(&self, input: NewUser) -> AppResult<User>;

    /// Staff see every account, everyone else only their own
    async fn list_visible(&self, viewer_id: Uuid) -> AppResult<Vec<User>>;

    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Look up an account on behalf of `viewer_id` (staff or self)
    async fn get_visible(&self, viewer_id: Uuid, id: Uuid) -> AppResult<User>;

    async fn update_profile(
        &self,
        id: Uuid,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> AppResult<User>;

    /// Delete the account after re-checking the password
    async fn delete_account(&self, id: Uuid, current_password: &str) -> AppResult<()>;

    async fn set_password(
        &self,
        id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()>;

    /// Queue a reset email if the address belongs to an active account.
    /// Succeeds either way.
    async fn request_password_reset(&self, email: &str) -> AppResult<()>;

    async fn confirm_password_reset(&self, token: &str, new_password: &str) -> AppResult<()>;
}

/// Concrete implementation of AccountService using Unit of Work.
pub struct AccountManager<U: UnitOfWork> {
    uow: Arc<U>,
    emails: Arc<dyn EmailQueue>,
    reset_tokens: ResetTokenGenerator,
    config: Config,
}

impl<U: UnitOfWork> AccountManager<U> {
    pub fn new(uow: Arc<U>, emails: Arc<dyn EmailQueue>, config: Config) -> Self {
        let reset_tokens = ResetTokenGenerator::new(
            config.jwt_secret_bytes(),
            config.password_reset_timeout_seconds,
        );
        Self {
            uow,
            emails,
            reset_tokens,
            config,
        }
    }

    async fn require_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    fn reset_email(&self, user: &User, token: String) -> PasswordResetEmail {
        let uid = token
            .split_once('.')
            .map(|(uid, _)| uid.to_string())
            .unwrap_or_default();

        PasswordResetEmail::new(
            user.email.clone(),
            uid,
            token,
            &self.config.password_reset_confirm_url,
            self.config.site_name.clone(),
            self.config.frontend_protocol.clone(),
            self.config.frontend_domain.clone(),
        )
    }
}

fn invalid_reset_token() -> AppError {
    AppError::validation(INVALID_RESET_TOKEN_MESSAGE)
}

#[async_trait]
impl<U: UnitOfWork> AccountService for AccountManager<U> {
    async fn register(&self, input: NewUser) -> AppResult<User> {
        let draft = NewUser {
            is_staff: None,
            is_superuser: None,
            ..input
        }
        .into_regular()?;

        if self.uow.users().find_by_email(&draft.email).await?.is_some() {
            return Err(AppError::conflict("User with this email"));
        }

        let user = self.uow.users().create(draft).await?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn create_user(&self, input: NewUser) -> AppResult<User> {
        let draft = input.into_regular()?;
        if self.uow.users().find_by_email(&draft.email).await?.is_some() {
            return Err(AppError::conflict("User with this email"));
        }
        self.uow.users().create(draft).await
    }

    async fn create_superuser(&self, input: NewUser) -> AppResult<User> {
        let draft = input.into_superuser()?;
        if self.uow.users().find_by_email(&draft.email).await?.is_some() {
            return Err(AppError::conflict("User with this email"));
        }
        self.uow.users().create(draft).await
    }

    async fn list_visible(&self, viewer_id: Uuid) -> AppResult<Vec<User>> {
        let viewer = self
            .uow
            .users()
            .find_by_id(viewer_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if viewer.is_staff {
            self.uow.users().list().await
        } else {
            Ok(vec![viewer])
        }
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.require_user(id).await
    }

    async fn get_visible(&self, viewer_id: Uuid, id: Uuid) -> AppResult<User> {
        let viewer = self
            .uow
            .users()
            .find_by_id(viewer_id)
            .await?
            .ok_or(AppError::Unauthorized)?;
        let user = self.require_user(id).await?;

        if !viewer.can_view(user.id) {
            return Err(AppError::Forbidden);
        }
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> AppResult<User> {
        self.uow
            .users()
            .update_profile(id, first_name, last_name)
            .await
    }

    async fn delete_account(&self, id: Uuid, current_password: &str) -> AppResult<()> {
        let user = self.require_user(id).await?;
        if !user.password().verify(current_password) {
            return Err(AppError::validation("Invalid password."));
        }

        self.uow.users().delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn set_password(
        &self,
        id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self.require_user(id).await?;
        if !user.password().verify(current_password) {
            return Err(AppError::validation("Invalid password."));
        }

        let hash = Password::for_user(new_password, &user.email)?.into_string();
        self.uow.users().set_password_hash(id, hash).await?;
        tracing::info!(user_id = %id, "Password changed");
        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        let email = normalize_email(email);
        let user = match self.uow.users().find_by_email(&email).await? {
            Some(user) if user.is_active => user,
            _ => {
                tracing::debug!("Password reset requested for unknown or inactive account");
                return Ok(());
            }
        };

        let token = self.reset_tokens.make_token(&user, Utc::now());
        let job = self.reset_email(&user, token).into_job();

        // A queue failure must not tell the caller the account exists
        if let Err(e) = self.emails.enqueue(job).await {
            tracing::error!(user_id = %user.id, error = %e, "Failed to queue password reset email");
        }
        Ok(())
    }

    async fn confirm_password_reset(&self, token: &str, new_password: &str) -> AppResult<()> {
        let parsed = PasswordResetToken::parse(token).ok_or_else(invalid_reset_token)?;
        let user = self
            .uow
            .users()
            .find_by_id(parsed.uid)
            .await?
            .ok_or_else(invalid_reset_token)?;

        if !self
            .reset_tokens
            .check_token(&user, &parsed.signed, Utc::now())
        {
            return Err(invalid_reset_token());
        }

        let hash = Password::for_user(new_password, &user.email)?.into_string();
        self.uow.users().set_password_hash(user.id, hash).await?;
        tracing::info!(user_id = %user.id, "Password reset completed");
        Ok(())
    }
}
