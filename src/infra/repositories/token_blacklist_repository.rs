//! Revoked refresh token repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::blacklisted_token::{self, ActiveModel, Entity as BlacklistedTokenEntity};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TokenBlacklistRepository: Send + Sync {
    /// Record a refresh token as revoked; revoking twice is a no-op
    async fn add(&self, jti: Uuid, user_id: Uuid, expires_at: DateTime<Utc>) -> AppResult<()>;

    async fn contains(&self, jti: Uuid) -> AppResult<bool>;

    /// Drop rows whose token would have expired anyway, returning how many
    async fn flush_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// Concrete implementation of TokenBlacklistRepository
pub struct TokenBlacklistStore {
    db: DatabaseConnection,
}

impl TokenBlacklistStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TokenBlacklistRepository for TokenBlacklistStore {
    async fn add(&self, jti: Uuid, user_id: Uuid, expires_at: DateTime<Utc>) -> AppResult<()> {
        let row = ActiveModel {
            jti: Set(jti),
            user_id: Set(user_id),
            expires_at: Set(expires_at),
            blacklisted_at: Set(Utc::now()),
        };

        BlacklistedTokenEntity::insert(row)
            .on_conflict(
                OnConflict::column(blacklisted_token::Column::Jti)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }

    async fn contains(&self, jti: Uuid) -> AppResult<bool> {
        let row = BlacklistedTokenEntity::find_by_id(jti).one(&self.db).await?;
        Ok(row.is_some())
    }

    async fn flush_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = BlacklistedTokenEntity::delete_many()
            .filter(blacklisted_token::Column::ExpiresAt.lt(now))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
