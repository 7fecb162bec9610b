//! Redis access: the fixed-window rate limiter and the profile cache.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::config::{
    Config, CACHE_PREFIX_RATE_LIMIT, CACHE_PREFIX_USER, DEFAULT_CACHE_TTL_SECONDS,
};
use crate::domain::UserResponse;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// What the HTTP layer needs from the cache.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn ping(&self) -> AppResult<()>;

    async fn get_user(&self, user_id: &Uuid) -> AppResult<Option<UserResponse>>;

    async fn set_user(&self, user: &UserResponse) -> AppResult<()>;

    /// Drop the cached profile after an update or delete.
    async fn invalidate_user(&self, user_id: &Uuid) -> AppResult<()>;

    /// Count one hit in the current window of `identifier`.
    ///
    /// Returns the hit count so far and whether it is within `max_requests`.
    /// The window starts with the first hit and lasts `window_seconds`.
    async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)>;
}

/// Shared Redis handle; clones reuse the managed connection.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
    ttl_seconds: u64,
}

impl Cache {
    pub async fn connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        Ok(Self {
            connection,
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        })
    }

    fn conn(&self) -> ConnectionManager {
        self.connection.clone()
    }

    /// JSON value stored under `key`, if any.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let raw: Option<String> = self.conn().get(key).await?;

        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(|e| AppError::internal(format!("Cached value for {} is unreadable: {}", key, e)))
    }

    /// Store `value` as JSON with the default TTL.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> AppResult<()> {
        self.set_with_ttl(key, value, self.ttl_seconds).await
    }

    pub async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::internal(format!("Cannot cache {}: {}", key, e)))?;

        let _: () = self.conn().set_ex(key, json, ttl_seconds).await?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> AppResult<()> {
        let _: () = self.conn().del(key).await?;
        Ok(())
    }
}

#[async_trait]
impl CacheStore for Cache {
    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.conn();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn get_user(&self, user_id: &Uuid) -> AppResult<Option<UserResponse>> {
        self.get(&user_key(user_id)).await
    }

    async fn set_user(&self, user: &UserResponse) -> AppResult<()> {
        self.set(&user_key(&user.id), user).await
    }

    async fn invalidate_user(&self, user_id: &Uuid) -> AppResult<()> {
        self.delete(&user_key(user_id)).await
    }

    async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let key = rate_limit_key(identifier);
        let mut conn = self.conn();

        let count: u64 = conn.incr(&key, 1u64).await?;
        if count == 1 {
            let _: () = conn.expire(&key, window_seconds as i64).await?;
        }

        Ok((count, count <= max_requests))
    }
}

fn user_key(user_id: &Uuid) -> String {
    format!("{}{}", CACHE_PREFIX_USER, user_id)
}

fn rate_limit_key(identifier: &str) -> String {
    format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_key() {
        assert_eq!(
            user_key(&Uuid::nil()),
            "user:00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_rate_limit_key_keeps_scope() {
        assert_eq!(rate_limit_key("auth:203.0.113.7"), "rate_limit:auth:203.0.113.7");
    }
}
