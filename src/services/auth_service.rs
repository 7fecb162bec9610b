//! Authentication service - JWT issuance, refresh, verification and revocation.
//!
//! Access tokens carry the user's profile claims; refresh tokens carry only
//! the user id and can be revoked through the blacklist.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, DUMMY_PASSWORD_HASH};
use crate::domain::{normalize_email, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims shared by both token types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub token_type: TokenType,
    pub exp: i64,
    pub iat: i64,
    pub jti: Uuid,
    pub user_id: Uuid,
}

impl TokenClaims {
    fn new(token_type: TokenType, user_id: Uuid, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            token_type,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4(),
            user_id,
        }
    }

    pub fn expires_at(&self) -> AppResult<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0).ok_or(AppError::InvalidToken)
    }
}

/// Access token payload: the shared claims plus the user's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(flatten)]
    pub base: TokenClaims,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Full name
    pub name: String,
    pub is_superuser: bool,
    pub is_staff: bool,
}

/// Returned by `POST /auth/jwt/create`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access: String,
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub refresh: String,
}

/// Returned by `POST /auth/jwt/refresh`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessToken {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and issue an access/refresh pair
    async fn obtain_pair(&self, email: &str, password: &str) -> AppResult<TokenPair>;

    /// Mint a new access token from a live refresh token
    async fn refresh(&self, refresh_token: &str) -> AppResult<AccessToken>;

    /// Accept any well-signed, unexpired, non-revoked token
    async fn verify(&self, token: &str) -> AppResult<()>;

    /// Revoke a refresh token
    async fn blacklist(&self, refresh_token: &str) -> AppResult<()>;

    /// Decode a bearer credential; only access tokens qualify
    fn verify_access(&self, token: &str) -> AppResult<AccessClaims>;
}

/// HS256 signing and verification with the configured lifetimes.
#[derive(Clone)]
pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtCodec {
    pub fn new(config: &Config) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret_bytes()),
            validation: Validation::new(Algorithm::HS256),
            access_ttl: Duration::minutes(config.access_token_minutes),
            refresh_ttl: Duration::hours(config.refresh_token_hours),
        }
    }

    pub fn access_claims(&self, user: &User, now: DateTime<Utc>) -> AccessClaims {
        AccessClaims {
            base: TokenClaims::new(TokenType::Access, user.id, now, self.access_ttl),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            name: user.full_name(),
            is_superuser: user.is_superuser,
            is_staff: user.is_staff,
        }
    }

    pub fn refresh_claims(&self, user: &User, now: DateTime<Utc>) -> TokenClaims {
        TokenClaims::new(TokenType::Refresh, user.id, now, self.refresh_ttl)
    }

    pub fn encode<T: Serialize>(&self, claims: &T) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))
    }

    /// Decode and validate signature and expiry.
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> AppResult<T> {
        decode::<T>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected token");
                AppError::InvalidToken
            })
    }

    fn decode_refresh(&self, token: &str) -> AppResult<TokenClaims> {
        let claims: TokenClaims = self.decode(token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(AppError::InvalidToken);
        }
        Ok(claims)
    }
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    codec: JwtCodec,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: &Config) -> Self {
        Self {
            uow,
            codec: JwtCodec::new(config),
        }
    }

    async fn ensure_not_blacklisted(&self, claims: &TokenClaims) -> AppResult<()> {
        if self.uow.blacklist().contains(claims.jti).await? {
            return Err(AppError::InvalidToken);
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn obtain_pair(&self, email: &str, password: &str) -> AppResult<TokenPair> {
        let email = normalize_email(email);
        let user = self.uow.users().find_by_email(&email).await?;

        // Verify against a dummy hash when the account is missing so both
        // paths cost one Argon2 verification.
        let stored = Password::from_hash(
            user.as_ref()
                .map(|u| u.password_hash.clone())
                .unwrap_or_else(|| DUMMY_PASSWORD_HASH.to_string()),
        );
        let password_valid = stored.verify(password);

        let user = match user {
            Some(user) if password_valid && user.is_active => user,
            _ => return Err(AppError::InvalidCredentials),
        };

        let now = Utc::now();
        let access = self.codec.encode(&self.codec.access_claims(&user, now))?;
        let refresh = self.codec.encode(&self.codec.refresh_claims(&user, now))?;

        self.uow.users().record_login(user.id, now).await?;
        tracing::info!(user_id = %user.id, "Issued token pair");

        Ok(TokenPair { access, refresh })
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<AccessToken> {
        let claims = self.codec.decode_refresh(refresh_token)?;
        self.ensure_not_blacklisted(&claims).await?;

        let user = self
            .uow
            .users()
            .find_by_id(claims.user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AppError::InvalidToken)?;

        let access = self.codec.encode(&self.codec.access_claims(&user, Utc::now()))?;
        Ok(AccessToken { access })
    }

    async fn verify(&self, token: &str) -> AppResult<()> {
        let claims: TokenClaims = self.codec.decode(token)?;
        if claims.token_type == TokenType::Refresh {
            self.ensure_not_blacklisted(&claims).await?;
        }
        Ok(())
    }

    async fn blacklist(&self, refresh_token: &str) -> AppResult<()> {
        let claims = self.codec.decode_refresh(refresh_token)?;
        self.uow
            .blacklist()
            .add(claims.jti, claims.user_id, claims.expires_at()?)
            .await?;

        tracing::info!(user_id = %claims.user_id, jti = %claims.jti, "Refresh token blacklisted");
        Ok(())
    }

    fn verify_access(&self, token: &str) -> AppResult<AccessClaims> {
        let claims: AccessClaims = self.codec.decode(token)?;
        if claims.base.token_type != TokenType::Access {
            return Err(AppError::InvalidToken);
        }
        Ok(claims)
    }
}
