//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_ACCESS_TOKEN_MINUTES, DEFAULT_DATABASE_URL, DEFAULT_FRONTEND_DOMAIN,
    DEFAULT_FRONTEND_PROTOCOL, DEFAULT_PASSWORD_RESET_CONFIRM_URL,
    DEFAULT_PASSWORD_RESET_TIMEOUT_SECONDS, DEFAULT_REDIS_URL, DEFAULT_REFRESH_TOKEN_HOURS,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SITE_NAME, MIN_JWT_SECRET_LENGTH,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    jwt_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_hours: i64,
    pub password_reset_timeout_seconds: i64,
    /// Frontend path template, `{uid}` and `{token}` are substituted
    pub password_reset_confirm_url: String,
    pub frontend_domain: String,
    pub frontend_protocol: String,
    pub site_name: String,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_minutes", &self.access_token_minutes)
            .field("refresh_token_hours", &self.refresh_token_hours)
            .field(
                "password_reset_timeout_seconds",
                &self.password_reset_timeout_seconds,
            )
            .field("password_reset_confirm_url", &self.password_reset_confirm_url)
            .field("frontend_domain", &self.frontend_domain)
            .field("frontend_protocol", &self.frontend_protocol)
            .field("site_name", &self.site_name)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            jwt_secret,
            access_token_minutes: parse_env("JWT_ACCESS_TTL_MINUTES")
                .unwrap_or(DEFAULT_ACCESS_TOKEN_MINUTES),
            refresh_token_hours: parse_env("JWT_REFRESH_TTL_HOURS")
                .unwrap_or(DEFAULT_REFRESH_TOKEN_HOURS),
            password_reset_timeout_seconds: parse_env("PASSWORD_RESET_TIMEOUT_SECONDS")
                .unwrap_or(DEFAULT_PASSWORD_RESET_TIMEOUT_SECONDS),
            password_reset_confirm_url: env::var("PASSWORD_RESET_CONFIRM_URL")
                .unwrap_or_else(|_| DEFAULT_PASSWORD_RESET_CONFIRM_URL.to_string()),
            frontend_domain: env::var("FRONTEND_DOMAIN")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_DOMAIN.to_string()),
            frontend_protocol: env::var("FRONTEND_PROTOCOL")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_PROTOCOL.to_string()),
            site_name: env::var("SITE_NAME").unwrap_or_else(|_| DEFAULT_SITE_NAME.to_string()),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_env("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
        }
    }

    /// Configuration with defaults and a fixed secret, for tests.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_tests() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            jwt_secret: "test-secret-key-for-testing-only-32chars".to_string(),
            access_token_minutes: DEFAULT_ACCESS_TOKEN_MINUTES,
            refresh_token_hours: DEFAULT_REFRESH_TOKEN_HOURS,
            password_reset_timeout_seconds: DEFAULT_PASSWORD_RESET_TIMEOUT_SECONDS,
            password_reset_confirm_url: DEFAULT_PASSWORD_RESET_CONFIRM_URL.to_string(),
            frontend_domain: DEFAULT_FRONTEND_DOMAIN.to_string(),
            frontend_protocol: DEFAULT_FRONTEND_PROTOCOL.to_string(),
            site_name: DEFAULT_SITE_NAME.to_string(),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Same configuration signed with another secret, for tests.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn with_jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = secret.into();
        self
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
