//! API server configuration.

use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::warn;

/// Access token lifetime default: 1 day.
const DEFAULT_ACCESS_TTL_SECS: i64 = 24 * 60 * 60;

/// Refresh token lifetime default: 30 days.
const DEFAULT_REFRESH_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3400").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Token signing secret.
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub access_ttl_secs: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_ttl_secs: i64,
    /// Path prefix the auth routes are mounted under.
    pub base_path: String,
    /// Cookie path for the access token and its CSRF companion.
    pub access_cookie_path: String,
    /// Cookie path for the refresh token; defaults to the refresh endpoint
    /// so the browser only sends it there.
    pub refresh_cookie_path: String,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                 | Default                               |
    /// |--------------------------|---------------------------------------|
    /// | `BIND_ADDR`              | `127.0.0.1:3400`                      |
    /// | `DATABASE_URL`           | `postgres://localhost:5432/keygate`   |
    /// | `JWT_SECRET`             | generated (dev only, see below)       |
    /// | `ACCESS_TOKEN_TTL_SECS`  | `86400`                               |
    /// | `REFRESH_TOKEN_TTL_SECS` | `2592000`                             |
    /// | `AUTH_BASE_PATH`         | `/auth`                               |
    /// | `ACCESS_COOKIE_PATH`     | `/`                                   |
    /// | `REFRESH_COOKIE_PATH`    | `{AUTH_BASE_PATH}/refresh`            |
    pub fn from_env() -> Self {
        let base_path =
            std::env::var("AUTH_BASE_PATH").unwrap_or_else(|_| "/auth".into());
        let refresh_cookie_path = std::env::var("REFRESH_COOKIE_PATH")
            .unwrap_or_else(|_| format!("{base_path}/refresh"));
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3400".into()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/keygate".into()),
            jwt_secret: resolve_jwt_secret(),
            access_ttl_secs: env_i64("ACCESS_TOKEN_TTL_SECS", DEFAULT_ACCESS_TTL_SECS),
            refresh_ttl_secs: env_i64("REFRESH_TOKEN_TTL_SECS", DEFAULT_REFRESH_TTL_SECS),
            base_path,
            access_cookie_path: std::env::var("ACCESS_COOKIE_PATH")
                .unwrap_or_else(|_| "/".into()),
            refresh_cookie_path,
        }
    }
}

fn env_i64(name: &str, default: i64) -> i64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Resolve the token signing secret from `JWT_SECRET`.
///
/// Without one, a random secret is generated for this process; every token
/// becomes invalid on restart, so this path is only suitable for development.
pub fn resolve_jwt_secret() -> String {
    if let Ok(secret) = std::env::var("JWT_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    warn!("JWT_SECRET not set; generating an ephemeral secret");
    rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}
