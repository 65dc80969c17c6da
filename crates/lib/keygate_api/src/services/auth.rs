//! Authentication service — the request-level auth flows.
//!
//! Each operation is a pure function of the request payload, the persisted
//! user rows and the server secret; no state is shared between calls.

use tracing::info;

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};
use keygate_core::auth::store::CredentialStore;
use keygate_core::auth::token::{IssuedToken, issue_token};
use keygate_core::auth::{password, validate};
use keygate_core::models::auth::{TokenKind, User};

/// Register a new account. The duplicate pre-check is a fast path for a
/// better error; the store's uniqueness constraint remains the guard under
/// concurrent registration.
pub async fn register(
    store: &dyn CredentialStore,
    username: &str,
    password_plain: &str,
) -> AppResult<()> {
    validate::validate_credentials(username, password_plain)?;

    if store.find_by_username(username).await?.is_some() {
        return Err(AppError::DuplicateUsername);
    }

    let hash = password::hash_password(password_plain)?;
    store.create(username, &hash).await?;
    info!(username, "user registered");
    Ok(())
}

/// Verify a credential pair against the store. Unknown usernames and wrong
/// passwords produce the same error.
pub async fn authenticate(
    store: &dyn CredentialStore,
    username: &str,
    password_plain: &str,
) -> AppResult<User> {
    if username.is_empty() || password_plain.is_empty() {
        return Err(AppError::Validation("Missing credentials".into()));
    }

    let record = store
        .find_by_username(username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !password::verify_password(password_plain, &record.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    info!(username, "credentials verified");
    Ok(record.identity())
}

/// Mint an access token. `fresh` is true only when the caller has just run
/// a password check in this request cycle.
pub fn issue_access(username: &str, fresh: bool, config: &ApiConfig) -> AppResult<IssuedToken> {
    issue_token(
        username,
        TokenKind::Access,
        fresh,
        config.access_ttl_secs,
        config.jwt_secret.as_bytes(),
    )
    .map_err(AppError::from)
}

/// Mint a refresh token. Refresh tokens are never fresh.
pub fn issue_refresh(username: &str, config: &ApiConfig) -> AppResult<IssuedToken> {
    issue_token(
        username,
        TokenKind::Refresh,
        false,
        config.refresh_ttl_secs,
        config.jwt_secret.as_bytes(),
    )
    .map_err(AppError::from)
}

/// List all users, ordered by id.
pub async fn list_users(store: &dyn CredentialStore) -> AppResult<Vec<User>> {
    store.list().await.map_err(AppError::from)
}
