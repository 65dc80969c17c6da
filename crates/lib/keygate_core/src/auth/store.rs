//! Credential store.
//!
//! The store owns user rows; the rest of the core only reads them or asks
//! for creation. Uniqueness of usernames is enforced by the store itself —
//! any pre-check a caller performs is a fast path for a nicer error, not
//! the guard.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Mutex;

use super::AuthError;
use crate::models::auth::{User, UserRecord};

/// Persistence operations the auth flows need.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a user row by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AuthError>;

    /// Insert a new user. Fails with `DuplicateUsername` when the username
    /// is already taken, even under a concurrent racing insert.
    async fn create(&self, username: &str, password_hash: &str) -> Result<User, AuthError>;

    /// All users, ordered by id. Password hashes are not exposed.
    async fn list(&self) -> Result<Vec<User>, AuthError>;
}

/// PostgreSQL-backed store.
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AuthError> {
        let row = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(id, username, password_hash)| UserRecord {
            id,
            username,
            password_hash,
        }))
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<User, AuthError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::DuplicateUsername,
            _ => AuthError::Db(e),
        })?;
        Ok(User {
            id,
            username: username.to_string(),
        })
    }

    async fn list(&self) -> Result<Vec<User>, AuthError> {
        let rows = sqlx::query_as::<_, (i64, String)>("SELECT id, username FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, username)| User { id, username })
            .collect())
    }
}

/// In-memory store for tests and local development.
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: Mutex<Vec<UserRecord>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AuthError> {
        let users = self.users.lock().expect("store lock poisoned");
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<User, AuthError> {
        let mut users = self.users.lock().expect("store lock poisoned");
        if users.iter().any(|u| u.username == username) {
            return Err(AuthError::DuplicateUsername);
        }
        let id = users.last().map_or(1, |u| u.id + 1);
        users.push(UserRecord {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        });
        Ok(User {
            id,
            username: username.to_string(),
        })
    }

    async fn list(&self) -> Result<Vec<User>, AuthError> {
        let users = self.users.lock().expect("store lock poisoned");
        Ok(users.iter().map(|u| u.identity()).collect())
    }
}
