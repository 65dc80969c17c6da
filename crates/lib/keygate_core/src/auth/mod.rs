//! Authentication logic.
//!
//! Provides password hashing, the signed-token codec, credential
//! validation, and the credential store shared by the API layer.

pub mod password;
pub mod store;
pub mod token;
pub mod validate;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. Deliberately one variant for
    /// both so callers cannot tell which it was.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already taken")]
    DuplicateUsername,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Malformed token")]
    TokenMalformed,

    #[error("Missing token")]
    TokenMissing,

    #[error("Fresh token required")]
    NotFresh,

    #[error("CSRF token mismatch")]
    CsrfMismatch,

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
