//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ErrorResponse;
use keygate_core::auth::AuthError;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already taken")]
    DuplicateUsername,

    #[error("Missing token")]
    TokenMissing,

    #[error("Token expired")]
    TokenExpired,

    #[error("Malformed token")]
    TokenMalformed,

    #[error("Fresh token required")]
    NotFresh,

    #[error("CSRF token mismatch")]
    CsrfMismatch,

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                "invalid_credentials",
                "Invalid credentials",
            ),
            AppError::DuplicateUsername => (
                StatusCode::BAD_REQUEST,
                "duplicate_username",
                "Username already taken",
            ),
            AppError::TokenMissing => (StatusCode::UNAUTHORIZED, "token_missing", "Missing token"),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "token_expired", "Token expired"),
            AppError::TokenMalformed => {
                (StatusCode::UNAUTHORIZED, "token_malformed", "Malformed token")
            }
            AppError::NotFresh => (
                StatusCode::UNAUTHORIZED,
                "fresh_token_required",
                "Fresh token required",
            ),
            AppError::CsrfMismatch => (
                StatusCode::UNAUTHORIZED,
                "csrf_mismatch",
                "CSRF token mismatch",
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error",
            ),
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => AppError::InvalidCredentials,
            AuthError::DuplicateUsername => AppError::DuplicateUsername,
            AuthError::Validation(msg) => AppError::Validation(msg),
            AuthError::TokenExpired => AppError::TokenExpired,
            AuthError::TokenMalformed => AppError::TokenMalformed,
            AuthError::TokenMissing => AppError::TokenMissing,
            AuthError::NotFresh => AppError::NotFresh,
            AuthError::CsrfMismatch => AppError::CsrfMismatch,
            AuthError::Db(e) => AppError::Internal(e.to_string()),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}
