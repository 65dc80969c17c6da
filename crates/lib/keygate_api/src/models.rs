//! Wire models for the HTTP surface.
//!
//! Request/response bodies only; domain models live in `keygate_core`.

use keygate_core::models::auth::User;
use serde::{Deserialize, Serialize};

/// Registration and login payload.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Generic confirmation body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body returned by the refresh endpoint.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub refreshed: bool,
}

/// Body returned by the token validation endpoints.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub is_valid: bool,
    /// The token's identity (username).
    pub user: String,
}

/// Body returned by the user listing endpoint.
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
}

/// Error body shape shared by all failure responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
