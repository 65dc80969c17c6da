//! Authentication domain models.

use serde::{Deserialize, Serialize};

/// Public user identity. This is the only user shape that crosses the API
/// boundary; it never carries password material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// Full user row as persisted. The password hash stays inside the core;
/// there is no plaintext password field anywhere on this type.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

impl UserRecord {
    /// The public identity of this record.
    pub fn identity(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Which lifecycle a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token proving identity for ordinary requests.
    Access,
    /// Longer-lived token used only to mint new access tokens.
    Refresh,
}

/// JWT claims embedded in every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — the username (standard JWT `sub` claim).
    pub sub: String,
    /// Access or refresh.
    pub kind: TokenKind,
    /// True only when the token was minted directly from a password check.
    pub fresh: bool,
    /// Double-submit CSRF value; echoed back in the `X-CSRF-TOKEN` header.
    pub csrf: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}
