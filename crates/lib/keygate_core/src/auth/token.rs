//! Signed-token codec.
//!
//! Encodes identity claims into compact HS256 JWTs and decodes them back,
//! distinguishing expiry from structural/signature failures. Every issued
//! token carries a random CSRF companion value as a claim; the transport
//! layer delivers that value in a script-readable cookie and the guard
//! compares it against the `X-CSRF-TOKEN` request header.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};

use super::AuthError;
use crate::models::auth::{TokenClaims, TokenKind};

/// Length of the random CSRF companion value.
const CSRF_TOKEN_LEN: usize = 32;

/// A freshly minted token together with its CSRF companion value.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The signed, encoded token.
    pub token: String,
    /// The CSRF value embedded in the token's claims.
    pub csrf: String,
}

/// Generate a random CSRF companion value (32 alphanumeric chars).
fn generate_csrf_value() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(CSRF_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Mint a signed token for `identity` with absolute expiry `now + ttl_secs`.
///
/// `fresh` must be true only when the caller has just verified a password;
/// the refresh flow always mints with `fresh = false`.
pub fn issue_token(
    identity: &str,
    kind: TokenKind,
    fresh: bool,
    ttl_secs: i64,
    secret: &[u8],
) -> Result<IssuedToken, AuthError> {
    let now = Utc::now();
    let csrf = generate_csrf_value();
    let claims = TokenClaims {
        sub: identity.to_string(),
        kind,
        fresh,
        csrf: csrf.clone(),
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        iat: now.timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))?;
    Ok(IssuedToken { token, csrf })
}

/// Verify signature and expiry, returning the claims on success.
///
/// Fails with `TokenExpired` when the token is past its deadline but
/// otherwise intact, and `TokenMalformed` for any structural or signature
/// problem. Expiry is checked with zero leeway.
pub fn decode_token(token: &str, secret: &[u8]) -> Result<TokenClaims, AuthError> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.leeway = 0;
    match decode::<TokenClaims>(token, &key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(e) => match e.kind() {
            ErrorKind::ExpiredSignature => Err(AuthError::TokenExpired),
            _ => Err(AuthError::TokenMalformed),
        },
    }
}
