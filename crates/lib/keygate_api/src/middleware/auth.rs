//! Authentication guards — cookie-borne token extraction and verification.
//!
//! Each guarded route declares what it needs via an `AuthRequirement`; the
//! guard runs before the handler body, decodes the cookie-borne token,
//! checks kind, freshness and the CSRF header, and injects the verified
//! claims into request extensions.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::AppState;
use crate::error::AppError;
use crate::services::cookies::{ACCESS_COOKIE, CSRF_HEADER, REFRESH_COOKIE};
use keygate_core::auth::token::decode_token;
use keygate_core::models::auth::{TokenClaims, TokenKind};

/// What a guarded route requires of the request's token. Routes with no
/// requirement simply do not attach a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRequirement {
    /// A valid access token of any freshness.
    AccessToken,
    /// A valid access token minted directly from a password check.
    AccessTokenFresh,
    /// A valid refresh token.
    RefreshToken,
}

impl AuthRequirement {
    fn cookie_name(self) -> &'static str {
        match self {
            AuthRequirement::RefreshToken => REFRESH_COOKIE,
            _ => ACCESS_COOKIE,
        }
    }

    fn token_kind(self) -> TokenKind {
        match self {
            AuthRequirement::RefreshToken => TokenKind::Refresh,
            _ => TokenKind::Access,
        }
    }
}

/// Verified claims stored in request extensions for the handler.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub TokenClaims);

/// Guard requiring a valid access token.
pub async fn require_access(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    guard(&state, &jar, AuthRequirement::AccessToken, request, next).await
}

/// Guard requiring a valid, fresh access token.
pub async fn require_fresh_access(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    guard(&state, &jar, AuthRequirement::AccessTokenFresh, request, next).await
}

/// Guard requiring a valid refresh token.
pub async fn require_refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    guard(&state, &jar, AuthRequirement::RefreshToken, request, next).await
}

async fn guard(
    state: &AppState,
    jar: &CookieJar,
    requirement: AuthRequirement,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(requirement.cookie_name())
        .map(|c| c.value().to_string())
        .ok_or(AppError::TokenMissing)?;

    let claims = decode_token(&token, state.config.jwt_secret.as_bytes())?;

    // A token of the wrong kind is no better than a forged one.
    if claims.kind != requirement.token_kind() {
        return Err(AppError::TokenMalformed);
    }

    if requirement == AuthRequirement::AccessTokenFresh && !claims.fresh {
        return Err(AppError::NotFresh);
    }

    let header = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok());
    if header != Some(claims.csrf.as_str()) {
        return Err(AppError::CsrfMismatch);
    }

    request.extensions_mut().insert(AuthenticatedUser(claims));

    Ok(next.run(request).await)
}
