//! Authentication request handlers.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::CookieJar;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CredentialsRequest, MessageResponse, RefreshResponse, ValidateResponse};
use crate::services::{auth, cookies};
use keygate_core::models::auth::User;

/// `GET {base}/home` — smoke endpoint.
pub async fn home_handler() -> &'static str {
    "This is a home"
}

/// `POST {base}/register` — create a new user account.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> AppResult<Json<MessageResponse>> {
    auth::register(state.store.as_ref(), &body.username, &body.password).await?;
    Ok(Json(MessageResponse {
        message: "User created".to_string(),
    }))
}

/// `POST {base}/login` — verify credentials and start a session.
///
/// Sets the access and refresh token cookies plus their CSRF companions;
/// the body is the user's public identity.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<CredentialsRequest>,
) -> AppResult<(CookieJar, Json<User>)> {
    let user = auth::authenticate(state.store.as_ref(), &body.username, &body.password).await?;

    let access = auth::issue_access(&user.username, true, &state.config)?;
    let refresh = auth::issue_refresh(&user.username, &state.config)?;

    let config = &state.config;
    let jar = jar
        .add(cookies::access_cookie(
            &access.token,
            &config.access_cookie_path,
            config.access_ttl_secs,
        ))
        .add(cookies::csrf_access_cookie(
            &access.csrf,
            config.access_ttl_secs,
        ))
        .add(cookies::refresh_cookie(
            &refresh.token,
            &config.refresh_cookie_path,
            config.refresh_ttl_secs,
        ))
        .add(cookies::csrf_refresh_cookie(
            &refresh.csrf,
            config.refresh_ttl_secs,
        ));

    Ok((jar, Json(user)))
}

/// `POST {base}/fresh_login` — re-assert identity with a password.
///
/// Issues only a fresh access token (no refresh token), for unlocking
/// sensitive actions without resetting the whole session.
pub async fn fresh_login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<CredentialsRequest>,
) -> AppResult<(CookieJar, Json<User>)> {
    let user = auth::authenticate(state.store.as_ref(), &body.username, &body.password).await?;

    let access = auth::issue_access(&user.username, true, &state.config)?;

    let config = &state.config;
    let jar = jar
        .add(cookies::access_cookie(
            &access.token,
            &config.access_cookie_path,
            config.access_ttl_secs,
        ))
        .add(cookies::csrf_access_cookie(
            &access.csrf,
            config.access_ttl_secs,
        ));

    Ok((jar, Json(user)))
}

/// `POST {base}/refresh` — mint a new access token from a refresh token.
///
/// The guard has already verified the refresh cookie and its CSRF header.
/// The new access token is never fresh.
pub async fn refresh_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<RefreshResponse>)> {
    let access = auth::issue_access(&user.0.sub, false, &state.config)?;

    let config = &state.config;
    let jar = jar
        .add(cookies::access_cookie(
            &access.token,
            &config.access_cookie_path,
            config.access_ttl_secs,
        ))
        .add(cookies::csrf_access_cookie(
            &access.csrf,
            config.access_ttl_secs,
        ));

    Ok((jar, Json(RefreshResponse { refreshed: true })))
}

/// `GET|POST {base}/validate_token` — report whether the access token is
/// valid. The guard does the work; reaching the handler means yes.
pub async fn validate_token_handler(
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> Json<ValidateResponse> {
    Json(ValidateResponse {
        is_valid: true,
        user: user.0.sub,
    })
}

/// `GET|POST {base}/validate_fresh_token` — like `validate_token`, but the
/// guard additionally rejects non-fresh tokens.
pub async fn validate_fresh_token_handler(
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> Json<ValidateResponse> {
    Json(ValidateResponse {
        is_valid: true,
        user: user.0.sub,
    })
}

/// `POST {base}/logout` — clear all auth cookies. Never fails; tokens are
/// self-contained, so logout only removes the client-held copies.
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let config = &state.config;
    let mut jar = jar;
    for cookie in cookies::clear_all(&config.access_cookie_path, &config.refresh_cookie_path) {
        jar = jar.add(cookie);
    }
    (
        jar,
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}
