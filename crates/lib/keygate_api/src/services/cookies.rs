//! Cookie service — set/get/clear the auth cookies.
//!
//! Token cookies are HttpOnly; the CSRF companions are script-readable so a
//! client can copy them into the `X-CSRF-TOKEN` header. Cookie paths are
//! configuration (`ApiConfig`), not a fixed contract.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Cookie name for the access token.
pub const ACCESS_COOKIE: &str = "access_token_cookie";
/// Cookie name for the refresh token.
pub const REFRESH_COOKIE: &str = "refresh_token_cookie";
/// Cookie name for the access token's CSRF companion.
pub const CSRF_ACCESS_COOKIE: &str = "csrf_access_token";
/// Cookie name for the refresh token's CSRF companion.
pub const CSRF_REFRESH_COOKIE: &str = "csrf_refresh_token";

/// Request header the CSRF companion value must be echoed in.
pub const CSRF_HEADER: &str = "x-csrf-token";

fn token_cookie(name: &str, value: &str, path: &str, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((name.to_string(), value.to_string()))
        .http_only(true)
        .secure(false) // TODO: set true once served over TLS
        .same_site(SameSite::Lax)
        .path(path.to_string())
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

fn csrf_cookie(name: &str, value: &str, path: &str, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((name.to_string(), value.to_string()))
        .http_only(false)
        .secure(false)
        .same_site(SameSite::Lax)
        .path(path.to_string())
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

/// Build the HttpOnly cookie carrying the access token.
pub fn access_cookie(token: &str, path: &str, max_age_secs: i64) -> Cookie<'static> {
    token_cookie(ACCESS_COOKIE, token, path, max_age_secs)
}

/// Build the HttpOnly cookie carrying the refresh token.
pub fn refresh_cookie(token: &str, path: &str, max_age_secs: i64) -> Cookie<'static> {
    token_cookie(REFRESH_COOKIE, token, path, max_age_secs)
}

/// Build the readable CSRF companion for the access token.
pub fn csrf_access_cookie(value: &str, max_age_secs: i64) -> Cookie<'static> {
    csrf_cookie(CSRF_ACCESS_COOKIE, value, "/", max_age_secs)
}

/// Build the readable CSRF companion for the refresh token.
pub fn csrf_refresh_cookie(value: &str, max_age_secs: i64) -> Cookie<'static> {
    csrf_cookie(CSRF_REFRESH_COOKIE, value, "/", max_age_secs)
}

fn expired(name: &str, path: &str, http_only: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), String::new()))
        .http_only(http_only)
        .secure(false)
        .same_site(SameSite::Lax)
        .path(path.to_string())
        .max_age(Duration::ZERO)
        .build()
}

/// Build expired replacements for all four auth cookies.
pub fn clear_all(access_path: &str, refresh_path: &str) -> [Cookie<'static>; 4] {
    [
        expired(ACCESS_COOKIE, access_path, true),
        expired(REFRESH_COOKIE, refresh_path, true),
        expired(CSRF_ACCESS_COOKIE, "/", false),
        expired(CSRF_REFRESH_COOKIE, "/", false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_cookies_are_http_only() {
        let c = access_cookie("tok", "/", 60);
        assert_eq!(c.http_only(), Some(true));
        assert_eq!(c.path(), Some("/"));
    }

    #[test]
    fn csrf_cookies_are_readable() {
        let c = csrf_access_cookie("value", 60);
        assert_eq!(c.http_only(), Some(false));
    }

    #[test]
    fn refresh_cookie_keeps_its_path() {
        let c = refresh_cookie("tok", "/auth/refresh", 60);
        assert_eq!(c.path(), Some("/auth/refresh"));
    }

    #[test]
    fn clear_all_expires_every_cookie() {
        for c in clear_all("/", "/auth/refresh") {
            assert_eq!(c.max_age(), Some(Duration::ZERO));
            assert_eq!(c.value(), "");
        }
    }
}
