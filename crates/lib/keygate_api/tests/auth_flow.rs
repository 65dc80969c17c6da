//! Integration tests — build the router over the in-memory store and drive
//! the auth flows end to end through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use keygate_api::config::ApiConfig;
use keygate_api::{AppState, router};
use keygate_core::auth::store::MemoryCredentialStore;

const CSRF_HEADER: &str = "X-CSRF-TOKEN";

fn test_config() -> ApiConfig {
    ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        database_url: "unused-in-tests".into(),
        jwt_secret: "test-secret".into(),
        access_ttl_secs: 3600,
        refresh_ttl_secs: 7200,
        base_path: "/auth".into(),
        access_cookie_path: "/".into(),
        refresh_cookie_path: "/auth/refresh".into(),
    }
}

fn app() -> Router {
    router(AppState {
        store: Arc::new(MemoryCredentialStore::new()),
        config: test_config(),
    })
}

async fn post_json(app: &Router, path: &str, body: Value) -> Response<Body> {
    let req = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

async fn body_json(resp: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Pull a cookie's value out of a response's Set-Cookie headers.
fn cookie_value(resp: &Response<Body>, name: &str) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|s| {
            let first = s.split(';').next().unwrap_or(s);
            let (n, v) = first.split_once('=')?;
            (n == name).then(|| v.to_string())
        })
}

async fn register(app: &Router, username: &str, password: &str) -> Response<Body> {
    post_json(
        app,
        "/auth/register",
        json!({"username": username, "password": password}),
    )
    .await
}

async fn login(app: &Router, username: &str, password: &str) -> Response<Body> {
    post_json(
        app,
        "/auth/login",
        json!({"username": username, "password": password}),
    )
    .await
}

#[tokio::test]
async fn home_is_public() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth/home")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("This is a home"));
}

#[tokio::test]
async fn register_creates_user() {
    let app = app();
    let resp = register(&app, "test", "Password123@").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn register_rejects_weak_password() {
    let app = app();
    // No uppercase.
    let resp = register(&app, "test", "password3@").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_rejects_empty_username() {
    let app = app();
    let resp = register(&app, "", "Password123@").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_duplicate_username() {
    let app = app();
    assert_eq!(
        register(&app, "test", "Password123@").await.status(),
        StatusCode::OK
    );
    let resp = register(&app, "test", "Password123@").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "duplicate_username");
}

#[tokio::test]
async fn login_sets_all_four_cookies() {
    let app = app();
    register(&app, "test", "Password123@").await;
    let resp = login(&app, "test", "Password123@").await;
    assert_eq!(resp.status(), StatusCode::OK);

    for name in [
        "access_token_cookie",
        "csrf_access_token",
        "refresh_token_cookie",
        "csrf_refresh_token",
    ] {
        assert!(
            cookie_value(&resp, name).is_some(),
            "missing Set-Cookie for {name}"
        );
    }

    let body = body_json(resp).await;
    assert_eq!(body["username"], "test");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn wrong_password_and_unknown_user_are_indistinguishable() {
    let app = app();
    register(&app, "test", "Password123@").await;

    let wrong_pw = login(&app, "test", "Hunter456@x").await;
    let unknown = login(&app, "ghost", "Hunter456@x").await;

    assert_eq!(wrong_pw.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

    let a = body_json(wrong_pw).await;
    let b = body_json(unknown).await;
    assert_eq!(a, b);
    assert_eq!(a["error"], "invalid_credentials");
}

#[tokio::test]
async fn refresh_mints_new_access_token() {
    let app = app();
    register(&app, "test", "Password123@").await;
    let login_resp = login(&app, "test", "Password123@").await;

    let refresh_token = cookie_value(&login_resp, "refresh_token_cookie").unwrap();
    let csrf = cookie_value(&login_resp, "csrf_refresh_token").unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/auth/refresh")
        .header(
            header::COOKIE,
            format!("refresh_token_cookie={refresh_token}"),
        )
        .header(CSRF_HEADER, csrf)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    assert!(cookie_value(&resp, "access_token_cookie").is_some());
    assert!(cookie_value(&resp, "csrf_access_token").is_some());

    let body = body_json(resp).await;
    assert_eq!(body["refreshed"], true);
}

#[tokio::test]
async fn refresh_without_csrf_header_is_rejected() {
    let app = app();
    register(&app, "test", "Password123@").await;
    let login_resp = login(&app, "test", "Password123@").await;
    let refresh_token = cookie_value(&login_resp, "refresh_token_cookie").unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/auth/refresh")
        .header(
            header::COOKIE,
            format!("refresh_token_cookie={refresh_token}"),
        )
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_rejects_access_token_in_refresh_cookie() {
    let app = app();
    register(&app, "test", "Password123@").await;
    let login_resp = login(&app, "test", "Password123@").await;
    let access_token = cookie_value(&login_resp, "access_token_cookie").unwrap();
    let csrf = cookie_value(&login_resp, "csrf_access_token").unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/auth/refresh")
        .header(
            header::COOKIE,
            format!("refresh_token_cookie={access_token}"),
        )
        .header(CSRF_HEADER, csrf)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn validate_token_accepts_logged_in_user() {
    let app = app();
    register(&app, "test", "Password123@").await;
    let login_resp = login(&app, "test", "Password123@").await;
    let access = cookie_value(&login_resp, "access_token_cookie").unwrap();
    let csrf = cookie_value(&login_resp, "csrf_access_token").unwrap();

    let req = Request::builder()
        .uri("/auth/validate_token")
        .header(header::COOKIE, format!("access_token_cookie={access}"))
        .header(CSRF_HEADER, csrf)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["is_valid"], true);
    assert_eq!(body["user"], "test");
}

#[tokio::test]
async fn validate_token_without_cookie_is_unauthorized() {
    let app = app();
    let req = Request::builder()
        .uri("/auth/validate_token")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn validate_token_with_wrong_csrf_is_unauthorized() {
    let app = app();
    register(&app, "test", "Password123@").await;
    let login_resp = login(&app, "test", "Password123@").await;
    let access = cookie_value(&login_resp, "access_token_cookie").unwrap();

    let req = Request::builder()
        .uri("/auth/validate_token")
        .header(header::COOKIE, format!("access_token_cookie={access}"))
        .header(CSRF_HEADER, "not-the-right-value")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "csrf_mismatch");
}

#[tokio::test]
async fn fresh_login_token_passes_fresh_validation() {
    let app = app();
    register(&app, "test", "Password123@").await;
    let resp = post_json(
        &app,
        "/auth/fresh_login",
        json!({"username": "test", "password": "Password123@"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Fresh login issues only the access pair.
    assert!(cookie_value(&resp, "access_token_cookie").is_some());
    assert!(cookie_value(&resp, "csrf_access_token").is_some());
    assert!(cookie_value(&resp, "refresh_token_cookie").is_none());

    let access = cookie_value(&resp, "access_token_cookie").unwrap();
    let csrf = cookie_value(&resp, "csrf_access_token").unwrap();
    let req = Request::builder()
        .uri("/auth/validate_fresh_token")
        .header(header::COOKIE, format!("access_token_cookie={access}"))
        .header(CSRF_HEADER, csrf)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn refreshed_token_is_not_fresh() {
    let app = app();
    register(&app, "test", "Password123@").await;
    let login_resp = login(&app, "test", "Password123@").await;

    let refresh_token = cookie_value(&login_resp, "refresh_token_cookie").unwrap();
    let refresh_csrf = cookie_value(&login_resp, "csrf_refresh_token").unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/auth/refresh")
        .header(
            header::COOKIE,
            format!("refresh_token_cookie={refresh_token}"),
        )
        .header(CSRF_HEADER, refresh_csrf)
        .body(Body::empty())
        .unwrap();
    let refresh_resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(refresh_resp.status(), StatusCode::OK);

    let new_access = cookie_value(&refresh_resp, "access_token_cookie").unwrap();
    let new_csrf = cookie_value(&refresh_resp, "csrf_access_token").unwrap();

    // The refreshed token still validates as an ordinary access token...
    let req = Request::builder()
        .uri("/auth/validate_token")
        .header(header::COOKIE, format!("access_token_cookie={new_access}"))
        .header(CSRF_HEADER, new_csrf.clone())
        .body(Body::empty())
        .unwrap();
    assert_eq!(
        app.clone().oneshot(req).await.unwrap().status(),
        StatusCode::OK
    );

    // ...but fails the freshness gate.
    let req = Request::builder()
        .uri("/auth/validate_fresh_token")
        .header(header::COOKIE, format!("access_token_cookie={new_access}"))
        .header(CSRF_HEADER, new_csrf)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "fresh_token_required");
}

#[tokio::test]
async fn logout_clears_every_cookie() {
    let app = app();
    let resp = post_json(&app, "/auth/logout", json!({})).await;
    assert_eq!(resp.status(), StatusCode::OK);

    for name in [
        "access_token_cookie",
        "refresh_token_cookie",
        "csrf_access_token",
        "csrf_refresh_token",
    ] {
        let header_line = resp
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|s| s.starts_with(name))
            .unwrap_or_else(|| panic!("missing clearing Set-Cookie for {name}"));
        assert!(header_line.contains("Max-Age=0"), "{name} not expired");
    }
}

#[tokio::test]
async fn users_listing_requires_access_token() {
    let app = app();
    let req = Request::builder()
        .uri("/users")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn users_listing_is_ordered_and_password_free() {
    let app = app();
    register(&app, "alice", "Password123@").await;
    register(&app, "bob", "Password123@").await;
    let login_resp = login(&app, "alice", "Password123@").await;
    let access = cookie_value(&login_resp, "access_token_cookie").unwrap();
    let csrf = cookie_value(&login_resp, "csrf_access_token").unwrap();

    let req = Request::builder()
        .uri("/users")
        .header(header::COOKIE, format!("access_token_cookie={access}"))
        .header(CSRF_HEADER, csrf)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], "alice");
    assert_eq!(users[1]["username"], "bob");
    assert!(users[0]["id"].as_i64().unwrap() < users[1]["id"].as_i64().unwrap());
    assert!(users[0].get("password_hash").is_none());
}

/// The end-to-end lifecycle: register, login, refresh, then the refreshed
/// (non-fresh) token is turned away from the freshness gate.
#[tokio::test]
async fn full_token_lifecycle() {
    let app = app();

    assert_eq!(
        register(&app, "test", "Password123@").await.status(),
        StatusCode::OK
    );

    let login_resp = login(&app, "test", "Password123@").await;
    assert_eq!(login_resp.status(), StatusCode::OK);
    let old_access = cookie_value(&login_resp, "access_token_cookie").unwrap();
    let refresh_token = cookie_value(&login_resp, "refresh_token_cookie").unwrap();
    let refresh_csrf = cookie_value(&login_resp, "csrf_refresh_token").unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/auth/refresh")
        .header(
            header::COOKIE,
            format!("refresh_token_cookie={refresh_token}"),
        )
        .header(CSRF_HEADER, refresh_csrf)
        .body(Body::empty())
        .unwrap();
    let refresh_resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(refresh_resp.status(), StatusCode::OK);

    let new_access = cookie_value(&refresh_resp, "access_token_cookie").unwrap();
    let new_csrf = cookie_value(&refresh_resp, "csrf_access_token").unwrap();
    assert_ne!(new_access, old_access);

    let req = Request::builder()
        .uri("/auth/validate_fresh_token")
        .header(header::COOKIE, format!("access_token_cookie={new_access}"))
        .header(CSRF_HEADER, new_csrf)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
