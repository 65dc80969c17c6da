//! # keygate_api
//!
//! HTTP API library for Keygate.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{auth, users};
use keygate_core::auth::store::CredentialStore;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Credential store (Postgres in production, in-memory in tests).
    pub store: Arc<dyn CredentialStore>,
    /// API configuration.
    pub config: ApiConfig,
}

/// Run embedded database migrations.
///
/// Delegates to `keygate_core::migrate::migrate()` which owns the migration
/// files.
pub async fn migrate(pool: &sqlx::PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    keygate_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
///
/// Auth routes mount under `config.base_path`; `/users` sits at the root.
/// Guarded routes get their requirement as a middleware layer, so the
/// handler body only runs against verified claims.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no token required)
    let public = Router::new()
        .route("/home", get(auth::home_handler))
        .route("/register", post(auth::register_handler))
        .route("/login", post(auth::login_handler))
        .route("/fresh_login", post(auth::fresh_login_handler))
        .route("/logout", post(auth::logout_handler));

    let refresh = Router::new()
        .route("/refresh", post(auth::refresh_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_refresh,
        ));

    let validate = Router::new()
        .route(
            "/validate_token",
            get(auth::validate_token_handler).post(auth::validate_token_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_access,
        ));

    let validate_fresh = Router::new()
        .route(
            "/validate_fresh_token",
            get(auth::validate_fresh_token_handler).post(auth::validate_fresh_token_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_fresh_access,
        ));

    let auth_routes = public
        .merge(refresh)
        .merge(validate)
        .merge(validate_fresh);

    let user_routes = Router::new()
        .route("/users", get(users::list_users_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_access,
        ));

    Router::new()
        .nest(&state.config.base_path, auth_routes)
        .merge(user_routes)
        .layer(cors)
        .with_state(state)
}
