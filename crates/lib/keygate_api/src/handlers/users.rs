//! User listing request handlers.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::UserListResponse;
use crate::services::auth;

/// `GET /users` — list all users, ordered by id. Requires a valid access
/// token; no role distinction exists.
pub async fn list_users_handler(
    State(state): State<AppState>,
    axum::Extension(_user): axum::Extension<AuthenticatedUser>,
) -> AppResult<Json<UserListResponse>> {
    let users = auth::list_users(state.store.as_ref()).await?;
    Ok(Json(UserListResponse { users }))
}
