/// User endpoints
///
/// # Endpoints
///
/// - `POST /users` - Create user
/// - `GET /users` - List users with their tasks
/// - `PUT /users` - Replace user (also served at `PUT /users/update`)

use crate::{app::AppState, error::ApiResult, extract::ValidJson};
use axum::{extract::State, http::StatusCode, Json};
use todolist_shared::models::{CreateUser, UpdateUser, User};

/// Create user
///
/// # Endpoint
///
/// ```text
/// POST /users
/// Content-Type: application/json
///
/// {
///   "name": "Ada Lovelace",
///   "email": "ada@example.com",
///   "password": "analytical"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the stored user, including `id` and `created_at`.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body or missing/oversized fields
/// - `500 Internal Server Error`: Storage failure
pub async fn create_user(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.store.create_user(req).await?;

    tracing::info!(user_id = user.id, "User created");

    Ok((StatusCode::CREATED, Json(user)))
}

/// List users
///
/// Returns every user in insertion order, each with a `tasks` array.
///
/// # Errors
///
/// - `500 Internal Server Error`: Storage failure
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = state.store.list_users().await?;
    Ok(Json(users))
}

/// Replace user
///
/// Overwrites every field of the user named by `id`. `created_at` keeps its
/// stored value unless supplied.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body, missing `id` or fields
/// - `404 Not Found`: No user has that `id`
/// - `500 Internal Server Error`: Storage failure
pub async fn update_user(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<UpdateUser>,
) -> ApiResult<Json<User>> {
    let user = state.store.update_user(req).await?;

    tracing::info!(user_id = user.id, "User updated");

    Ok(Json(user))
}
