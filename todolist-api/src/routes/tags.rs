/// Tag endpoints
///
/// - `POST /tags` - Create tag. Tags are attached to tasks through the
///   task endpoints.

use crate::{app::AppState, error::ApiResult, extract::ValidJson};
use axum::{extract::State, http::StatusCode, Json};
use todolist_shared::models::{CreateTag, Tag};

/// Create tag
///
/// ```text
/// POST /tags
/// Content-Type: application/json
///
/// { "Name": "Urgent" }
/// ```
///
/// A body that fails to decode is rejected before the handler runs, so no
/// empty tag can be stored.
pub async fn create_tag(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateTag>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    let tag = state.store.create_tag(req).await?;

    tracing::info!(tag_id = tag.id, "Tag created");

    Ok((StatusCode::CREATED, Json(tag)))
}
