/// Task endpoints
///
/// # Endpoints
///
/// - `POST /tasks` - Create task
/// - `GET /tasks` - List tasks with their tags
/// - `PUT /tasks` - Replace task and its tag set
/// - `DELETE /tasks/:id` - Delete task

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{PathId, ValidJson},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use todolist_shared::models::{CreateTask, Task, UpdateTask};

/// Delete task response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTaskResponse {
    pub message: String,
}

/// Create task
///
/// # Endpoint
///
/// ```text
/// POST /tasks
/// Content-Type: application/json
///
/// {
///   "Title": "Buy milk",
///   "Priority": "high",
///   "Deadline": "2030-01-01T09:00:00Z",
///   "UserID": 1,
///   "Tags": [{ "ID": 3 }, { "Name": "errands" }]
/// }
/// ```
///
/// Tags given by `ID` are linked; tags given only by `Name` are created first.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body, missing `UserID`, empty tag reference
/// - `500 Internal Server Error`: Unknown user or tag, or storage failure
pub async fn create_task(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = state.store.create_task(req).await?;

    tracing::info!(task_id = task.id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// List tasks
///
/// # Errors
///
/// - `500 Internal Server Error`: Storage failure
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.store.list_tasks().await?;
    Ok(Json(tasks))
}

/// Replace task
///
/// Every field is overwritten, and the task ends up linked to exactly the
/// tags listed in `Tags`.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body or missing `ID`
/// - `404 Not Found`: No task has that `ID`
/// - `500 Internal Server Error`: Unknown user or tag, or storage failure
pub async fn update_task(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<UpdateTask>,
) -> ApiResult<Json<Task>> {
    let task = state.store.update_task(req).await?;

    tracing::info!(task_id = task.id, "Task updated");

    Ok(Json(task))
}

/// Delete task
///
/// Succeeds whether or not the task existed.
///
/// # Errors
///
/// - `400 Bad Request`: Non-numeric ID
/// - `500 Internal Server Error`: Storage failure
pub async fn delete_task(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<Json<DeleteTaskResponse>> {
    state.store.delete_task(id).await?;

    tracing::info!(task_id = id, "Task deleted");

    Ok(Json(DeleteTaskResponse {
        message: "Task deleted".to_string(),
    }))
}
