//! Task handlers.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::auth::TeamContext;
use crate::domain::{Task, TaskId, TaskPatch, TeamHackathonId};
use crate::error::{ErrorResponse, TrackerError};

/// `GET /team-hackathons/:id/tasks`: Tasks by due date.
///
/// # Errors
///
/// Returns [`TrackerError::NotFound`] if the team has no such entry.
#[utoipa::path(
    get,
    path = "/api/v1/team-hackathons/{id}/tasks",
    tag = "Tasks",
    summary = "List tasks",
    description = "Returns the entry's tasks ordered by due date, undated tasks last.",
    params(
        ("id" = uuid::Uuid, Path, description = "Pipeline entry UUID"),
    ),
    responses(
        (status = 200, description = "Tasks", body = Vec<Task>),
        (status = 404, description = "Entry not found", body = ErrorResponse),
    )
)]
pub async fn list_tasks(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, TrackerError> {
    let tasks = state
        .tracker
        .list_tasks(ctx, TeamHackathonId::from_uuid(id))
        .await?;
    Ok(Json(tasks))
}

/// `PATCH /tasks/:task_id`: Update status, due date or assignee.
///
/// # Errors
///
/// Returns [`TrackerError::NotFound`] if the task does not belong to the team.
#[utoipa::path(
    patch,
    path = "/api/v1/tasks/{task_id}",
    tag = "Tasks",
    summary = "Update task",
    description = "Applies a partial update. Moving a task to DONE is written to the activity log.",
    params(
        ("task_id" = uuid::Uuid, Path, description = "Task UUID"),
    ),
    request_body = TaskPatch,
    responses(
        (status = 200, description = "Updated task", body = Task),
        (status = 404, description = "Task not found", body = ErrorResponse),
    )
)]
pub async fn update_task(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path(task_id): Path<uuid::Uuid>,
    Json(task_patch): Json<TaskPatch>,
) -> Result<impl IntoResponse, TrackerError> {
    let task = state
        .tracker
        .update_task(ctx, TaskId::from_uuid(task_id), task_patch)
        .await?;
    Ok(Json(task))
}

/// Task routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/team-hackathons/{id}/tasks", get(list_tasks))
        .route("/tasks/{task_id}", patch(update_task))
}
