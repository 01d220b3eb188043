//! Hackathon copilot.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{AssistantRequest, AssistantResponse};
use crate::app_state::AppState;
use crate::auth::TeamContext;
use crate::domain::TeamHackathonId;
use crate::error::{ErrorResponse, TrackerError};

/// `POST /team-hackathons/:id/assistant`: Ask the copilot.
///
/// # Errors
///
/// Returns [`TrackerError::NotFound`] if the team has no such entry.
#[utoipa::path(
    post,
    path = "/api/v1/team-hackathons/{id}/assistant",
    tag = "Assistant",
    summary = "Copilot reply",
    description = "Answers the conversation using the hackathon, team preferences, project and tasks as context. Without a configured provider the reply is a deterministic stub.",
    params(
        ("id" = uuid::Uuid, Path, description = "Pipeline entry UUID"),
    ),
    request_body = AssistantRequest,
    responses(
        (status = 200, description = "Generated reply", body = AssistantResponse),
        (status = 404, description = "Entry not found", body = ErrorResponse),
    )
)]
pub async fn assistant_reply(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<AssistantRequest>,
) -> Result<impl IntoResponse, TrackerError> {
    let reply = state
        .tracker
        .assistant_reply(ctx, TeamHackathonId::from_uuid(id), &req.messages)
        .await?;
    Ok(Json(AssistantResponse { reply }))
}

/// Assistant routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/team-hackathons/{id}/assistant", post(assistant_reply))
}
