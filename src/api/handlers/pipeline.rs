//! Pipeline handlers: track hackathons, update their status, generate plans.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{AddToPipelineRequest, PlanResponse, UpdateEntryRequest};
use crate::app_state::AppState;
use crate::auth::TeamContext;
use crate::domain::{TeamHackathon, TeamHackathonId};
use crate::error::{ErrorResponse, TrackerError};
use crate::service::{PipelineEntry, PipelineEntryDetail};

/// `GET /team-hackathons`: The team's pipeline.
///
/// # Errors
///
/// Returns [`TrackerError`] on missing session or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/team-hackathons",
    tag = "Pipeline",
    summary = "List pipeline",
    description = "Returns every tracked hackathon of the team with its hackathon, newest first.",
    responses(
        (status = 200, description = "Pipeline entries", body = Vec<PipelineEntry>),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
    )
)]
pub async fn list_pipeline(
    State(state): State<AppState>,
    ctx: TeamContext,
) -> Result<impl IntoResponse, TrackerError> {
    Ok(Json(state.tracker.list_pipeline(ctx).await?))
}

/// `POST /team-hackathons`: Track a hackathon.
///
/// # Errors
///
/// Returns [`TrackerError::NotFound`] if the hackathon does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/team-hackathons",
    tag = "Pipeline",
    summary = "Add to pipeline",
    description = "Adds the hackathon to the team's pipeline as WATCHING, or refreshes the priority score if it is already tracked.",
    request_body = AddToPipelineRequest,
    responses(
        (status = 201, description = "Entry created or re-scored", body = TeamHackathon),
        (status = 404, description = "Hackathon not found", body = ErrorResponse),
    )
)]
pub async fn add_to_pipeline(
    State(state): State<AppState>,
    ctx: TeamContext,
    Json(req): Json<AddToPipelineRequest>,
) -> Result<impl IntoResponse, TrackerError> {
    let entry = state.tracker.add_to_pipeline(ctx, req.hackathon_id).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// `GET /team-hackathons/:id`: One entry with hackathon and requirements.
///
/// # Errors
///
/// Returns [`TrackerError::NotFound`] if the team has no such entry.
#[utoipa::path(
    get,
    path = "/api/v1/team-hackathons/{id}",
    tag = "Pipeline",
    summary = "Get pipeline entry",
    params(
        ("id" = uuid::Uuid, Path, description = "Pipeline entry UUID"),
    ),
    responses(
        (status = 200, description = "Entry details", body = PipelineEntryDetail),
        (status = 404, description = "Entry not found", body = ErrorResponse),
    )
)]
pub async fn get_entry(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, TrackerError> {
    let detail = state
        .tracker
        .get_pipeline_entry(ctx, TeamHackathonId::from_uuid(id))
        .await?;
    Ok(Json(detail))
}

/// `PATCH /team-hackathons/:id`: Update status or result.
///
/// # Errors
///
/// Returns [`TrackerError::NotFound`] if the team has no such entry.
#[utoipa::path(
    patch,
    path = "/api/v1/team-hackathons/{id}",
    tag = "Pipeline",
    summary = "Update pipeline entry",
    description = "Sets the status and/or past result. Submitting, winning and shortlisting are written to the activity log.",
    params(
        ("id" = uuid::Uuid, Path, description = "Pipeline entry UUID"),
    ),
    request_body = UpdateEntryRequest,
    responses(
        (status = 200, description = "Updated entry", body = TeamHackathon),
        (status = 404, description = "Entry not found", body = ErrorResponse),
    )
)]
pub async fn update_entry(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateEntryRequest>,
) -> Result<impl IntoResponse, TrackerError> {
    let entry = state
        .tracker
        .update_pipeline_entry(
            ctx,
            TeamHackathonId::from_uuid(id),
            req.status,
            req.past_result,
        )
        .await?;
    Ok(Json(entry))
}

/// `POST /team-hackathons/:id/generate-plan`: Build plan and tasks.
///
/// # Errors
///
/// Returns [`TrackerError::NotFound`] if the team has no such entry.
#[utoipa::path(
    post,
    path = "/api/v1/team-hackathons/{id}/generate-plan",
    tag = "Pipeline",
    summary = "Generate plan",
    description = "Splits the hacking window into Ideation, Build and Polish & Submission and replaces the entry's tasks with a fresh set of eight.",
    params(
        ("id" = uuid::Uuid, Path, description = "Pipeline entry UUID"),
    ),
    responses(
        (status = 200, description = "Plan and new tasks", body = PlanResponse),
        (status = 404, description = "Entry not found", body = ErrorResponse),
    )
)]
pub async fn generate_plan(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, TrackerError> {
    let outcome = state
        .tracker
        .generate_plan(ctx, TeamHackathonId::from_uuid(id))
        .await?;
    Ok(Json(PlanResponse::from(outcome)))
}

/// Pipeline routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/team-hackathons", get(list_pipeline).post(add_to_pipeline))
        .route("/team-hackathons/{id}", get(get_entry).patch(update_entry))
        .route("/team-hackathons/{id}/generate-plan", post(generate_plan))
}
