//! Requirement, project and submission-readiness handlers.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use crate::api::dto::{ParseRequirementsRequest, UpdateChecklistRequest};
use crate::app_state::AppState;
use crate::auth::TeamContext;
use crate::domain::{HackathonRequirement, Project, ProjectInput, TeamHackathonId};
use crate::error::{ErrorResponse, TrackerError};
use crate::planner::SubmissionStatus;

/// `POST /team-hackathons/:id/requirements/parse`: Build a checklist.
///
/// # Errors
///
/// Returns [`TrackerError::NotFound`] if the team has no such entry.
#[utoipa::path(
    post,
    path = "/api/v1/team-hackathons/{id}/requirements/parse",
    tag = "Submission",
    summary = "Parse requirements",
    description = "Extracts a submission checklist from the pasted rules text and replaces the entry's requirement record.",
    params(
        ("id" = uuid::Uuid, Path, description = "Pipeline entry UUID"),
    ),
    request_body = ParseRequirementsRequest,
    responses(
        (status = 200, description = "Stored requirement", body = HackathonRequirement),
        (status = 404, description = "Entry not found", body = ErrorResponse),
    )
)]
pub async fn parse_requirements(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<ParseRequirementsRequest>,
) -> Result<impl IntoResponse, TrackerError> {
    let requirement = state
        .tracker
        .parse_requirements(ctx, TeamHackathonId::from_uuid(id), req.raw_text)
        .await?;
    Ok(Json(requirement))
}

/// `PATCH /team-hackathons/:id/requirements`: Overwrite the checklist.
///
/// # Errors
///
/// Returns [`TrackerError::NotFound`] if the entry or its requirement
/// record does not exist.
#[utoipa::path(
    patch,
    path = "/api/v1/team-hackathons/{id}/requirements",
    tag = "Submission",
    summary = "Update checklist",
    params(
        ("id" = uuid::Uuid, Path, description = "Pipeline entry UUID"),
    ),
    request_body = UpdateChecklistRequest,
    responses(
        (status = 200, description = "Updated requirement", body = HackathonRequirement),
        (status = 404, description = "Entry or requirements not found", body = ErrorResponse),
    )
)]
pub async fn update_checklist(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateChecklistRequest>,
) -> Result<impl IntoResponse, TrackerError> {
    let requirement = state
        .tracker
        .update_checklist(ctx, TeamHackathonId::from_uuid(id), req.checklist)
        .await?;
    Ok(Json(requirement))
}

/// `GET /team-hackathons/:id/project`: The entry's project, or `null`.
///
/// # Errors
///
/// Returns [`TrackerError::NotFound`] if the team has no such entry.
#[utoipa::path(
    get,
    path = "/api/v1/team-hackathons/{id}/project",
    tag = "Submission",
    summary = "Get project",
    params(
        ("id" = uuid::Uuid, Path, description = "Pipeline entry UUID"),
    ),
    responses(
        (status = 200, description = "Project, or null when none was saved", body = Project),
        (status = 404, description = "Entry not found", body = ErrorResponse),
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, TrackerError> {
    let project = state
        .tracker
        .get_project(ctx, TeamHackathonId::from_uuid(id))
        .await?;
    Ok(Json(project))
}

/// `PUT /team-hackathons/:id/project`: Create or replace the project.
///
/// # Errors
///
/// Returns [`TrackerError::NotFound`] if the team has no such entry.
#[utoipa::path(
    put,
    path = "/api/v1/team-hackathons/{id}/project",
    tag = "Submission",
    summary = "Save project",
    description = "Replaces every project field. A missing name becomes \"Untitled project\".",
    params(
        ("id" = uuid::Uuid, Path, description = "Pipeline entry UUID"),
    ),
    request_body = ProjectInput,
    responses(
        (status = 200, description = "Saved project", body = Project),
        (status = 404, description = "Entry not found", body = ErrorResponse),
    )
)]
pub async fn upsert_project(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path(id): Path<uuid::Uuid>,
    Json(input): Json<ProjectInput>,
) -> Result<impl IntoResponse, TrackerError> {
    let project = state
        .tracker
        .upsert_project(ctx, TeamHackathonId::from_uuid(id), input)
        .await?;
    Ok(Json(project))
}

/// `GET /team-hackathons/:id/submission-status`: Missing artifacts.
///
/// # Errors
///
/// Returns [`TrackerError::NotFound`] if the team has no such entry.
#[utoipa::path(
    get,
    path = "/api/v1/team-hackathons/{id}/submission-status",
    tag = "Submission",
    summary = "Submission status",
    description = "Checks the project against every checklist item and lists the project fields still missing.",
    params(
        ("id" = uuid::Uuid, Path, description = "Pipeline entry UUID"),
    ),
    responses(
        (status = 200, description = "Missing fields and checklist", body = SubmissionStatus),
        (status = 404, description = "Entry not found", body = ErrorResponse),
    )
)]
pub async fn submission_status(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, TrackerError> {
    let status = state
        .tracker
        .submission_status(ctx, TeamHackathonId::from_uuid(id))
        .await?;
    Ok(Json(status))
}

/// Submission routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/team-hackathons/{id}/requirements/parse",
            post(parse_requirements),
        )
        .route("/team-hackathons/{id}/requirements", patch(update_checklist))
        .route(
            "/team-hackathons/{id}/project",
            get(get_project).put(upsert_project),
        )
        .route(
            "/team-hackathons/{id}/submission-status",
            get(submission_status),
        )
}
