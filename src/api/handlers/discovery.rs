//! Hackathon discovery.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::auth::TeamContext;
use crate::error::{ErrorResponse, TrackerError};
use crate::service::ScoredHackathon;

/// `GET /hackathons/discovery`: Upcoming hackathons scored for the team.
///
/// # Errors
///
/// Returns [`TrackerError`] on missing session or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/hackathons/discovery",
    tag = "Discovery",
    summary = "Discover hackathons",
    description = "Lists up to 25 upcoming hackathons ordered by start date, each with its priority score for the calling team.",
    responses(
        (status = 200, description = "Scored hackathons", body = Vec<ScoredHackathon>),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
    )
)]
pub async fn discover(
    State(state): State<AppState>,
    ctx: TeamContext,
) -> Result<impl IntoResponse, TrackerError> {
    let hackathons = state.tracker.discover(ctx).await?;
    Ok(Json(hackathons))
}

/// Discovery routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/hackathons/discovery", get(discover))
}
