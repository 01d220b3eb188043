//! Team preferences.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::auth::TeamContext;
use crate::domain::{PreferencesInput, TeamPreferences};
use crate::error::{ErrorResponse, TrackerError};

/// `GET /team/preferences`: Current preferences, created on first read.
///
/// # Errors
///
/// Returns [`TrackerError`] on missing session or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/team/preferences",
    tag = "Team",
    summary = "Get preferences",
    responses(
        (status = 200, description = "Preferences", body = TeamPreferences),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
    )
)]
pub async fn get_preferences(
    State(state): State<AppState>,
    ctx: TeamContext,
) -> Result<impl IntoResponse, TrackerError> {
    Ok(Json(state.tracker.preferences(ctx).await?))
}

/// `PUT /team/preferences`: Replace preferences.
///
/// # Errors
///
/// Returns [`TrackerError::InvalidRequest`] when validation fails.
#[utoipa::path(
    put,
    path = "/api/v1/team/preferences",
    tag = "Team",
    summary = "Replace preferences",
    description = "Missing fields take their defaults. `max_parallel_hackathons` must be at least 1 and `min_prize_amount` must not be negative.",
    request_body = PreferencesInput,
    responses(
        (status = 200, description = "Saved preferences", body = TeamPreferences),
        (status = 400, description = "Invalid preferences", body = ErrorResponse),
    )
)]
pub async fn put_preferences(
    State(state): State<AppState>,
    ctx: TeamContext,
    Json(input): Json<PreferencesInput>,
) -> Result<impl IntoResponse, TrackerError> {
    Ok(Json(state.tracker.update_preferences(ctx, input).await?))
}

/// Team routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/team/preferences",
        get(get_preferences).put(put_preferences),
    )
}
