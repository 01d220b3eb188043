//! Operator endpoints.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::auth::TeamContext;
use crate::error::{ErrorResponse, TrackerError};
use crate::service::SyncReport;

/// `POST /admin/sync-hackathons`: Run every ingestion source.
///
/// # Errors
///
/// Returns [`TrackerError::Forbidden`] unless sync is enabled in the
/// configuration.
#[utoipa::path(
    post,
    path = "/api/v1/admin/sync-hackathons",
    tag = "Admin",
    summary = "Sync hackathons",
    description = "Fetches events from every enabled source and upserts them by platform and external id. Disabled unless ADMIN_SYNC_ENABLED is set.",
    responses(
        (status = 200, description = "Sync report", body = SyncReport),
        (status = 403, description = "Sync disabled", body = ErrorResponse),
    )
)]
pub async fn sync_hackathons(
    State(state): State<AppState>,
    ctx: TeamContext,
) -> Result<impl IntoResponse, TrackerError> {
    if !state.admin_sync_enabled {
        return Err(TrackerError::Forbidden(
            "hackathon sync is disabled".to_string(),
        ));
    }
    tracing::info!(user_id = %ctx.user_id, "hackathon sync requested");
    Ok(Json(state.tracker.sync_sources().await?))
}

/// Admin routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/admin/sync-hackathons", post(sync_hackathons))
}
