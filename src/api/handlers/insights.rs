//! Alerts and analytics over the whole pipeline.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::ThemeBreakdown;
use crate::app_state::AppState;
use crate::auth::TeamContext;
use crate::error::{ErrorResponse, TrackerError};
use crate::planner::Alert;
use crate::service::{AnalyticsOverview, TimelinePoint};

/// `GET /alerts`: Deadline and progress alerts.
///
/// # Errors
///
/// Returns [`TrackerError`] on missing session or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/alerts",
    tag = "Insights",
    summary = "List alerts",
    description = "Computes alerts for every pipeline entry from its current tasks and checklist. Nothing is cached.",
    responses(
        (status = 200, description = "Alerts", body = Vec<Alert>),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
    )
)]
pub async fn alerts(
    State(state): State<AppState>,
    ctx: TeamContext,
) -> Result<impl IntoResponse, TrackerError> {
    Ok(Json(state.tracker.alerts(ctx).await?))
}

/// `GET /analytics/overview`: Pipeline totals.
///
/// # Errors
///
/// Returns [`TrackerError`] on missing session or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/overview",
    tag = "Insights",
    summary = "Analytics overview",
    responses(
        (status = 200, description = "Totals", body = AnalyticsOverview),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
    )
)]
pub async fn overview(
    State(state): State<AppState>,
    ctx: TeamContext,
) -> Result<impl IntoResponse, TrackerError> {
    Ok(Json(state.tracker.analytics_overview(ctx).await?))
}

/// `GET /analytics/themes`: Participation and wins per theme.
///
/// # Errors
///
/// Returns [`TrackerError`] on missing session or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/themes",
    tag = "Insights",
    summary = "Theme breakdown",
    responses(
        (status = 200, description = "Theme name to counts", body = ThemeBreakdown),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
    )
)]
pub async fn themes(
    State(state): State<AppState>,
    ctx: TeamContext,
) -> Result<impl IntoResponse, TrackerError> {
    let themes = state.tracker.analytics_themes(ctx).await?;
    Ok(Json(ThemeBreakdown(themes)))
}

/// `GET /analytics/timeline`: Monthly participation over the last year.
///
/// # Errors
///
/// Returns [`TrackerError`] on missing session or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/timeline",
    tag = "Insights",
    summary = "Participation timeline",
    responses(
        (status = 200, description = "Months with activity, oldest first", body = Vec<TimelinePoint>),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
    )
)]
pub async fn timeline(
    State(state): State<AppState>,
    ctx: TeamContext,
) -> Result<impl IntoResponse, TrackerError> {
    Ok(Json(state.tracker.analytics_timeline(ctx).await?))
}

/// Alert and analytics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(alerts))
        .route("/analytics/overview", get(overview))
        .route("/analytics/themes", get(themes))
        .route("/analytics/timeline", get(timeline))
}
