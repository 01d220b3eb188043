//! REST endpoint handlers organized by resource.

pub mod admin;
pub mod assistant;
pub mod discovery;
pub mod insights;
pub mod pipeline;
pub mod submission;
pub mod system;
pub mod tasks;
pub mod team;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(discovery::routes())
        .merge(pipeline::routes())
        .merge(tasks::routes())
        .merge(submission::routes())
        .merge(assistant::routes())
        .merge(insights::routes())
        .merge(team::routes())
        .merge(admin::routes())
}
