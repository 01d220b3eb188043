//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::SessionKeys;
use crate::service::TrackerService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Tracker service for all business logic.
    pub tracker: Arc<TrackerService>,
    /// Verifies session tokens for the [`crate::auth::TeamContext`] extractor.
    pub session_keys: SessionKeys,
    /// Whether `POST /api/v1/admin/sync-hackathons` may run.
    pub admin_sync_enabled: bool,
}
