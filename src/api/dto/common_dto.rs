//! Shared DTO types used across multiple endpoints.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::service::ThemeStats;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"healthy"` when the process answers.
    pub status: String,
    /// Server time, RFC 3339.
    pub timestamp: String,
    /// Crate version.
    pub version: String,
}

/// Theme name to participation counts.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ThemeBreakdown(pub BTreeMap<String, ThemeStats>);
