//! Service layer: business logic orchestration.
//!
//! [`TrackerService`] scopes every operation to the calling team, runs the
//! planning core and records activity through the store.

pub mod analytics;
pub mod tracker_service;

pub use analytics::{AnalyticsOverview, ThemeStats, TimelinePoint};
pub use tracker_service::{
    ChatMessage, ChatRole, PipelineEntry, PipelineEntryDetail, PlanOutcome, ScoredHackathon,
    SyncReport, TrackerService,
};
