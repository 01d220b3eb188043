//! Activity log entries emitted by pipeline mutations.
//!
//! Every notable change (entry added, plan generated, task finished, status
//! milestones) is appended to the team's activity log. The log feeds the
//! dashboard timeline and is never read back by the planning core.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{TaskId, TeamHackathonId, TeamId, UserId};

/// What happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ActivityKind {
    /// A hackathon was added to (or re-scored in) the pipeline.
    TeamHackathonCreated {
        /// Score computed at insertion.
        priority_score: f64,
    },
    /// A task plan was (re)generated.
    PlanGenerated {
        /// Number of plan phases.
        phases: usize,
    },
    /// A task moved to `DONE`.
    TaskCompleted {
        /// Completed task.
        task_id: TaskId,
    },
    /// The entry moved to `SUBMITTED`.
    StatusSubmitted,
    /// The entry was marked as won.
    StatusWon,
    /// The entry was marked as shortlisted.
    StatusShortlisted,
}

impl ActivityKind {
    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::TeamHackathonCreated { .. } => "team_hackathon_created",
            Self::PlanGenerated { .. } => "plan_generated",
            Self::TaskCompleted { .. } => "task_completed",
            Self::StatusSubmitted => "status_submitted",
            Self::StatusWon => "status_won",
            Self::StatusShortlisted => "status_shortlisted",
        }
    }

    /// Variant-specific metadata as a JSON object (without the tag).
    #[must_use]
    pub fn metadata(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(map) = value.as_object_mut() {
            map.remove("event_type");
        }
        value
    }
}

/// A single activity log row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEvent {
    /// Team the event belongs to.
    pub team_id: TeamId,
    /// Acting user, when known.
    pub user_id: Option<UserId>,
    /// Related pipeline entry, when any.
    pub team_hackathon_id: Option<TeamHackathonId>,
    /// Event payload.
    pub kind: ActivityKind,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
}

impl ActivityEvent {
    /// Event for `team_hackathon_id` stamped with the current time.
    #[must_use]
    pub fn new(
        team_id: TeamId,
        user_id: Option<UserId>,
        team_hackathon_id: Option<TeamHackathonId>,
        kind: ActivityKind,
    ) -> Self {
        Self {
            team_id,
            user_id,
            team_hackathon_id,
            kind,
            timestamp: Utc::now(),
        }
    }
}
