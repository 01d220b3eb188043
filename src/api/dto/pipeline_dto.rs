//! Pipeline and plan DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{HackathonId, PastResult, PipelineStatus, Task};
use crate::planner::PlanPhase;
use crate::service::PlanOutcome;

/// Request body for `POST /api/v1/team-hackathons`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddToPipelineRequest {
    /// Hackathon to track.
    pub hackathon_id: HackathonId,
}

/// Request body for `PATCH /api/v1/team-hackathons/{id}`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateEntryRequest {
    /// New pipeline status.
    #[serde(default)]
    pub status: Option<PipelineStatus>,
    /// New recorded outcome.
    #[serde(default)]
    pub past_result: Option<PastResult>,
}

/// Response body for `POST /api/v1/team-hackathons/{id}/generate-plan`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlanResponse {
    /// Ideation, Build, Polish & Submission.
    pub phases: Vec<PlanPhase>,
    /// Hours kept free between polishing and the deadline.
    pub submission_buffer_hours: i64,
    /// The regenerated task list.
    pub tasks: Vec<Task>,
}

impl From<PlanOutcome> for PlanResponse {
    fn from(outcome: PlanOutcome) -> Self {
        Self {
            phases: outcome.plan.phases.to_vec(),
            submission_buffer_hours: outcome.plan.submission_buffer_hours,
            tasks: outcome.tasks,
        }
    }
}
