//! Plan building and task generation.
//!
//! A plan splits the window between the hackathon start and its submission
//! target into three equal phases, pulling the last phase's end back by a
//! fixed buffer. Tasks come from a fixed catalog and are due at the end of
//! the phase they fall into.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Hackathon, TaskCategory};

/// Hours kept free between the end of polishing and the real deadline.
pub const SUBMISSION_BUFFER_HOURS: i64 = 4;

/// Submission target used when a hackathon has no end or registration date.
const DEFAULT_WINDOW_DAYS: i64 = 7;
/// Minimum window when the dates are missing or inverted.
const MIN_WINDOW_HOURS: i64 = 24;

/// Name of a plan phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum PhaseName {
    /// First third.
    #[serde(rename = "Ideation")]
    Ideation,
    /// Second third.
    #[serde(rename = "Build")]
    Build,
    /// Last third, ending before the submission buffer.
    #[serde(rename = "Polish & Submission")]
    PolishAndSubmission,
}

impl PhaseName {
    /// Display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ideation => "Ideation",
            Self::Build => "Build",
            Self::PolishAndSubmission => "Polish & Submission",
        }
    }
}

/// A time-boxed plan phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PlanPhase {
    /// Phase name.
    pub name: PhaseName,
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// End; tasks of this phase are due here.
    pub end: DateTime<Utc>,
}

/// Three chronological phases plus the submission buffer they leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    /// Ideation, Build, Polish & Submission, in that order.
    pub phases: [PlanPhase; 3],
    /// Gap between the polish end and the submission target.
    pub submission_buffer_hours: i64,
}

impl Plan {
    /// Start of the first phase.
    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        let [first, ..] = &self.phases;
        first.start
    }

    /// The last phase.
    #[must_use]
    pub fn last_phase(&self) -> &PlanPhase {
        let [.., last] = &self.phases;
        last
    }
}

/// Builds the three-phase plan for `hackathon`.
///
/// Missing dates fall back to `now` (start) and `now + 7 days` (target); a
/// target at or before the start becomes `start + 24h`.
#[must_use]
pub fn build_plan(hackathon: &Hackathon, now: DateTime<Utc>) -> Plan {
    let start = hackathon.start_date.unwrap_or(now);
    let target = hackathon
        .end_date
        .or(hackathon.registration_deadline)
        .unwrap_or_else(|| now + Duration::days(DEFAULT_WINDOW_DAYS));
    let target = if target > start {
        target
    } else {
        start + Duration::hours(MIN_WINDOW_HOURS)
    };

    let chunk = (target - start) / 3;
    let ideation_end = start + chunk;
    let build_end = ideation_end + chunk;
    // Never let the buffer push polishing before the build phase ends.
    let polish_end = (target - Duration::hours(SUBMISSION_BUFFER_HOURS)).max(build_end);

    Plan {
        phases: [
            PlanPhase {
                name: PhaseName::Ideation,
                start,
                end: ideation_end,
            },
            PlanPhase {
                name: PhaseName::Build,
                start: ideation_end,
                end: build_end,
            },
            PlanPhase {
                name: PhaseName::PolishAndSubmission,
                start: build_end,
                end: polish_end,
            },
        ],
        submission_buffer_hours: SUBMISSION_BUFFER_HOURS,
    }
}

/// Catalog entry for a generated task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTemplate {
    /// Task title.
    pub title: &'static str,
    /// Task description.
    pub description: &'static str,
    /// Plan phase category.
    pub category: TaskCategory,
}

/// The fixed task catalog, in plan order.
pub const TASK_CATALOG: [TaskTemplate; 8] = [
    TaskTemplate {
        title: "Understand problem",
        description: "Digest the brief and judging criteria.",
        category: TaskCategory::Ideation,
    },
    TaskTemplate {
        title: "Research past winners",
        description: "Collect insights from previous champions.",
        category: TaskCategory::Ideation,
    },
    TaskTemplate {
        title: "Define architecture",
        description: "Outline system design and responsibilities.",
        category: TaskCategory::Build,
    },
    TaskTemplate {
        title: "Implement core features",
        description: "Pair on the differentiators first.",
        category: TaskCategory::Build,
    },
    TaskTemplate {
        title: "Polish UX / bugfixes",
        description: "Tighten flows, fix bugs, prep assets.",
        category: TaskCategory::Polish,
    },
    TaskTemplate {
        title: "Prepare deck",
        description: "Craft the storytelling narrative.",
        category: TaskCategory::Polish,
    },
    TaskTemplate {
        title: "Record demo",
        description: "Capture a clean walkthrough video.",
        category: TaskCategory::Polish,
    },
    TaskTemplate {
        title: "Submission dry run",
        description: "Rehearse upload + checklist before deadline.",
        category: TaskCategory::Polish,
    },
];

const TASKS_PER_PHASE: usize = 3;

/// A task produced from a plan, ready to be stored with status `TODO`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct GeneratedTask {
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Plan phase category.
    pub category: TaskCategory,
    /// End of the phase the task was assigned to.
    pub due_at: DateTime<Utc>,
}

/// Generates the catalog tasks for `plan`.
///
/// Task `i` lands in phase `min(2, i / 3)`, so the eight catalog entries
/// split 3 / 3 / 2 across the phases.
#[must_use]
pub fn generate_tasks(plan: &Plan) -> Vec<GeneratedTask> {
    let last = plan.phases.len().saturating_sub(1);
    TASK_CATALOG
        .iter()
        .enumerate()
        .map(|(index, template)| {
            let phase_index = (index / TASKS_PER_PHASE).min(last);
            let due_at = plan
                .phases
                .get(phase_index)
                .unwrap_or_else(|| plan.last_phase())
                .end;
            GeneratedTask {
                title: template.title.to_string(),
                description: template.description.to_string(),
                category: template.category,
                due_at,
            }
        })
        .collect()
}
