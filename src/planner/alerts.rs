//! Deadline and progress alerts for a pipeline entry.
//!
//! Alerts are derived on every request from the current tasks and
//! checklists; nothing about them is stored.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Hackathon, HackathonRequirement, Task, TeamHackathonId};

/// Window in which unfinished work becomes critical.
const CRITICAL_WINDOW_HOURS: i64 = 24;

/// How urgent an alert is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth a look.
    Info,
    /// Something slipped.
    Warning,
    /// The deadline is close and work remains.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        })
    }
}

/// A single alert for a pipeline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Alert {
    /// Entry the alert is about.
    pub team_hackathon_id: TeamHackathonId,
    /// Urgency.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

/// Snapshot the alert rules run against.
#[derive(Debug, Clone, Copy)]
pub struct AlertInput<'a> {
    /// Entry being checked.
    pub team_hackathon_id: TeamHackathonId,
    /// The entry's hackathon, for its deadline.
    pub hackathon: &'a Hackathon,
    /// All tasks of the entry.
    pub tasks: &'a [Task],
    /// All requirement records of the entry.
    pub requirements: &'a [HackathonRequirement],
}

/// Computes the alerts for one pipeline entry.
///
/// Rules fire independently, in this order:
/// 1. `critical` when the deadline (end date, else registration deadline)
///    is at most 24h away and any task or checklist item is open. A deadline
///    that has already passed counts as within the window.
/// 2. `warning` when open tasks are past their due date.
/// 3. `info` when checklist items are open, unless rule 1 fired.
#[must_use]
pub fn compute_alerts(input: AlertInput<'_>, now: DateTime<Utc>) -> Vec<Alert> {
    let open_tasks: Vec<&Task> = input.tasks.iter().filter(|t| t.is_open()).collect();
    let overdue = open_tasks
        .iter()
        .filter(|t| t.due_at.is_some_and(|due| due < now))
        .count();
    let checklist_incomplete = input.requirements.iter().any(HackathonRequirement::has_open_items);

    let deadline = input
        .hackathon
        .end_date
        .or(input.hackathon.registration_deadline);
    let deadline_close =
        deadline.is_some_and(|d| d - now <= Duration::hours(CRITICAL_WINDOW_HOURS));

    let alert = |severity, message: String| Alert {
        team_hackathon_id: input.team_hackathon_id,
        severity,
        message,
    };

    let mut alerts = Vec::new();
    let critical = deadline_close && (!open_tasks.is_empty() || checklist_incomplete);
    if critical {
        alerts.push(alert(
            Severity::Critical,
            "Submission due in <24h and there are unfinished items.".to_string(),
        ));
    }
    if overdue > 0 {
        alerts.push(alert(Severity::Warning, format!("{overdue} task(s) are overdue")));
    }
    if checklist_incomplete && !critical {
        alerts.push(alert(
            Severity::Info,
            "Submission checklist still has items to review.".to_string(),
        ));
    }
    alerts
}
