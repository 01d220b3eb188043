//! Planned tasks.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{TaskId, TeamHackathonId, UserId};

/// Plan phase a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    /// Understanding the problem and shaping the idea.
    Ideation,
    /// Implementation.
    Build,
    /// Polish, assets and submission.
    Polish,
}

impl TaskCategory {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ideation => "ideation",
            Self::Build => "build",
            Self::Polish => "polish",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ideation" => Ok(Self::Ideation),
            "build" => Ok(Self::Build),
            "polish" => Ok(Self::Polish),
            other => Err(format!("unknown task category: {other}")),
        }
    }
}

/// Progress of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Todo,
    /// Being worked on.
    InProgress,
    /// Waiting on something.
    Blocked,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Blocked => "BLOCKED",
            Self::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TODO" => Ok(Self::Todo),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "BLOCKED" => Ok(Self::Blocked),
            "DONE" => Ok(Self::Done),
            other => Err(format!("unknown task status: {other}")),
        }
    }
}

/// A task of a team's hackathon plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Task {
    /// Task identifier.
    pub id: TaskId,
    /// Owning pipeline entry.
    pub team_hackathon_id: TeamHackathonId,
    /// Short title.
    pub title: String,
    /// What the task involves.
    pub description: String,
    /// Plan phase.
    pub category: TaskCategory,
    /// Progress.
    pub status: TaskStatus,
    /// Due date, usually the end of the task's phase.
    pub due_at: Option<DateTime<Utc>>,
    /// Member responsible for the task.
    pub assignee_user_id: Option<UserId>,
}

impl Task {
    /// `true` unless the task is done.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status != TaskStatus::Done
    }
}

/// Partial update applied to a task. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TaskPatch {
    /// New status.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// New due date.
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    /// New assignee.
    #[serde(default)]
    pub assignee_user_id: Option<UserId>,
}

impl TaskPatch {
    /// Applies the patch in place.
    pub fn apply(&self, task: &mut Task) {
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(due_at) = self.due_at {
            task.due_at = Some(due_at);
        }
        if let Some(assignee) = self.assignee_user_id {
            task.assignee_user_id = Some(assignee);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        Task {
            id: TaskId::new(),
            team_hackathon_id: TeamHackathonId::new(),
            title: "Record demo".to_string(),
            description: "Capture a clean walkthrough video.".to_string(),
            category: TaskCategory::Polish,
            status: TaskStatus::Todo,
            due_at: None,
            assignee_user_id: None,
        }
    }

    #[test]
    fn patch_keeps_unset_fields() {
        let mut t = task();
        let assignee = UserId::new();
        t.assignee_user_id = Some(assignee);

        TaskPatch {
            status: Some(TaskStatus::Done),
            ..TaskPatch::default()
        }
        .apply(&mut t);

        assert_eq!(t.status, TaskStatus::Done);
        assert_eq!(t.assignee_user_id, Some(assignee));
        assert!(!t.is_open());
    }

    #[test]
    fn status_uses_screaming_case_on_the_wire() {
        let json = serde_json::to_string(&TaskStatus::InProgress).ok();
        assert_eq!(json.as_deref(), Some("\"IN_PROGRESS\""));
        assert_eq!("IN_PROGRESS".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
    }
}
