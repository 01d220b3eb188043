//! Persistence layer: the [`TrackerStore`] trait and its backends.
//!
//! [`postgres::PostgresStore`] keeps everything in PostgreSQL through a
//! `sqlx::PgPool`; [`memory::MemoryStore`] keeps it in process for tests
//! and for running without a database.
//!
//! Reads of team-owned data take the caller's [`TeamId`] and only return
//! rows belonging to that team. Hackathons are global.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    ActivityEvent, ChecklistItem, EventInput, Hackathon, HackathonId, HackathonRequirement,
    Project, RequirementId, Task, TaskId, TeamHackathon, TeamHackathonId, TeamId, TeamMember,
    TeamPreferences,
};
use crate::error::TrackerError;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Storage operations used by the tracker service.
///
/// # Errors
///
/// Every method returns [`TrackerError::Persistence`] when the backend
/// fails. A missing row is `Ok(None)`, not an error.
#[async_trait]
pub trait TrackerStore: Send + Sync + std::fmt::Debug {
    /// Preferences of `team_id`, if stored.
    async fn get_preferences(&self, team_id: TeamId)
    -> Result<Option<TeamPreferences>, TrackerError>;

    /// Inserts or replaces a team's preferences.
    async fn save_preferences(&self, prefs: &TeamPreferences) -> Result<(), TrackerError>;

    /// Members of `team_id`.
    async fn list_members(&self, team_id: TeamId) -> Result<Vec<TeamMember>, TrackerError>;

    /// Inserts or replaces a team member.
    async fn save_member(&self, member: &TeamMember) -> Result<(), TrackerError>;

    /// Upserts an ingested event keyed by `(platform, external_id)`.
    async fn upsert_hackathon(
        &self,
        platform: &str,
        input: EventInput,
    ) -> Result<Hackathon, TrackerError>;

    /// A hackathon by id.
    async fn get_hackathon(&self, id: HackathonId) -> Result<Option<Hackathon>, TrackerError>;

    /// Hackathons starting or closing registration at or after `now`,
    /// ordered by start date, at most `limit`.
    async fn list_upcoming_hackathons(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Hackathon>, TrackerError>;

    /// Creates the team's entry for a hackathon with status `WATCHING`, or
    /// refreshes the score of the existing one.
    async fn upsert_team_hackathon(
        &self,
        team_id: TeamId,
        hackathon_id: HackathonId,
        priority_score: f64,
    ) -> Result<TeamHackathon, TrackerError>;

    /// The team's pipeline, newest first.
    async fn list_team_hackathons(&self, team_id: TeamId)
    -> Result<Vec<TeamHackathon>, TrackerError>;

    /// One pipeline entry of the team.
    async fn get_team_hackathon(
        &self,
        team_id: TeamId,
        id: TeamHackathonId,
    ) -> Result<Option<TeamHackathon>, TrackerError>;

    /// Persists status, past result and score of an entry.
    async fn update_team_hackathon(&self, entry: &TeamHackathon) -> Result<(), TrackerError>;

    /// Replaces every task of an entry with `tasks`, all or nothing.
    async fn replace_tasks(
        &self,
        team_hackathon_id: TeamHackathonId,
        tasks: &[Task],
    ) -> Result<(), TrackerError>;

    /// Tasks of an entry ordered by due date, undated last.
    async fn list_tasks(&self, team_hackathon_id: TeamHackathonId)
    -> Result<Vec<Task>, TrackerError>;

    /// A task, provided its entry belongs to `team_id`.
    async fn get_task(&self, team_id: TeamId, id: TaskId) -> Result<Option<Task>, TrackerError>;

    /// Persists status, due date and assignee of a task.
    async fn update_task(&self, task: &Task) -> Result<(), TrackerError>;

    /// Requirement records of an entry, oldest first.
    async fn list_requirements(
        &self,
        team_hackathon_id: TeamHackathonId,
    ) -> Result<Vec<HackathonRequirement>, TrackerError>;

    /// Deletes an entry's requirements and stores `requirement` instead.
    async fn replace_requirement(
        &self,
        requirement: &HackathonRequirement,
    ) -> Result<(), TrackerError>;

    /// Overwrites the checklist of a requirement record.
    async fn update_checklist(
        &self,
        requirement_id: RequirementId,
        checklist: &[ChecklistItem],
    ) -> Result<(), TrackerError>;

    /// The project of an entry.
    async fn get_project(
        &self,
        team_hackathon_id: TeamHackathonId,
    ) -> Result<Option<Project>, TrackerError>;

    /// Inserts or replaces the project of an entry.
    async fn save_project(&self, project: &Project) -> Result<(), TrackerError>;

    /// Appends to the activity log.
    async fn append_activity(&self, event: &ActivityEvent) -> Result<(), TrackerError>;
}
