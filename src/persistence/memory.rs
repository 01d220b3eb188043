//! In-process implementation of [`TrackerStore`].
//!
//! All tables live behind a single [`tokio::sync::RwLock`], so every
//! operation, including task replacement, is atomic with respect to the
//! others. Used by the test suites and when `PERSISTENCE_ENABLED=false`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::TrackerStore;
use crate::domain::{
    ActivityEvent, ChecklistItem, EventInput, Hackathon, HackathonId, HackathonRequirement,
    Project, RequirementId, Task, TaskId, TeamHackathon, TeamHackathonId, TeamId, TeamMember,
    TeamPreferences,
};
use crate::error::TrackerError;

#[derive(Debug, Default)]
struct Tables {
    preferences: HashMap<TeamId, TeamPreferences>,
    members: Vec<TeamMember>,
    hackathons: Vec<Hackathon>,
    team_hackathons: Vec<TeamHackathon>,
    tasks: Vec<Task>,
    requirements: Vec<HackathonRequirement>,
    projects: HashMap<TeamHackathonId, Project>,
    activity: Vec<ActivityEvent>,
}

impl Tables {
    fn owns(&self, team_id: TeamId, team_hackathon_id: TeamHackathonId) -> bool {
        self.team_hackathons
            .iter()
            .any(|th| th.id == team_hackathon_id && th.team_id == team_id)
    }
}

/// [`TrackerStore`] backed by in-memory tables.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the activity log, oldest first.
    pub async fn activity(&self) -> Vec<ActivityEvent> {
        self.tables.read().await.activity.clone()
    }
}

#[async_trait]
impl TrackerStore for MemoryStore {
    async fn get_preferences(
        &self,
        team_id: TeamId,
    ) -> Result<Option<TeamPreferences>, TrackerError> {
        Ok(self.tables.read().await.preferences.get(&team_id).cloned())
    }

    async fn save_preferences(&self, prefs: &TeamPreferences) -> Result<(), TrackerError> {
        self.tables
            .write()
            .await
            .preferences
            .insert(prefs.team_id, prefs.clone());
        Ok(())
    }

    async fn list_members(&self, team_id: TeamId) -> Result<Vec<TeamMember>, TrackerError> {
        let tables = self.tables.read().await;
        Ok(tables
            .members
            .iter()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn save_member(&self, member: &TeamMember) -> Result<(), TrackerError> {
        let mut tables = self.tables.write().await;
        match tables.members.iter_mut().find(|m| m.id == member.id) {
            Some(existing) => *existing = member.clone(),
            None => tables.members.push(member.clone()),
        }
        Ok(())
    }

    async fn upsert_hackathon(
        &self,
        platform: &str,
        input: EventInput,
    ) -> Result<Hackathon, TrackerError> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .hackathons
            .iter_mut()
            .find(|h| h.platform == platform && h.external_id == input.external_id);
        match existing {
            Some(h) => {
                *h = input.into_hackathon(h.id, platform);
                Ok(h.clone())
            }
            None => {
                let h = input.into_hackathon(HackathonId::new(), platform);
                tables.hackathons.push(h.clone());
                Ok(h)
            }
        }
    }

    async fn get_hackathon(&self, id: HackathonId) -> Result<Option<Hackathon>, TrackerError> {
        let tables = self.tables.read().await;
        Ok(tables.hackathons.iter().find(|h| h.id == id).cloned())
    }

    async fn list_upcoming_hackathons(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Hackathon>, TrackerError> {
        let tables = self.tables.read().await;
        let mut upcoming: Vec<Hackathon> = tables
            .hackathons
            .iter()
            .filter(|h| {
                h.start_date.is_some_and(|d| d >= now)
                    || h.registration_deadline.is_some_and(|d| d >= now)
            })
            .cloned()
            .collect();
        upcoming.sort_by_key(|h| (h.start_date.is_none(), h.start_date));
        upcoming.truncate(limit);
        Ok(upcoming)
    }

    async fn upsert_team_hackathon(
        &self,
        team_id: TeamId,
        hackathon_id: HackathonId,
        priority_score: f64,
    ) -> Result<TeamHackathon, TrackerError> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .team_hackathons
            .iter_mut()
            .find(|th| th.team_id == team_id && th.hackathon_id == hackathon_id);
        match existing {
            Some(th) => {
                th.priority_score = priority_score;
                th.updated_at = Utc::now();
                Ok(th.clone())
            }
            None => {
                let th = TeamHackathon::new(team_id, hackathon_id, priority_score);
                tables.team_hackathons.push(th.clone());
                Ok(th)
            }
        }
    }

    async fn list_team_hackathons(
        &self,
        team_id: TeamId,
    ) -> Result<Vec<TeamHackathon>, TrackerError> {
        let tables = self.tables.read().await;
        // Insertion order is creation order; newest first.
        Ok(tables
            .team_hackathons
            .iter()
            .rev()
            .filter(|th| th.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn get_team_hackathon(
        &self,
        team_id: TeamId,
        id: TeamHackathonId,
    ) -> Result<Option<TeamHackathon>, TrackerError> {
        let tables = self.tables.read().await;
        Ok(tables
            .team_hackathons
            .iter()
            .find(|th| th.id == id && th.team_id == team_id)
            .cloned())
    }

    async fn update_team_hackathon(&self, entry: &TeamHackathon) -> Result<(), TrackerError> {
        let mut tables = self.tables.write().await;
        if let Some(th) = tables
            .team_hackathons
            .iter_mut()
            .find(|th| th.id == entry.id && th.team_id == entry.team_id)
        {
            th.status = entry.status;
            th.past_result = entry.past_result;
            th.priority_score = entry.priority_score;
            th.updated_at = entry.updated_at;
        }
        Ok(())
    }

    async fn replace_tasks(
        &self,
        team_hackathon_id: TeamHackathonId,
        tasks: &[Task],
    ) -> Result<(), TrackerError> {
        let mut tables = self.tables.write().await;
        tables
            .tasks
            .retain(|t| t.team_hackathon_id != team_hackathon_id);
        tables.tasks.extend(tasks.iter().cloned().map(|mut t| {
            t.team_hackathon_id = team_hackathon_id;
            t
        }));
        Ok(())
    }

    async fn list_tasks(
        &self,
        team_hackathon_id: TeamHackathonId,
    ) -> Result<Vec<Task>, TrackerError> {
        let tables = self.tables.read().await;
        let mut tasks: Vec<Task> = tables
            .tasks
            .iter()
            .filter(|t| t.team_hackathon_id == team_hackathon_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| (t.due_at.is_none(), t.due_at));
        Ok(tasks)
    }

    async fn get_task(&self, team_id: TeamId, id: TaskId) -> Result<Option<Task>, TrackerError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .iter()
            .find(|t| t.id == id && tables.owns(team_id, t.team_hackathon_id))
            .cloned())
    }

    async fn update_task(&self, task: &Task) -> Result<(), TrackerError> {
        let mut tables = self.tables.write().await;
        if let Some(t) = tables.tasks.iter_mut().find(|t| t.id == task.id) {
            t.status = task.status;
            t.due_at = task.due_at;
            t.assignee_user_id = task.assignee_user_id;
        }
        Ok(())
    }

    async fn list_requirements(
        &self,
        team_hackathon_id: TeamHackathonId,
    ) -> Result<Vec<HackathonRequirement>, TrackerError> {
        let tables = self.tables.read().await;
        Ok(tables
            .requirements
            .iter()
            .filter(|r| r.team_hackathon_id == team_hackathon_id)
            .cloned()
            .collect())
    }

    async fn replace_requirement(
        &self,
        requirement: &HackathonRequirement,
    ) -> Result<(), TrackerError> {
        let mut tables = self.tables.write().await;
        tables
            .requirements
            .retain(|r| r.team_hackathon_id != requirement.team_hackathon_id);
        tables.requirements.push(requirement.clone());
        Ok(())
    }

    async fn update_checklist(
        &self,
        requirement_id: RequirementId,
        checklist: &[ChecklistItem],
    ) -> Result<(), TrackerError> {
        let mut tables = self.tables.write().await;
        if let Some(r) = tables
            .requirements
            .iter_mut()
            .find(|r| r.id == requirement_id)
        {
            r.checklist = checklist.to_vec();
        }
        Ok(())
    }

    async fn get_project(
        &self,
        team_hackathon_id: TeamHackathonId,
    ) -> Result<Option<Project>, TrackerError> {
        Ok(self
            .tables
            .read()
            .await
            .projects
            .get(&team_hackathon_id)
            .cloned())
    }

    async fn save_project(&self, project: &Project) -> Result<(), TrackerError> {
        self.tables
            .write()
            .await
            .projects
            .insert(project.team_hackathon_id, project.clone());
        Ok(())
    }

    async fn append_activity(&self, event: &ActivityEvent) -> Result<(), TrackerError> {
        self.tables.write().await.activity.push(event.clone());
        Ok(())
    }
}
