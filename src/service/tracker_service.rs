//! Tracker service: orchestrates the planning core over storage, the text
//! generator and the ingestion sources.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::analytics::{self, AnalyticsOverview, ThemeStats, TimelinePoint};
use crate::auth::TeamContext;
use crate::domain::{
    ActivityEvent, ActivityKind, ChecklistItem, Hackathon, HackathonId, HackathonRequirement,
    PastResult, PipelineStatus, PreferencesInput, Project, ProjectInput, RequirementId, Task,
    TaskId, TaskPatch, TaskStatus, TeamHackathon, TeamHackathonId, TeamPreferences, team_skills,
};
use crate::error::TrackerError;
use crate::ingest::SourceRegistry;
use crate::llm::{PromptContext, TextGenerator, stub_reply};
use crate::persistence::TrackerStore;
use crate::planner::{
    Alert, AlertInput, Plan, SubmissionStatus, build_plan, compute_alerts,
    compute_priority_score, generate_tasks, parse_checklist, validate_submission,
};

/// Hackathons shown on the discovery page.
const DISCOVERY_LIMIT: usize = 25;

const REQUIREMENTS_PROMPT: &str = "Extract submission requirements";

/// An upcoming hackathon with its score for the calling team.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScoredHackathon {
    /// The hackathon.
    #[serde(flatten)]
    pub hackathon: Hackathon,
    /// Fit for the team.
    pub priority_score: f64,
}

/// A pipeline entry joined with its hackathon.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PipelineEntry {
    /// The entry.
    #[serde(flatten)]
    pub entry: TeamHackathon,
    /// The tracked hackathon.
    pub hackathon: Hackathon,
}

/// A pipeline entry with its hackathon and requirement records.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PipelineEntryDetail {
    /// The entry.
    #[serde(flatten)]
    pub entry: TeamHackathon,
    /// The tracked hackathon.
    pub hackathon: Hackathon,
    /// Parsed requirements, oldest first.
    pub requirements: Vec<HackathonRequirement>,
}

/// A freshly generated plan and the tasks that replaced the old list.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    /// The three-phase plan.
    pub plan: Plan,
    /// Stored tasks, ordered by due date.
    pub tasks: Vec<Task>,
}

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SyncReport {
    /// Sources that were asked for events.
    pub sources: usize,
    /// Events inserted or refreshed.
    pub upserted: usize,
    /// Names of sources that failed.
    pub failed: Vec<String>,
}

/// Speaker of a copilot chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The team member.
    User,
    /// The copilot.
    Assistant,
}

/// One message of a copilot conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    /// Who wrote it.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
}

/// Orchestration layer for every team-facing operation.
///
/// Holds no state of its own: storage goes through [`TrackerStore`], text
/// through [`TextGenerator`]. Every method taking a [`TeamContext`] only
/// sees that team's rows; another team's entry is reported as not found.
#[derive(Debug, Clone)]
pub struct TrackerService {
    store: Arc<dyn TrackerStore>,
    generator: Arc<dyn TextGenerator>,
    sources: SourceRegistry,
}

impl TrackerService {
    /// Creates a new `TrackerService`.
    #[must_use]
    pub fn new(
        store: Arc<dyn TrackerStore>,
        generator: Arc<dyn TextGenerator>,
        sources: SourceRegistry,
    ) -> Self {
        Self {
            store,
            generator,
            sources,
        }
    }

    /// Returns a reference to the inner store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn TrackerStore> {
        &self.store
    }

    /// Returns a reference to the enabled ingestion sources.
    #[must_use]
    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    // ── Preferences ──────────────────────────────────────────────────

    /// The team's preferences, created with defaults on first access.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Persistence`] if storage fails.
    pub async fn preferences(&self, ctx: TeamContext) -> Result<TeamPreferences, TrackerError> {
        if let Some(prefs) = self.store.get_preferences(ctx.team_id).await? {
            return Ok(prefs);
        }
        let prefs = TeamPreferences::defaults_for(ctx.team_id);
        self.store.save_preferences(&prefs).await?;
        tracing::debug!(team_id = %ctx.team_id, "default preferences created");
        Ok(prefs)
    }

    /// Replaces the team's preferences.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidRequest`] when the input fails
    /// validation, or [`TrackerError::Persistence`] if storage fails.
    pub async fn update_preferences(
        &self,
        ctx: TeamContext,
        input: PreferencesInput,
    ) -> Result<TeamPreferences, TrackerError> {
        let prefs = input
            .into_preferences(ctx.team_id)
            .map_err(TrackerError::InvalidRequest)?;
        self.store.save_preferences(&prefs).await?;
        tracing::info!(team_id = %ctx.team_id, "preferences updated");
        Ok(prefs)
    }

    // ── Discovery & pipeline ─────────────────────────────────────────

    /// Upcoming hackathons scored for the team, in start-date order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Persistence`] if storage fails.
    pub async fn discover(&self, ctx: TeamContext) -> Result<Vec<ScoredHackathon>, TrackerError> {
        let now = Utc::now();
        let prefs = self.preferences(ctx).await?;
        let skills = team_skills(&self.store.list_members(ctx.team_id).await?);
        let hackathons = self
            .store
            .list_upcoming_hackathons(now, DISCOVERY_LIMIT)
            .await?;

        Ok(hackathons
            .into_iter()
            .map(|hackathon| {
                let priority_score = compute_priority_score(&hackathon, &prefs, &skills, now);
                ScoredHackathon {
                    hackathon,
                    priority_score,
                }
            })
            .collect())
    }

    /// Adds a hackathon to the team's pipeline, or re-scores it if it is
    /// already there.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] if the hackathon does not exist,
    /// or [`TrackerError::Persistence`] if storage fails.
    pub async fn add_to_pipeline(
        &self,
        ctx: TeamContext,
        hackathon_id: HackathonId,
    ) -> Result<TeamHackathon, TrackerError> {
        let hackathon = self
            .store
            .get_hackathon(hackathon_id)
            .await?
            .ok_or_else(|| TrackerError::NotFound(format!("hackathon {hackathon_id}")))?;
        let prefs = self.preferences(ctx).await?;
        let skills = team_skills(&self.store.list_members(ctx.team_id).await?);
        let score = compute_priority_score(&hackathon, &prefs, &skills, Utc::now());

        let entry = self
            .store
            .upsert_team_hackathon(ctx.team_id, hackathon_id, score)
            .await?;
        self.log(
            ctx,
            Some(entry.id),
            ActivityKind::TeamHackathonCreated {
                priority_score: score,
            },
        )
        .await?;

        tracing::info!(
            team_hackathon_id = %entry.id,
            hackathon_id = %hackathon_id,
            score,
            "hackathon added to pipeline"
        );
        Ok(entry)
    }

    /// The team's pipeline, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Persistence`] if storage fails.
    pub async fn list_pipeline(&self, ctx: TeamContext) -> Result<Vec<PipelineEntry>, TrackerError> {
        let entries = self.store.list_team_hackathons(ctx.team_id).await?;
        let mut joined = Vec::with_capacity(entries.len());
        for entry in entries {
            let hackathon = self.hackathon_of(&entry).await?;
            joined.push(PipelineEntry { entry, hackathon });
        }
        Ok(joined)
    }

    /// One pipeline entry with its hackathon and requirements.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] if the team has no such entry, or
    /// [`TrackerError::Persistence`] if storage fails.
    pub async fn get_pipeline_entry(
        &self,
        ctx: TeamContext,
        id: TeamHackathonId,
    ) -> Result<PipelineEntryDetail, TrackerError> {
        let entry = self.entry(ctx, id).await?;
        let hackathon = self.hackathon_of(&entry).await?;
        let requirements = self.store.list_requirements(id).await?;
        Ok(PipelineEntryDetail {
            entry,
            hackathon,
            requirements,
        })
    }

    /// Sets the status and/or past result of an entry.
    ///
    /// Moving to `SUBMITTED` and recording a win or shortlist are logged to
    /// the activity feed.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] if the team has no such entry, or
    /// [`TrackerError::Persistence`] if storage fails.
    pub async fn update_pipeline_entry(
        &self,
        ctx: TeamContext,
        id: TeamHackathonId,
        status: Option<PipelineStatus>,
        past_result: Option<PastResult>,
    ) -> Result<TeamHackathon, TrackerError> {
        let mut entry = self.entry(ctx, id).await?;
        if let Some(status) = status {
            entry.status = status;
        }
        if let Some(result) = past_result {
            entry.past_result = result;
        }
        entry.updated_at = Utc::now();
        self.store.update_team_hackathon(&entry).await?;

        if status == Some(PipelineStatus::Submitted) {
            self.log(ctx, Some(id), ActivityKind::StatusSubmitted).await?;
        }
        match past_result {
            Some(PastResult::Won) => self.log(ctx, Some(id), ActivityKind::StatusWon).await?,
            Some(PastResult::Shortlisted) => {
                self.log(ctx, Some(id), ActivityKind::StatusShortlisted)
                    .await?;
            }
            _ => {}
        }

        tracing::info!(
            team_hackathon_id = %id,
            status = %entry.status,
            past_result = %entry.past_result,
            "pipeline entry updated"
        );
        Ok(entry)
    }

    // ── Plan & tasks ─────────────────────────────────────────────────

    /// Builds the three-phase plan and replaces the entry's tasks with the
    /// generated catalog.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] if the team has no such entry, or
    /// [`TrackerError::Persistence`] if storage fails. On failure the old
    /// task list is left untouched.
    pub async fn generate_plan(
        &self,
        ctx: TeamContext,
        id: TeamHackathonId,
    ) -> Result<PlanOutcome, TrackerError> {
        let entry = self.entry(ctx, id).await?;
        let hackathon = self.hackathon_of(&entry).await?;
        let plan = build_plan(&hackathon, Utc::now());

        let tasks: Vec<Task> = generate_tasks(&plan)
            .into_iter()
            .map(|generated| Task {
                id: TaskId::new(),
                team_hackathon_id: id,
                title: generated.title,
                description: generated.description,
                category: generated.category,
                status: TaskStatus::Todo,
                due_at: Some(generated.due_at),
                assignee_user_id: None,
            })
            .collect();
        self.store.replace_tasks(id, &tasks).await?;
        self.log(
            ctx,
            Some(id),
            ActivityKind::PlanGenerated {
                phases: plan.phases.len(),
            },
        )
        .await?;

        let tasks = self.store.list_tasks(id).await?;
        tracing::info!(team_hackathon_id = %id, tasks = tasks.len(), "plan generated");
        Ok(PlanOutcome { plan, tasks })
    }

    /// Tasks of an entry, by due date with undated tasks last.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] if the team has no such entry, or
    /// [`TrackerError::Persistence`] if storage fails.
    pub async fn list_tasks(
        &self,
        ctx: TeamContext,
        id: TeamHackathonId,
    ) -> Result<Vec<Task>, TrackerError> {
        self.entry(ctx, id).await?;
        self.store.list_tasks(id).await
    }

    /// Applies a partial update to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] if the task does not belong to the
    /// team, or [`TrackerError::Persistence`] if storage fails.
    pub async fn update_task(
        &self,
        ctx: TeamContext,
        task_id: TaskId,
        patch: TaskPatch,
    ) -> Result<Task, TrackerError> {
        let mut task = self
            .store
            .get_task(ctx.team_id, task_id)
            .await?
            .ok_or_else(|| TrackerError::NotFound(format!("task {task_id}")))?;
        patch.apply(&mut task);
        self.store.update_task(&task).await?;

        if patch.status == Some(TaskStatus::Done) {
            self.log(
                ctx,
                Some(task.team_hackathon_id),
                ActivityKind::TaskCompleted { task_id },
            )
            .await?;
        }
        tracing::info!(task_id = %task_id, status = %task.status, "task updated");
        Ok(task)
    }

    // ── Requirements & submission ────────────────────────────────────

    /// Parses pasted rules text into a checklist and stores it as the
    /// entry's only requirement record.
    ///
    /// The text generator's reply is appended to the text before parsing,
    /// so items it mentions are picked up too.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] if the team has no such entry, or
    /// [`TrackerError::Persistence`] if storage fails.
    pub async fn parse_requirements(
        &self,
        ctx: TeamContext,
        id: TeamHackathonId,
        raw_text: String,
    ) -> Result<HackathonRequirement, TrackerError> {
        self.entry(ctx, id).await?;

        let context = PromptContext::new().with("rawText", &raw_text);
        let reply = self.generate(REQUIREMENTS_PROMPT, &context).await;
        let checklist = parse_checklist(&format!("{raw_text}\n{reply}"));

        let requirement = HackathonRequirement {
            id: RequirementId::new(),
            team_hackathon_id: id,
            raw_text,
            checklist,
        };
        self.store.replace_requirement(&requirement).await?;
        tracing::info!(
            team_hackathon_id = %id,
            items = requirement.checklist.len(),
            "requirements parsed"
        );
        Ok(requirement)
    }

    /// Overwrites the checklist of the entry's requirement record.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] if the team has no such entry or
    /// the entry has no requirements yet, or [`TrackerError::Persistence`]
    /// if storage fails.
    pub async fn update_checklist(
        &self,
        ctx: TeamContext,
        id: TeamHackathonId,
        checklist: Vec<ChecklistItem>,
    ) -> Result<HackathonRequirement, TrackerError> {
        self.entry(ctx, id).await?;
        let mut requirement = self
            .store
            .list_requirements(id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TrackerError::NotFound(format!("requirements of {id}")))?;
        self.store
            .update_checklist(requirement.id, &checklist)
            .await?;
        requirement.checklist = checklist;
        Ok(requirement)
    }

    /// The entry's project, if one was saved.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] if the team has no such entry, or
    /// [`TrackerError::Persistence`] if storage fails.
    pub async fn get_project(
        &self,
        ctx: TeamContext,
        id: TeamHackathonId,
    ) -> Result<Option<Project>, TrackerError> {
        self.entry(ctx, id).await?;
        self.store.get_project(id).await
    }

    /// Creates or replaces the entry's project.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] if the team has no such entry, or
    /// [`TrackerError::Persistence`] if storage fails.
    pub async fn upsert_project(
        &self,
        ctx: TeamContext,
        id: TeamHackathonId,
        input: ProjectInput,
    ) -> Result<Project, TrackerError> {
        self.entry(ctx, id).await?;
        let project = input.into_project(id);
        self.store.save_project(&project).await?;
        Ok(project)
    }

    /// Which checklist items the project does not cover yet.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] if the team has no such entry, or
    /// [`TrackerError::Persistence`] if storage fails.
    pub async fn submission_status(
        &self,
        ctx: TeamContext,
        id: TeamHackathonId,
    ) -> Result<SubmissionStatus, TrackerError> {
        self.entry(ctx, id).await?;
        let project = self.store.get_project(id).await?;
        let requirements = self.store.list_requirements(id).await?;
        Ok(validate_submission(project.as_ref(), &requirements))
    }

    // ── Alerts & analytics ───────────────────────────────────────────

    /// Alerts across the whole pipeline, computed fresh.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Persistence`] if storage fails.
    pub async fn alerts(&self, ctx: TeamContext) -> Result<Vec<Alert>, TrackerError> {
        let now = Utc::now();
        let mut alerts = Vec::new();
        for entry in self.store.list_team_hackathons(ctx.team_id).await? {
            let hackathon = self.hackathon_of(&entry).await?;
            let tasks = self.store.list_tasks(entry.id).await?;
            let requirements = self.store.list_requirements(entry.id).await?;
            alerts.extend(compute_alerts(
                AlertInput {
                    team_hackathon_id: entry.id,
                    hackathon: &hackathon,
                    tasks: &tasks,
                    requirements: &requirements,
                },
                now,
            ));
        }
        Ok(alerts)
    }

    /// Pipeline totals.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Persistence`] if storage fails.
    pub async fn analytics_overview(
        &self,
        ctx: TeamContext,
    ) -> Result<AnalyticsOverview, TrackerError> {
        let entries = self.store.list_team_hackathons(ctx.team_id).await?;
        Ok(analytics::overview(&entries))
    }

    /// Participation and wins per theme.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Persistence`] if storage fails.
    pub async fn analytics_themes(
        &self,
        ctx: TeamContext,
    ) -> Result<BTreeMap<String, ThemeStats>, TrackerError> {
        let joined: Vec<(TeamHackathon, Hackathon)> = self
            .list_pipeline(ctx)
            .await?
            .into_iter()
            .map(|p| (p.entry, p.hackathon))
            .collect();
        Ok(analytics::theme_breakdown(&joined))
    }

    /// Monthly participation over the last year.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Persistence`] if storage fails.
    pub async fn analytics_timeline(
        &self,
        ctx: TeamContext,
    ) -> Result<Vec<TimelinePoint>, TrackerError> {
        let entries = self.store.list_team_hackathons(ctx.team_id).await?;
        Ok(analytics::timeline(&entries, Utc::now()))
    }

    // ── Copilot ──────────────────────────────────────────────────────

    /// Answers a copilot conversation about one pipeline entry.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] if the team has no such entry, or
    /// [`TrackerError::Persistence`] if storage fails.
    pub async fn assistant_reply(
        &self,
        ctx: TeamContext,
        id: TeamHackathonId,
        messages: &[ChatMessage],
    ) -> Result<String, TrackerError> {
        let entry = self.entry(ctx, id).await?;
        let hackathon = self.hackathon_of(&entry).await?;
        let prefs = self.preferences(ctx).await?;
        let project = self.store.get_project(id).await?;
        let tasks = self.store.list_tasks(id).await?;

        let prompt = format!(
            "You are an AI assistant for the hackathon {}. Provide tactical guidance using the latest context.",
            hackathon.title
        );
        let context = PromptContext::new()
            .with("messages", messages)
            .with("hackathon", &hackathon)
            .with("preferences", &prefs)
            .with("project", &project)
            .with("tasks", &tasks);
        Ok(self.generate(&prompt, &context).await)
    }

    // ── Ingestion ────────────────────────────────────────────────────

    /// Runs every enabled source and upserts its events. A failing source
    /// is reported and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Persistence`] if storage fails.
    pub async fn sync_sources(&self) -> Result<SyncReport, TrackerError> {
        let now = Utc::now();
        let mut report = SyncReport {
            sources: self.sources.len(),
            ..SyncReport::default()
        };
        for source in self.sources.iter() {
            let events = match source.fetch_events(now).await {
                Ok(events) => events,
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "ingestion source failed");
                    report.failed.push(source.name().to_string());
                    continue;
                }
            };
            for event in events {
                self.store.upsert_hackathon(source.name(), event).await?;
                report.upserted += 1;
            }
        }
        tracing::info!(
            sources = report.sources,
            upserted = report.upserted,
            failed = report.failed.len(),
            "hackathon sync finished"
        );
        Ok(report)
    }

    // ── Helpers ──────────────────────────────────────────────────────

    async fn entry(
        &self,
        ctx: TeamContext,
        id: TeamHackathonId,
    ) -> Result<TeamHackathon, TrackerError> {
        self.store
            .get_team_hackathon(ctx.team_id, id)
            .await?
            .ok_or_else(|| TrackerError::NotFound(format!("team hackathon {id}")))
    }

    async fn hackathon_of(&self, entry: &TeamHackathon) -> Result<Hackathon, TrackerError> {
        self.store
            .get_hackathon(entry.hackathon_id)
            .await?
            .ok_or_else(|| TrackerError::NotFound(format!("hackathon {}", entry.hackathon_id)))
    }

    async fn generate(&self, prompt: &str, context: &PromptContext) -> String {
        match self.generator.generate(prompt, context).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "text generation failed, using stub reply");
                stub_reply(prompt, context)
            }
        }
    }

    async fn log(
        &self,
        ctx: TeamContext,
        team_hackathon_id: Option<TeamHackathonId>,
        kind: ActivityKind,
    ) -> Result<(), TrackerError> {
        let event = ActivityEvent::new(ctx.team_id, Some(ctx.user_id), team_hackathon_id, kind);
        self.store.append_activity(&event).await
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::{
        ChecklistKind, EventInput, LocationType, TeamId, TeamMember, UserId,
    };
    use crate::ingest::{DevfolioSource, DevpostSource, EventSource, IngestError};
    use crate::llm::LlmError;
    use crate::persistence::MemoryStore;
    use crate::planner::Severity;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration};

    /// Replies with a fixed text, or fails when `reply` is `None`.
    #[derive(Debug)]
    struct FixedGenerator {
        reply: Option<&'static str>,
    }

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _: &str, _: &PromptContext) -> Result<String, LlmError> {
            self.reply
                .map(str::to_string)
                .ok_or_else(|| LlmError::MalformedResponse("offline".to_string()))
        }
    }

    #[derive(Debug)]
    struct BrokenSource;

    #[async_trait]
    impl EventSource for BrokenSource {
        fn name(&self) -> &str {
            "broken"
        }

        async fn fetch_events(&self, _: DateTime<Utc>) -> Result<Vec<EventInput>, IngestError> {
            Err(IngestError {
                source_name: "broken".to_string(),
                message: "unreachable".to_string(),
            })
        }
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        service: TrackerService,
        ctx: TeamContext,
    }

    fn fixture(reply: Option<&'static str>) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let mut sources = SourceRegistry::new();
        sources.register(Arc::new(DevpostSource));
        sources.register(Arc::new(DevfolioSource));
        let service = TrackerService::new(
            Arc::clone(&store) as Arc<dyn TrackerStore>,
            Arc::new(FixedGenerator { reply }),
            sources,
        );
        Fixture {
            store,
            service,
            ctx: team(),
        }
    }

    fn team() -> TeamContext {
        TeamContext {
            user_id: UserId::new(),
            team_id: TeamId::new(),
        }
    }

    fn event(external_id: &str, themes: &[&str], start_in_days: i64) -> EventInput {
        let now = Utc::now();
        EventInput {
            external_id: external_id.to_string(),
            title: format!("Hack {external_id}"),
            url: format!("https://example.com/{external_id}"),
            start_date: Some(now + Duration::days(start_in_days)),
            end_date: Some(now + Duration::days(start_in_days + 3)),
            registration_deadline: None,
            prize_pool: Some(20_000.0),
            currency: Some("USD".to_string()),
            location_type: LocationType::Online,
            city: None,
            country: None,
            themes: themes.iter().map(|t| (*t).to_string()).collect(),
            timezone: None,
            raw_description: String::new(),
        }
    }

    async fn tracked(f: &Fixture, input: EventInput) -> TeamHackathon {
        let Ok(hackathon) = f.store.upsert_hackathon("devpost", input).await else {
            panic!("upsert hackathon");
        };
        let Ok(entry) = f.service.add_to_pipeline(f.ctx, hackathon.id).await else {
            panic!("add to pipeline");
        };
        entry
    }

    #[tokio::test]
    async fn discover_scores_with_preferences_and_skills() {
        let f = fixture(Some(""));
        let Ok(_) = f.store.upsert_hackathon("devpost", event("ai", &["AI"], 2)).await else {
            panic!("upsert");
        };
        let Ok(_) = f.store.upsert_hackathon("devpost", event("web", &["Web"], 30)).await else {
            panic!("upsert");
        };
        let member = TeamMember {
            id: f.ctx.user_id,
            team_id: f.ctx.team_id,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            skills: vec!["AI".to_string()],
        };
        let Ok(()) = f.store.save_member(&member).await else {
            panic!("save member");
        };

        let Ok(found) = f.service.discover(f.ctx).await else {
            panic!("discover");
        };
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].hackathon.external_id, "ai");
        assert!(found[0].priority_score > found[1].priority_score);

        let Ok(Some(prefs)) = f.store.get_preferences(f.ctx.team_id).await else {
            panic!("preferences should be created lazily");
        };
        assert_eq!(prefs.max_parallel_hackathons, 1);
    }

    #[tokio::test]
    async fn adding_twice_keeps_one_entry_and_logs_each_time() {
        let f = fixture(Some(""));
        let first = tracked(&f, event("ai", &["AI"], 5)).await;
        let Ok(second) = f.service.add_to_pipeline(f.ctx, first.hackathon_id).await else {
            panic!("re-add");
        };
        assert_eq!(first.id, second.id);
        assert_eq!(second.status, PipelineStatus::Watching);

        let Ok(pipeline) = f.service.list_pipeline(f.ctx).await else {
            panic!("list");
        };
        assert_eq!(pipeline.len(), 1);
        let created = f
            .store
            .activity()
            .await
            .iter()
            .filter(|e| e.kind.event_type_str() == "team_hackathon_created")
            .count();
        assert_eq!(created, 2);
    }

    #[tokio::test]
    async fn unknown_hackathon_is_not_found() {
        let f = fixture(Some(""));
        let result = f.service.add_to_pipeline(f.ctx, HackathonId::new()).await;
        assert!(matches!(result, Err(TrackerError::NotFound(_))));
    }

    #[tokio::test]
    async fn generate_plan_replaces_tasks() {
        let f = fixture(Some(""));
        let entry = tracked(&f, event("ai", &["AI"], 1)).await;

        let Ok(first) = f.service.generate_plan(f.ctx, entry.id).await else {
            panic!("first plan");
        };
        assert_eq!(first.tasks.len(), 8);
        let Ok(second) = f.service.generate_plan(f.ctx, entry.id).await else {
            panic!("second plan");
        };
        assert_eq!(second.tasks.len(), 8);
        assert!(first.tasks.iter().all(|t| second.tasks.iter().all(|s| s.id != t.id)));

        let Ok(listed) = f.service.list_tasks(f.ctx, entry.id).await else {
            panic!("list tasks");
        };
        assert_eq!(listed, second.tasks);
        assert!(listed.iter().all(|t| t.status == TaskStatus::Todo));
        assert!(listed.windows(2).all(|w| w[0].due_at <= w[1].due_at));
    }

    #[tokio::test]
    async fn completing_a_task_is_logged() {
        let f = fixture(Some(""));
        let entry = tracked(&f, event("ai", &["AI"], 1)).await;
        let Ok(plan) = f.service.generate_plan(f.ctx, entry.id).await else {
            panic!("plan");
        };
        let task_id = plan.tasks[0].id;
        let patch = TaskPatch {
            status: Some(TaskStatus::Done),
            ..TaskPatch::default()
        };
        let Ok(task) = f.service.update_task(f.ctx, task_id, patch).await else {
            panic!("update task");
        };
        assert_eq!(task.status, TaskStatus::Done);
        let logged = f
            .store
            .activity()
            .await
            .iter()
            .any(|e| e.kind == ActivityKind::TaskCompleted { task_id });
        assert!(logged);
    }

    #[tokio::test]
    async fn other_teams_see_nothing() {
        let f = fixture(Some(""));
        let entry = tracked(&f, event("ai", &["AI"], 1)).await;
        let Ok(plan) = f.service.generate_plan(f.ctx, entry.id).await else {
            panic!("plan");
        };
        let intruder = team();

        assert!(matches!(
            f.service.get_pipeline_entry(intruder, entry.id).await,
            Err(TrackerError::NotFound(_))
        ));
        assert!(matches!(
            f.service.list_tasks(intruder, entry.id).await,
            Err(TrackerError::NotFound(_))
        ));
        assert!(matches!(
            f.service
                .update_task(intruder, plan.tasks[0].id, TaskPatch::default())
                .await,
            Err(TrackerError::NotFound(_))
        ));
        let Ok(pipeline) = f.service.list_pipeline(intruder).await else {
            panic!("list");
        };
        assert!(pipeline.is_empty());
    }

    #[tokio::test]
    async fn status_milestones_are_logged() {
        let f = fixture(Some(""));
        let entry = tracked(&f, event("ai", &["AI"], 1)).await;
        let Ok(updated) = f
            .service
            .update_pipeline_entry(
                f.ctx,
                entry.id,
                Some(PipelineStatus::Submitted),
                Some(PastResult::Won),
            )
            .await
        else {
            panic!("update entry");
        };
        assert_eq!(updated.status, PipelineStatus::Submitted);
        assert_eq!(updated.past_result, PastResult::Won);

        let kinds: Vec<&'static str> = f
            .store
            .activity()
            .await
            .iter()
            .map(|e| e.kind.event_type_str())
            .collect();
        assert!(kinds.contains(&"status_submitted"));
        assert!(kinds.contains(&"status_won"));

        let Ok(overview) = f.service.analytics_overview(f.ctx).await else {
            panic!("overview");
        };
        assert_eq!((overview.total, overview.submitted, overview.won), (1, 1, 1));
        let Ok(themes) = f.service.analytics_themes(f.ctx).await else {
            panic!("themes");
        };
        assert_eq!(
            themes.get("AI"),
            Some(&ThemeStats {
                participated: 1,
                won: 1
            })
        );
        let Ok(timeline) = f.service.analytics_timeline(f.ctx).await else {
            panic!("timeline");
        };
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].won, 1);
    }

    #[tokio::test]
    async fn parse_requirements_merges_the_generated_reply() {
        let f = fixture(Some("Teams must also upload slides."));
        let entry = tracked(&f, event("ai", &["AI"], 1)).await;
        let Ok(requirement) = f
            .service
            .parse_requirements(f.ctx, entry.id, "Submit your GitHub repo".to_string())
            .await
        else {
            panic!("parse");
        };
        let kinds: Vec<ChecklistKind> = requirement.checklist.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![ChecklistKind::Github, ChecklistKind::Deck]);

        let Ok(again) = f
            .service
            .parse_requirements(f.ctx, entry.id, "Record a demo video".to_string())
            .await
        else {
            panic!("parse again");
        };
        let Ok(detail) = f.service.get_pipeline_entry(f.ctx, entry.id).await else {
            panic!("detail");
        };
        assert_eq!(detail.requirements, vec![again]);
    }

    #[tokio::test]
    async fn generator_failure_falls_back_to_stub() {
        let f = fixture(None);
        let entry = tracked(&f, event("ai", &["AI"], 1)).await;
        let Ok(requirement) = f
            .service
            .parse_requirements(f.ctx, entry.id, "Nothing specific".to_string())
            .await
        else {
            panic!("parse");
        };
        assert_eq!(requirement.checklist.len(), 1);
        assert_eq!(requirement.checklist[0].kind, ChecklistKind::General);

        let messages = [ChatMessage {
            role: ChatRole::User,
            content: "What next?".to_string(),
        }];
        let Ok(reply) = f.service.assistant_reply(f.ctx, entry.id, &messages).await else {
            panic!("assistant");
        };
        assert!(reply.starts_with("[STUB MODE]"));
        assert!(reply.contains("Hack ai"));
    }

    #[tokio::test]
    async fn checklist_updates_drive_submission_status_and_alerts() {
        let f = fixture(Some(""));
        let entry = tracked(&f, event("ai", &["AI"], 0)).await;
        assert!(matches!(
            f.service.update_checklist(f.ctx, entry.id, Vec::new()).await,
            Err(TrackerError::NotFound(_))
        ));

        let Ok(requirement) = f
            .service
            .parse_requirements(f.ctx, entry.id, "GitHub repo and pitch deck".to_string())
            .await
        else {
            panic!("parse");
        };
        let Ok(status) = f.service.submission_status(f.ctx, entry.id).await else {
            panic!("status");
        };
        assert_eq!(status.missing.len(), 2);

        let input = ProjectInput {
            github_repo_url: Some("https://github.com/acme/app".to_string()),
            ..ProjectInput::default()
        };
        let Ok(project) = f.service.upsert_project(f.ctx, entry.id, input).await else {
            panic!("project");
        };
        assert_eq!(project.name, "Untitled project");
        let Ok(status) = f.service.submission_status(f.ctx, entry.id).await else {
            panic!("status");
        };
        assert_eq!(status.missing, vec!["Pitch deck URL"]);

        let Ok(alerts) = f.service.alerts(f.ctx).await else {
            panic!("alerts");
        };
        assert!(alerts.iter().all(|a| a.severity != Severity::Critical));
        assert!(alerts.iter().any(|a| a.severity == Severity::Info));

        let done: Vec<ChecklistItem> = requirement
            .checklist
            .iter()
            .cloned()
            .map(|item| ChecklistItem {
                completed: true,
                ..item
            })
            .collect();
        let Ok(updated) = f.service.update_checklist(f.ctx, entry.id, done).await else {
            panic!("update checklist");
        };
        assert!(!updated.has_open_items());
        let Ok(alerts) = f.service.alerts(f.ctx).await else {
            panic!("alerts");
        };
        assert!(alerts.is_empty());
    }

    #[tokio::test]
    async fn invalid_preferences_are_rejected() {
        let f = fixture(Some(""));
        let input = PreferencesInput {
            max_parallel_hackathons: Some(0),
            ..PreferencesInput::default()
        };
        assert!(matches!(
            f.service.update_preferences(f.ctx, input).await,
            Err(TrackerError::InvalidRequest(_))
        ));

        let input = PreferencesInput {
            preferred_themes: Some(vec!["Climate".to_string()]),
            max_parallel_hackathons: Some(2),
            ..PreferencesInput::default()
        };
        let Ok(saved) = f.service.update_preferences(f.ctx, input).await else {
            panic!("valid preferences");
        };
        let Ok(loaded) = f.service.preferences(f.ctx).await else {
            panic!("load");
        };
        assert_eq!(saved, loaded);
    }

    #[tokio::test]
    async fn sync_is_idempotent_and_skips_failing_sources() {
        let f = fixture(Some(""));
        let Ok(first) = f.service.sync_sources().await else {
            panic!("sync");
        };
        assert_eq!(first.sources, 2);
        assert!(first.failed.is_empty());
        let Ok(_) = f.service.sync_sources().await else {
            panic!("sync again");
        };
        let Ok(upcoming) = f
            .store
            .list_upcoming_hackathons(Utc::now(), DISCOVERY_LIMIT)
            .await
        else {
            panic!("upcoming");
        };
        assert_eq!(upcoming.len(), first.upserted);

        let mut sources = SourceRegistry::new();
        sources.register(Arc::new(BrokenSource));
        sources.register(Arc::new(DevpostSource));
        let service = TrackerService::new(
            Arc::clone(&f.store) as Arc<dyn TrackerStore>,
            Arc::new(FixedGenerator { reply: None }),
            sources,
        );
        let Ok(report) = service.sync_sources().await else {
            panic!("partial sync");
        };
        assert_eq!(report.failed, vec!["broken"]);
        assert_eq!(report.upserted, 1);
    }
}
