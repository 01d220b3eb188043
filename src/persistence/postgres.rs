//! PostgreSQL implementation of [`TrackerStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;

use super::TrackerStore;
use super::models::{
    HackathonRow, MemberRow, PreferencesRow, ProjectRow, RequirementRow, TaskRow,
    TeamHackathonRow,
};
use crate::config::TrackerConfig;
use crate::domain::{
    ActivityEvent, ChecklistItem, EventInput, Hackathon, HackathonId, HackathonRequirement,
    PastResult, PipelineStatus, Project, RequirementId, Task, TaskId, TeamHackathon,
    TeamHackathonId, TeamId, TeamMember, TeamPreferences,
};
use crate::error::TrackerError;

const HACKATHON_COLUMNS: &str = "id, platform, external_id, title, url, start_date, end_date, \
     registration_deadline, prize_pool, currency, location_type, city, country, timezone, \
     themes, raw_description";

const TEAM_HACKATHON_COLUMNS: &str =
    "id, team_id, hackathon_id, status, past_result, priority_score, created_at, updated_at";

const TASK_COLUMNS: &str =
    "id, team_hackathon_id, title, description, category, status, due_at, assignee_user_id";

fn db_err(e: sqlx::Error) -> TrackerError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() || db.is_foreign_key_violation() => {
            TrackerError::Conflict(db.message().to_string())
        }
        _ => TrackerError::Persistence(e.to_string()),
    }
}

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects with the pool settings from `config` and runs the embedded
    /// migrations.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Persistence`] if the database is unreachable
    /// or a migration fails.
    pub async fn connect(config: &TrackerConfig) -> Result<Self, TrackerError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(std::time::Duration::from_secs(
                config.database_connect_timeout_secs,
            ))
            .connect(&config.database_url)
            .await
            .map_err(db_err)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| TrackerError::Persistence(format!("migration failed: {e}")))?;

        tracing::info!("database connected and migrated");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl TrackerStore for PostgresStore {
    async fn get_preferences(
        &self,
        team_id: TeamId,
    ) -> Result<Option<TeamPreferences>, TrackerError> {
        let row = sqlx::query_as::<_, PreferencesRow>(
            "SELECT team_id, preferred_themes, min_prize_amount, location_preference, \
             max_parallel_hackathons FROM team_preferences WHERE team_id = $1",
        )
        .bind(*team_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(TeamPreferences::try_from).transpose()
    }

    async fn save_preferences(&self, prefs: &TeamPreferences) -> Result<(), TrackerError> {
        sqlx::query(
            "INSERT INTO team_preferences (team_id, preferred_themes, min_prize_amount, \
             location_preference, max_parallel_hackathons) VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (team_id) DO UPDATE SET preferred_themes = EXCLUDED.preferred_themes, \
             min_prize_amount = EXCLUDED.min_prize_amount, \
             location_preference = EXCLUDED.location_preference, \
             max_parallel_hackathons = EXCLUDED.max_parallel_hackathons",
        )
        .bind(*prefs.team_id.as_uuid())
        .bind(&prefs.preferred_themes)
        .bind(prefs.min_prize_amount)
        .bind(prefs.location_preference.as_str())
        .bind(prefs.max_parallel_hackathons)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn list_members(&self, team_id: TeamId) -> Result<Vec<TeamMember>, TrackerError> {
        let rows = sqlx::query_as::<_, MemberRow>(
            "SELECT id, team_id, name, email, skills FROM users \
             WHERE team_id = $1 ORDER BY created_at ASC",
        )
        .bind(*team_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(TeamMember::from).collect())
    }

    async fn save_member(&self, member: &TeamMember) -> Result<(), TrackerError> {
        sqlx::query(
            "INSERT INTO users (id, team_id, name, email, skills) VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET team_id = EXCLUDED.team_id, name = EXCLUDED.name, \
             email = EXCLUDED.email, skills = EXCLUDED.skills",
        )
        .bind(*member.id.as_uuid())
        .bind(*member.team_id.as_uuid())
        .bind(&member.name)
        .bind(&member.email)
        .bind(&member.skills)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn upsert_hackathon(
        &self,
        platform: &str,
        input: EventInput,
    ) -> Result<Hackathon, TrackerError> {
        let sql = format!(
            "INSERT INTO hackathons (id, platform, external_id, title, url, start_date, end_date, \
             registration_deadline, prize_pool, currency, location_type, city, country, timezone, \
             themes, raw_description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             ON CONFLICT (platform, external_id) DO UPDATE SET title = EXCLUDED.title, \
             url = EXCLUDED.url, start_date = EXCLUDED.start_date, end_date = EXCLUDED.end_date, \
             registration_deadline = EXCLUDED.registration_deadline, \
             prize_pool = EXCLUDED.prize_pool, currency = EXCLUDED.currency, \
             location_type = EXCLUDED.location_type, city = EXCLUDED.city, \
             country = EXCLUDED.country, timezone = EXCLUDED.timezone, themes = EXCLUDED.themes, \
             raw_description = EXCLUDED.raw_description, updated_at = NOW() \
             RETURNING {HACKATHON_COLUMNS}"
        );
        let row = sqlx::query_as::<_, HackathonRow>(&sql)
            .bind(*HackathonId::new().as_uuid())
            .bind(platform)
            .bind(&input.external_id)
            .bind(&input.title)
            .bind(&input.url)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.registration_deadline)
            .bind(input.prize_pool)
            .bind(&input.currency)
            .bind(input.location_type.as_str())
            .bind(&input.city)
            .bind(&input.country)
            .bind(&input.timezone)
            .bind(&input.themes)
            .bind(&input.raw_description)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        Hackathon::try_from(row)
    }

    async fn get_hackathon(&self, id: HackathonId) -> Result<Option<Hackathon>, TrackerError> {
        let sql = format!("SELECT {HACKATHON_COLUMNS} FROM hackathons WHERE id = $1");
        let row = sqlx::query_as::<_, HackathonRow>(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(Hackathon::try_from).transpose()
    }

    async fn list_upcoming_hackathons(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Hackathon>, TrackerError> {
        let sql = format!(
            "SELECT {HACKATHON_COLUMNS} FROM hackathons \
             WHERE start_date >= $1 OR registration_deadline >= $1 \
             ORDER BY start_date ASC NULLS LAST LIMIT $2"
        );
        let rows = sqlx::query_as::<_, HackathonRow>(&sql)
            .bind(now)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.into_iter().map(Hackathon::try_from).collect()
    }

    async fn upsert_team_hackathon(
        &self,
        team_id: TeamId,
        hackathon_id: HackathonId,
        priority_score: f64,
    ) -> Result<TeamHackathon, TrackerError> {
        let sql = format!(
            "INSERT INTO team_hackathons (id, team_id, hackathon_id, status, past_result, \
             priority_score) VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (team_id, hackathon_id) DO UPDATE SET \
             priority_score = EXCLUDED.priority_score, updated_at = NOW() \
             RETURNING {TEAM_HACKATHON_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TeamHackathonRow>(&sql)
            .bind(*TeamHackathonId::new().as_uuid())
            .bind(*team_id.as_uuid())
            .bind(*hackathon_id.as_uuid())
            .bind(PipelineStatus::Watching.as_str())
            .bind(PastResult::None.as_str())
            .bind(priority_score)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        TeamHackathon::try_from(row)
    }

    async fn list_team_hackathons(
        &self,
        team_id: TeamId,
    ) -> Result<Vec<TeamHackathon>, TrackerError> {
        let sql = format!(
            "SELECT {TEAM_HACKATHON_COLUMNS} FROM team_hackathons \
             WHERE team_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, TeamHackathonRow>(&sql)
            .bind(*team_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.into_iter().map(TeamHackathon::try_from).collect()
    }

    async fn get_team_hackathon(
        &self,
        team_id: TeamId,
        id: TeamHackathonId,
    ) -> Result<Option<TeamHackathon>, TrackerError> {
        let sql = format!(
            "SELECT {TEAM_HACKATHON_COLUMNS} FROM team_hackathons WHERE id = $1 AND team_id = $2"
        );
        let row = sqlx::query_as::<_, TeamHackathonRow>(&sql)
            .bind(*id.as_uuid())
            .bind(*team_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(TeamHackathon::try_from).transpose()
    }

    async fn update_team_hackathon(&self, entry: &TeamHackathon) -> Result<(), TrackerError> {
        sqlx::query(
            "UPDATE team_hackathons SET status = $1, past_result = $2, priority_score = $3, \
             updated_at = $4 WHERE id = $5 AND team_id = $6",
        )
        .bind(entry.status.as_str())
        .bind(entry.past_result.as_str())
        .bind(entry.priority_score)
        .bind(entry.updated_at)
        .bind(*entry.id.as_uuid())
        .bind(*entry.team_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn replace_tasks(
        &self,
        team_hackathon_id: TeamHackathonId,
        tasks: &[Task],
    ) -> Result<(), TrackerError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("DELETE FROM tasks WHERE team_hackathon_id = $1")
            .bind(*team_hackathon_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        for task in tasks {
            sqlx::query(
                "INSERT INTO tasks (id, team_hackathon_id, title, description, category, status, \
                 due_at, assignee_user_id) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(*task.id.as_uuid())
            .bind(*team_hackathon_id.as_uuid())
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.category.as_str())
            .bind(task.status.as_str())
            .bind(task.due_at)
            .bind(task.assignee_user_id.map(uuid::Uuid::from))
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn list_tasks(
        &self,
        team_hackathon_id: TeamHackathonId,
    ) -> Result<Vec<Task>, TrackerError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE team_hackathon_id = $1 \
             ORDER BY due_at ASC NULLS LAST, created_at ASC"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(*team_hackathon_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn get_task(&self, team_id: TeamId, id: TaskId) -> Result<Option<Task>, TrackerError> {
        let row = sqlx::query_as::<_, TaskRow>(
            "SELECT t.id, t.team_hackathon_id, t.title, t.description, t.category, t.status, \
             t.due_at, t.assignee_user_id FROM tasks t \
             JOIN team_hackathons th ON th.id = t.team_hackathon_id \
             WHERE t.id = $1 AND th.team_id = $2",
        )
        .bind(*id.as_uuid())
        .bind(*team_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(Task::try_from).transpose()
    }

    async fn update_task(&self, task: &Task) -> Result<(), TrackerError> {
        sqlx::query(
            "UPDATE tasks SET status = $1, due_at = $2, assignee_user_id = $3 WHERE id = $4",
        )
        .bind(task.status.as_str())
        .bind(task.due_at)
        .bind(task.assignee_user_id.map(uuid::Uuid::from))
        .bind(*task.id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn list_requirements(
        &self,
        team_hackathon_id: TeamHackathonId,
    ) -> Result<Vec<HackathonRequirement>, TrackerError> {
        let rows = sqlx::query_as::<_, RequirementRow>(
            "SELECT id, team_hackathon_id, raw_text, checklist FROM hackathon_requirements \
             WHERE team_hackathon_id = $1 ORDER BY created_at ASC",
        )
        .bind(*team_hackathon_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(HackathonRequirement::from).collect())
    }

    async fn replace_requirement(
        &self,
        requirement: &HackathonRequirement,
    ) -> Result<(), TrackerError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("DELETE FROM hackathon_requirements WHERE team_hackathon_id = $1")
            .bind(*requirement.team_hackathon_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        sqlx::query(
            "INSERT INTO hackathon_requirements (id, team_hackathon_id, raw_text, checklist) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(*requirement.id.as_uuid())
        .bind(*requirement.team_hackathon_id.as_uuid())
        .bind(&requirement.raw_text)
        .bind(Json(&requirement.checklist))
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn update_checklist(
        &self,
        requirement_id: RequirementId,
        checklist: &[ChecklistItem],
    ) -> Result<(), TrackerError> {
        sqlx::query("UPDATE hackathon_requirements SET checklist = $1 WHERE id = $2")
            .bind(Json(checklist))
            .bind(*requirement_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn get_project(
        &self,
        team_hackathon_id: TeamHackathonId,
    ) -> Result<Option<Project>, TrackerError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            "SELECT team_hackathon_id, name, short_description, tech_stack, github_repo_url, \
             demo_url, pitch_deck_url, cover_image_url FROM projects WHERE team_hackathon_id = $1",
        )
        .bind(*team_hackathon_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Project::from))
    }

    async fn save_project(&self, project: &Project) -> Result<(), TrackerError> {
        sqlx::query(
            "INSERT INTO projects (team_hackathon_id, name, short_description, tech_stack, \
             github_repo_url, demo_url, pitch_deck_url, cover_image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (team_hackathon_id) DO UPDATE SET name = EXCLUDED.name, \
             short_description = EXCLUDED.short_description, tech_stack = EXCLUDED.tech_stack, \
             github_repo_url = EXCLUDED.github_repo_url, demo_url = EXCLUDED.demo_url, \
             pitch_deck_url = EXCLUDED.pitch_deck_url, cover_image_url = EXCLUDED.cover_image_url, \
             updated_at = NOW()",
        )
        .bind(*project.team_hackathon_id.as_uuid())
        .bind(&project.name)
        .bind(&project.short_description)
        .bind(&project.tech_stack)
        .bind(&project.github_repo_url)
        .bind(&project.demo_url)
        .bind(&project.pitch_deck_url)
        .bind(&project.cover_image_url)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn append_activity(&self, event: &ActivityEvent) -> Result<(), TrackerError> {
        sqlx::query(
            "INSERT INTO activity_log (team_id, user_id, team_hackathon_id, event_type, metadata, \
             created_at) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(*event.team_id.as_uuid())
        .bind(event.user_id.map(uuid::Uuid::from))
        .bind(event.team_hackathon_id.map(uuid::Uuid::from))
        .bind(event.kind.event_type_str())
        .bind(event.kind.metadata())
        .bind(event.timestamp)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}
