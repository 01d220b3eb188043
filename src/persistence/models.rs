//! Database row types and their conversion into domain entities.
//!
//! Enum columns are stored as text in their wire form (`WATCHING`,
//! `ideation`, ...). A value that fails to parse surfaces as a
//! [`TrackerError::Persistence`].

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::{
    ChecklistItem, Hackathon, HackathonRequirement, Project, Task, TeamHackathon, TeamMember,
    TeamPreferences,
};
use crate::error::TrackerError;

fn parse_column<T: FromStr<Err = String>>(value: &str) -> Result<T, TrackerError> {
    value.parse().map_err(TrackerError::Persistence)
}

/// A row of `team_preferences`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PreferencesRow {
    /// Owning team.
    pub team_id: Uuid,
    /// Preferred themes.
    pub preferred_themes: Vec<String>,
    /// Minimum prize pool.
    pub min_prize_amount: Option<f64>,
    /// `ONLINE_ONLY`, `OFFLINE_ONLY` or `BOTH`.
    pub location_preference: String,
    /// Parallel hackathon limit.
    pub max_parallel_hackathons: i32,
}

impl TryFrom<PreferencesRow> for TeamPreferences {
    type Error = TrackerError;

    fn try_from(row: PreferencesRow) -> Result<Self, Self::Error> {
        Ok(Self {
            team_id: row.team_id.into(),
            preferred_themes: row.preferred_themes,
            min_prize_amount: row.min_prize_amount,
            location_preference: parse_column(&row.location_preference)?,
            max_parallel_hackathons: row.max_parallel_hackathons,
        })
    }
}

/// A row of `users`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemberRow {
    /// User id.
    pub id: Uuid,
    /// Team id.
    pub team_id: Uuid,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Skills.
    pub skills: Vec<String>,
}

impl From<MemberRow> for TeamMember {
    fn from(row: MemberRow) -> Self {
        Self {
            id: row.id.into(),
            team_id: row.team_id.into(),
            name: row.name,
            email: row.email,
            skills: row.skills,
        }
    }
}

/// A row of `hackathons`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HackathonRow {
    /// Hackathon id.
    pub id: Uuid,
    /// Source platform.
    pub platform: String,
    /// Id on the source platform.
    pub external_id: String,
    /// Title.
    pub title: String,
    /// Event page.
    pub url: String,
    /// Start.
    pub start_date: Option<DateTime<Utc>>,
    /// End.
    pub end_date: Option<DateTime<Utc>>,
    /// Registration deadline.
    pub registration_deadline: Option<DateTime<Utc>>,
    /// Prize pool.
    pub prize_pool: Option<f64>,
    /// Prize currency.
    pub currency: Option<String>,
    /// `ONLINE`, `OFFLINE` or `HYBRID`.
    pub location_type: String,
    /// City.
    pub city: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Timezone.
    pub timezone: Option<String>,
    /// Themes.
    pub themes: Vec<String>,
    /// Description.
    pub raw_description: String,
}

impl TryFrom<HackathonRow> for Hackathon {
    type Error = TrackerError;

    fn try_from(row: HackathonRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            platform: row.platform,
            external_id: row.external_id,
            title: row.title,
            url: row.url,
            start_date: row.start_date,
            end_date: row.end_date,
            registration_deadline: row.registration_deadline,
            prize_pool: row.prize_pool,
            currency: row.currency,
            location_type: parse_column(&row.location_type)?,
            city: row.city,
            country: row.country,
            timezone: row.timezone,
            themes: row.themes,
            raw_description: row.raw_description,
        })
    }
}

/// A row of `team_hackathons`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TeamHackathonRow {
    /// Entry id.
    pub id: Uuid,
    /// Team id.
    pub team_id: Uuid,
    /// Hackathon id.
    pub hackathon_id: Uuid,
    /// Pipeline status.
    pub status: String,
    /// Past result.
    pub past_result: String,
    /// Priority score.
    pub priority_score: f64,
    /// Created.
    pub created_at: DateTime<Utc>,
    /// Updated.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TeamHackathonRow> for TeamHackathon {
    type Error = TrackerError;

    fn try_from(row: TeamHackathonRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            team_id: row.team_id.into(),
            hackathon_id: row.hackathon_id.into(),
            status: parse_column(&row.status)?,
            past_result: parse_column(&row.past_result)?,
            priority_score: row.priority_score,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A row of `tasks`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskRow {
    /// Task id.
    pub id: Uuid,
    /// Entry id.
    pub team_hackathon_id: Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// `ideation`, `build` or `polish`.
    pub category: String,
    /// Task status.
    pub status: String,
    /// Due date.
    pub due_at: Option<DateTime<Utc>>,
    /// Assignee.
    pub assignee_user_id: Option<Uuid>,
}

impl TryFrom<TaskRow> for Task {
    type Error = TrackerError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            team_hackathon_id: row.team_hackathon_id.into(),
            title: row.title,
            description: row.description,
            category: parse_column(&row.category)?,
            status: parse_column(&row.status)?,
            due_at: row.due_at,
            assignee_user_id: row.assignee_user_id.map(Into::into),
        })
    }
}

/// A row of `hackathon_requirements`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RequirementRow {
    /// Requirement id.
    pub id: Uuid,
    /// Entry id.
    pub team_hackathon_id: Uuid,
    /// Source text.
    pub raw_text: String,
    /// Checklist as JSONB.
    pub checklist: Json<Vec<ChecklistItem>>,
}

impl From<RequirementRow> for HackathonRequirement {
    fn from(row: RequirementRow) -> Self {
        Self {
            id: row.id.into(),
            team_hackathon_id: row.team_hackathon_id.into(),
            raw_text: row.raw_text,
            checklist: row.checklist.0,
        }
    }
}

/// A row of `projects`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectRow {
    /// Entry id (primary key).
    pub team_hackathon_id: Uuid,
    /// Name.
    pub name: String,
    /// Pitch.
    pub short_description: String,
    /// Technologies.
    pub tech_stack: Vec<String>,
    /// Repository URL.
    pub github_repo_url: Option<String>,
    /// Demo URL.
    pub demo_url: Option<String>,
    /// Deck URL.
    pub pitch_deck_url: Option<String>,
    /// Cover URL.
    pub cover_image_url: Option<String>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            team_hackathon_id: row.team_hackathon_id.into(),
            name: row.name,
            short_description: row.short_description,
            tech_stack: row.tech_stack,
            github_repo_url: row.github_repo_url,
            demo_url: row.demo_url,
            pitch_deck_url: row.pitch_deck_url,
            cover_image_url: row.cover_image_url,
        }
    }
}
