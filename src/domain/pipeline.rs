//! A team's pipeline entry for one hackathon.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{HackathonId, TeamHackathonId, TeamId};

/// Where a team stands with a hackathon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStatus {
    /// Added to the pipeline, no commitment yet.
    #[default]
    Watching,
    /// Team has registered.
    Registered,
    /// Team is building.
    Building,
    /// Project submitted.
    Submitted,
    /// Team decided not to take part.
    Skipped,
}

impl PipelineStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Watching => "WATCHING",
            Self::Registered => "REGISTERED",
            Self::Building => "BUILDING",
            Self::Submitted => "SUBMITTED",
            Self::Skipped => "SKIPPED",
        }
    }

    /// `true` once the team has gone beyond watching and did not skip.
    #[must_use]
    pub const fn is_participating(&self) -> bool {
        !matches!(self, Self::Watching | Self::Skipped)
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WATCHING" => Ok(Self::Watching),
            "REGISTERED" => Ok(Self::Registered),
            "BUILDING" => Ok(Self::Building),
            "SUBMITTED" => Ok(Self::Submitted),
            "SKIPPED" => Ok(Self::Skipped),
            other => Err(format!("unknown pipeline status: {other}")),
        }
    }
}

/// Outcome of a finished hackathon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PastResult {
    /// No result recorded.
    #[default]
    None,
    /// Won a prize.
    Won,
    /// Reached the shortlist.
    Shortlisted,
    /// Took part without placing.
    Participated,
}

impl PastResult {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Won => "WON",
            Self::Shortlisted => "SHORTLISTED",
            Self::Participated => "PARTICIPATED",
        }
    }
}

impl fmt::Display for PastResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PastResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(Self::None),
            "WON" => Ok(Self::Won),
            "SHORTLISTED" => Ok(Self::Shortlisted),
            "PARTICIPATED" => Ok(Self::Participated),
            other => Err(format!("unknown past result: {other}")),
        }
    }
}

/// Join of a team and a hackathon. `(team_id, hackathon_id)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TeamHackathon {
    /// Entry identifier.
    pub id: TeamHackathonId,
    /// Owning team.
    pub team_id: TeamId,
    /// Tracked hackathon.
    pub hackathon_id: HackathonId,
    /// Current pipeline status.
    pub status: PipelineStatus,
    /// Recorded outcome.
    pub past_result: PastResult,
    /// Priority score computed when the entry was (re)added.
    pub priority_score: f64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TeamHackathon {
    /// New `WATCHING` entry with the given score.
    #[must_use]
    pub fn new(team_id: TeamId, hackathon_id: HackathonId, priority_score: f64) -> Self {
        let now = Utc::now();
        Self {
            id: TeamHackathonId::new(),
            team_id,
            hackathon_id,
            status: PipelineStatus::Watching,
            past_result: PastResult::None,
            priority_score,
            created_at: now,
            updated_at: now,
        }
    }
}
