//! Team preferences and members.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{TeamId, UserId};

/// Which event formats a team is willing to attend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationPreference {
    /// Remote events only; offline events are penalised.
    OnlineOnly,
    /// In-person events only; online events are penalised.
    OfflineOnly,
    /// No preference.
    #[default]
    Both,
}

impl LocationPreference {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OnlineOnly => "ONLINE_ONLY",
            Self::OfflineOnly => "OFFLINE_ONLY",
            Self::Both => "BOTH",
        }
    }
}

impl fmt::Display for LocationPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ONLINE_ONLY" => Ok(Self::OnlineOnly),
            "OFFLINE_ONLY" => Ok(Self::OfflineOnly),
            "BOTH" => Ok(Self::Both),
            other => Err(format!("unknown location preference: {other}")),
        }
    }
}

/// Scoring preferences of a team. Exactly one record per team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TeamPreferences {
    /// Owning team.
    pub team_id: TeamId,
    /// Themes the team wants to work on (matched case-insensitively).
    pub preferred_themes: Vec<String>,
    /// Prize pool at or above which an event earns a bonus.
    pub min_prize_amount: Option<f64>,
    /// Format preference.
    pub location_preference: LocationPreference,
    /// How many hackathons the team runs at once (≥ 1).
    pub max_parallel_hackathons: i32,
}

impl TeamPreferences {
    /// Defaults applied when a team first touches its preferences.
    #[must_use]
    pub fn defaults_for(team_id: TeamId) -> Self {
        Self {
            team_id,
            preferred_themes: Vec::new(),
            min_prize_amount: None,
            location_preference: LocationPreference::Both,
            max_parallel_hackathons: 1,
        }
    }
}

/// Full replacement of a team's preferences. Missing fields take the
/// lazy-creation defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PreferencesInput {
    /// Preferred themes; none when absent.
    #[serde(default)]
    pub preferred_themes: Option<Vec<String>>,
    /// Minimum prize pool; must not be negative.
    #[serde(default)]
    pub min_prize_amount: Option<f64>,
    /// Format preference; `BOTH` when absent.
    #[serde(default)]
    pub location_preference: Option<LocationPreference>,
    /// Parallel limit; must be at least 1, defaults to 1.
    #[serde(default)]
    pub max_parallel_hackathons: Option<i32>,
}

impl PreferencesInput {
    /// Validates the input and builds the stored preferences.
    ///
    /// # Errors
    ///
    /// Returns a message when `max_parallel_hackathons < 1` or the minimum
    /// prize is negative or not a number.
    pub fn into_preferences(self, team_id: TeamId) -> Result<TeamPreferences, String> {
        let defaults = TeamPreferences::defaults_for(team_id);
        let max_parallel = self
            .max_parallel_hackathons
            .unwrap_or(defaults.max_parallel_hackathons);
        if max_parallel < 1 {
            return Err("max_parallel_hackathons must be at least 1".to_string());
        }
        if let Some(min) = self.min_prize_amount
            && (min.is_nan() || min < 0.0)
        {
            return Err("min_prize_amount must be a non-negative number".to_string());
        }
        Ok(TeamPreferences {
            team_id,
            preferred_themes: self.preferred_themes.unwrap_or_default(),
            min_prize_amount: self.min_prize_amount,
            location_preference: self.location_preference.unwrap_or_default(),
            max_parallel_hackathons: max_parallel,
        })
    }
}

/// A member of a team. Member skills feed the priority scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TeamMember {
    /// User identifier.
    pub id: UserId,
    /// Team the user belongs to.
    pub team_id: TeamId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Self-declared skills.
    pub skills: Vec<String>,
}

/// Collects the de-duplicated skills of all members, in first-seen order.
#[must_use]
pub fn team_skills(members: &[TeamMember]) -> Vec<String> {
    let mut skills: Vec<String> = Vec::new();
    for skill in members.iter().flat_map(|m| m.skills.iter()) {
        if !skills.contains(skill) {
            skills.push(skill.clone());
        }
    }
    skills
}
