//! The project a team builds for a hackathon.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TeamHackathonId;

/// Project metadata, one per pipeline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Project {
    /// Owning pipeline entry.
    pub team_hackathon_id: TeamHackathonId,
    /// Project name.
    pub name: String,
    /// One-paragraph pitch.
    pub short_description: String,
    /// Technologies used.
    pub tech_stack: Vec<String>,
    /// Source repository.
    pub github_repo_url: Option<String>,
    /// Live demo or demo video.
    pub demo_url: Option<String>,
    /// Pitch deck.
    pub pitch_deck_url: Option<String>,
    /// Cover image.
    pub cover_image_url: Option<String>,
}

/// Full replacement of a project's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProjectInput {
    /// Project name; `"Untitled project"` when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Pitch; empty when absent.
    #[serde(default)]
    pub short_description: Option<String>,
    /// Technologies; empty when absent.
    #[serde(default)]
    pub tech_stack: Option<Vec<String>>,
    /// Source repository.
    #[serde(default)]
    pub github_repo_url: Option<String>,
    /// Live demo.
    #[serde(default)]
    pub demo_url: Option<String>,
    /// Pitch deck.
    #[serde(default)]
    pub pitch_deck_url: Option<String>,
    /// Cover image.
    #[serde(default)]
    pub cover_image_url: Option<String>,
}

impl ProjectInput {
    /// Builds the stored project, applying defaults for missing fields.
    #[must_use]
    pub fn into_project(self, team_hackathon_id: TeamHackathonId) -> Project {
        Project {
            team_hackathon_id,
            name: self.name.unwrap_or_else(|| "Untitled project".to_string()),
            short_description: self.short_description.unwrap_or_default(),
            tech_stack: self.tech_stack.unwrap_or_default(),
            github_repo_url: self.github_repo_url,
            demo_url: self.demo_url,
            pitch_deck_url: self.pitch_deck_url,
            cover_image_url: self.cover_image_url,
        }
    }
}
