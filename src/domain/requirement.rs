//! Submission requirements and checklist items.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{RequirementId, TeamHackathonId};

/// Kind of submission artifact a checklist item asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChecklistKind {
    /// Source repository.
    Github,
    /// Live demo / product link.
    Demo,
    /// Submission video.
    Video,
    /// Pitch deck.
    Deck,
    /// Cover image / thumbnail.
    Cover,
    /// Catch-all when nothing specific was detected.
    General,
}

impl ChecklistKind {
    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Demo => "demo",
            Self::Video => "video",
            Self::Deck => "deck",
            Self::Cover => "cover",
            Self::General => "general",
        }
    }
}

impl fmt::Display for ChecklistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChecklistKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(Self::Github),
            "demo" => Ok(Self::Demo),
            "video" => Ok(Self::Video),
            "deck" => Ok(Self::Deck),
            "cover" => Ok(Self::Cover),
            "general" => Ok(Self::General),
            other => Err(format!("unknown checklist type: {other}")),
        }
    }
}

/// One line of a submission checklist. Embedded as JSON in a requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChecklistItem {
    /// Human-readable label.
    pub label: String,
    /// Artifact kind.
    #[serde(rename = "type")]
    pub kind: ChecklistKind,
    /// Whether the team ticked the item off.
    #[serde(default)]
    pub completed: bool,
}

/// Parsed requirements attached to a pipeline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HackathonRequirement {
    /// Requirement identifier.
    pub id: RequirementId,
    /// Owning pipeline entry.
    pub team_hackathon_id: TeamHackathonId,
    /// Text the checklist was parsed from.
    pub raw_text: String,
    /// Ordered checklist.
    pub checklist: Vec<ChecklistItem>,
}

impl HackathonRequirement {
    /// `true` if any checklist item is still open.
    #[must_use]
    pub fn has_open_items(&self) -> bool {
        self.checklist.iter().any(|item| !item.completed)
    }
}
