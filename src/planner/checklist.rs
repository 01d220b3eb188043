//! Submission checklists: keyword parsing and validation against a project.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ChecklistItem, ChecklistKind, HackathonRequirement, Project};

/// A known artifact: its kind, checklist label and trigger keywords.
#[derive(Debug, Clone, Copy)]
struct KnownItem {
    kind: ChecklistKind,
    label: &'static str,
    keywords: &'static [&'static str],
}

/// Detection table. Output order follows this table, not the input text.
const KNOWN_ITEMS: [KnownItem; 5] = [
    KnownItem {
        kind: ChecklistKind::Github,
        label: "GitHub repository URL",
        keywords: &["github", "source code"],
    },
    KnownItem {
        kind: ChecklistKind::Demo,
        label: "Live demo link",
        keywords: &["demo", "product link"],
    },
    KnownItem {
        kind: ChecklistKind::Video,
        label: "Submission video",
        keywords: &["video", "recording"],
    },
    KnownItem {
        kind: ChecklistKind::Deck,
        label: "Pitch deck",
        keywords: &["deck", "slides"],
    },
    KnownItem {
        kind: ChecklistKind::Cover,
        label: "Cover image",
        keywords: &["cover", "thumbnail"],
    },
];

/// Label of the fallback item emitted when nothing is detected.
pub const GENERAL_PACKAGE_LABEL: &str = "General submission package";

/// Extracts a checklist from free-text requirements.
///
/// Keywords match case-insensitively anywhere in the text. Each kind is
/// emitted at most once; all items start uncompleted. Text mentioning none
/// of the known artifacts yields a single `general` item.
#[must_use]
pub fn parse_checklist(raw_text: &str) -> Vec<ChecklistItem> {
    let lower = raw_text.to_lowercase();
    let mut detected: Vec<ChecklistItem> = KNOWN_ITEMS
        .iter()
        .filter(|item| item.keywords.iter().any(|kw| lower.contains(kw)))
        .map(|item| ChecklistItem {
            label: item.label.to_string(),
            kind: item.kind,
            completed: false,
        })
        .collect();

    if detected.is_empty() {
        detected.push(ChecklistItem {
            label: GENERAL_PACKAGE_LABEL.to_string(),
            kind: ChecklistKind::General,
            completed: false,
        });
    }
    detected
}

/// Result of checking a project against its requirement checklists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SubmissionStatus {
    /// Human-readable names of the project fields still missing.
    pub missing: Vec<String>,
    /// All checklist items across requirements, flattened in order.
    pub checklist: Vec<ChecklistItem>,
}

/// Lists the project fields the checklist asks for but the project lacks.
///
/// Video items are satisfied by the demo URL, the same field demo items
/// check. An absent project leaves every non-general item missing.
#[must_use]
pub fn validate_submission(
    project: Option<&Project>,
    requirements: &[HackathonRequirement],
) -> SubmissionStatus {
    let checklist: Vec<ChecklistItem> = requirements
        .iter()
        .flat_map(|req| req.checklist.iter().cloned())
        .collect();

    let missing = checklist
        .iter()
        .filter_map(|item| missing_field(item.kind, project))
        .map(str::to_string)
        .collect();

    SubmissionStatus { missing, checklist }
}

fn missing_field(kind: ChecklistKind, project: Option<&Project>) -> Option<&'static str> {
    let (field, label) = match kind {
        ChecklistKind::Github => (project.and_then(|p| p.github_repo_url.as_ref()), "GitHub repository URL"),
        ChecklistKind::Demo => (project.and_then(|p| p.demo_url.as_ref()), "Demo URL"),
        ChecklistKind::Video => (project.and_then(|p| p.demo_url.as_ref()), "Video / demo link"),
        ChecklistKind::Deck => (project.and_then(|p| p.pitch_deck_url.as_ref()), "Pitch deck URL"),
        ChecklistKind::Cover => (project.and_then(|p| p.cover_image_url.as_ref()), "Cover image URL"),
        ChecklistKind::General => return None,
    };
    match field {
        Some(value) if !value.is_empty() => None,
        _ => Some(label),
    }
}
