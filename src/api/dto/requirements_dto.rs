//! Requirement, project and copilot DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ChecklistItem;
use crate::service::ChatMessage;

/// Request body for `POST /api/v1/team-hackathons/{id}/requirements/parse`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ParseRequirementsRequest {
    /// Rules text pasted from the event page.
    #[serde(default)]
    pub raw_text: String,
}

/// Request body for `PATCH /api/v1/team-hackathons/{id}/requirements`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateChecklistRequest {
    /// Replacement checklist, in display order.
    pub checklist: Vec<ChecklistItem>,
}

/// Request body for `POST /api/v1/team-hackathons/{id}/assistant`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AssistantRequest {
    /// Conversation so far, oldest first.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// Copilot answer.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssistantResponse {
    /// Generated text.
    pub reply: String,
}
