//! Domain layer: entity types shared by the planner, service and storage.
//!
//! Everything here is plain data. Entities are owned by the store; the
//! planning core receives read-only snapshots and returns new values.

pub mod activity;
pub mod hackathon;
pub mod ids;
pub mod pipeline;
pub mod project;
pub mod requirement;
pub mod task;
pub mod team;

pub use activity::{ActivityEvent, ActivityKind};
pub use hackathon::{EventInput, Hackathon, LocationType};
pub use ids::{HackathonId, RequirementId, TaskId, TeamHackathonId, TeamId, UserId};
pub use pipeline::{PastResult, PipelineStatus, TeamHackathon};
pub use project::{Project, ProjectInput};
pub use requirement::{ChecklistItem, ChecklistKind, HackathonRequirement};
pub use task::{Task, TaskCategory, TaskPatch, TaskStatus};
pub use team::{LocationPreference, PreferencesInput, TeamMember, TeamPreferences, team_skills};
