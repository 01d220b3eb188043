//! Planning core: scoring, scheduling, checklists and alerts.
//!
//! Every function here is pure and total. Callers load the snapshots, pass
//! the current instant explicitly and persist whatever comes back.

pub mod alerts;
pub mod checklist;
pub mod priority;
pub mod schedule;

pub use alerts::{Alert, AlertInput, Severity, compute_alerts};
pub use checklist::{SubmissionStatus, parse_checklist, validate_submission};
pub use priority::compute_priority_score;
pub use schedule::{GeneratedTask, PhaseName, Plan, PlanPhase, build_plan, generate_tasks};
