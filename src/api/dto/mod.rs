//! Data Transfer Objects for REST request/response serialization.
//!
//! Domain types that are already wire-shaped (tasks, projects, preferences)
//! are returned as-is; the types here cover request bodies and responses
//! that combine several of them.

pub mod common_dto;
pub mod pipeline_dto;
pub mod requirements_dto;

pub use common_dto::*;
pub use pipeline_dto::*;
pub use requirements_dto::*;
