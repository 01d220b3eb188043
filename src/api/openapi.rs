//! OpenAPI document assembled from the handler annotations.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::handlers::{
    admin, assistant, discovery, insights, pipeline, submission, system, tasks, team,
};

/// The service's OpenAPI document.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "hackathon-pipeline",
        description = "Hackathon discovery, planning and submission tracking for teams."
    ),
    paths(
        system::health_handler,
        discovery::discover,
        pipeline::list_pipeline,
        pipeline::add_to_pipeline,
        pipeline::get_entry,
        pipeline::update_entry,
        pipeline::generate_plan,
        tasks::list_tasks,
        tasks::update_task,
        submission::parse_requirements,
        submission::update_checklist,
        submission::get_project,
        submission::upsert_project,
        submission::submission_status,
        assistant::assistant_reply,
        insights::alerts,
        insights::overview,
        insights::themes,
        insights::timeline,
        team::get_preferences,
        team::put_preferences,
        admin::sync_hackathons,
    ),
    modifiers(&SessionSecurity),
    security(("session" = [])),
)]
pub struct ApiDoc;

/// Registers the bearer session scheme.
#[derive(Debug)]
struct SessionSecurity;

impl Modify for SessionSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
