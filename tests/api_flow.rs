//! End-to-end tests of the REST API against the in-memory store.
//!
//! Each test builds the full router, authenticates with a session token
//! issued by [`SessionKeys`] and drives requests through
//! `tower::ServiceExt::oneshot`.

#![allow(clippy::panic, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use hackathon_pipeline::api;
use hackathon_pipeline::app_state::AppState;
use hackathon_pipeline::auth::{SESSION_COOKIE, SessionKeys};
use hackathon_pipeline::domain::{EventInput, Hackathon, LocationType, TeamId, UserId};
use hackathon_pipeline::ingest::SourceRegistry;
use hackathon_pipeline::llm::{LlmClient, LlmConfig};
use hackathon_pipeline::persistence::{MemoryStore, TrackerStore};
use hackathon_pipeline::service::TrackerService;

const SECRET: &str = "integration-secret";

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
    keys: SessionKeys,
}

impl TestApp {
    fn new(admin_sync_enabled: bool) -> Self {
        let store = Arc::new(MemoryStore::new());
        let Ok(generator) = LlmClient::new(LlmConfig::default()) else {
            panic!("stub client should build");
        };
        let tracker = TrackerService::new(
            Arc::clone(&store) as Arc<dyn TrackerStore>,
            Arc::new(generator),
            SourceRegistry::from_names(&["devpost".to_string(), "devfolio".to_string()]),
        );
        let keys = SessionKeys::new(SECRET, 3600);
        let state = AppState {
            tracker: Arc::new(tracker),
            session_keys: keys.clone(),
            admin_sync_enabled,
        };
        Self {
            router: Router::new().merge(api::build_router()).with_state(state),
            store,
            keys,
        }
    }

    fn token(&self) -> String {
        self.token_for(TeamId::new())
    }

    fn token_for(&self, team_id: TeamId) -> String {
        let Ok(token) = self.keys.issue(UserId::new(), team_id, Utc::now()) else {
            panic!("token should sign");
        };
        token
    }

    async fn seed_hackathon(&self, external_id: &str) -> Hackathon {
        let now = Utc::now();
        let input = EventInput {
            external_id: external_id.to_string(),
            title: "Climate Hack".to_string(),
            url: "https://example.com/climate".to_string(),
            start_date: Some(now + Duration::days(2)),
            end_date: Some(now + Duration::days(5)),
            registration_deadline: Some(now + Duration::days(1)),
            prize_pool: Some(30_000.0),
            currency: Some("USD".to_string()),
            location_type: LocationType::Online,
            city: None,
            country: None,
            themes: vec!["Climate".to_string(), "AI".to_string()],
            timezone: Some("UTC".to_string()),
            raw_description: "Build tools for a cooler planet.".to_string(),
        };
        let Ok(hackathon) = self.store.upsert_hackathon("devpost", input).await else {
            panic!("seed hackathon");
        };
        hackathon
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        };
        let Ok(request) = request else {
            panic!("request should build");
        };
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let Ok(response) = self.router.clone().oneshot(request).await else {
            panic!("router is infallible");
        };
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body should be readable");
        };
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}

#[tokio::test]
async fn health_needs_no_session() {
    let app = TestApp::new(false);
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn api_rejects_missing_and_forged_sessions() {
    let app = TestApp::new(false);
    let (status, body) = app
        .send(Method::GET, "/api/v1/team-hackathons", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], 4001);

    let forged = SessionKeys::new("other-secret", 3600);
    let Ok(token) = forged.issue(UserId::new(), TeamId::new(), Utc::now()) else {
        panic!("token should sign");
    };
    let (status, _) = app
        .send(Method::GET, "/api/v1/team-hackathons", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let app = TestApp::new(false);
    let token = app.token();
    let Ok(request) = Request::builder()
        .uri("/api/v1/team/preferences")
        .header(header::COOKIE, format!("theme=dark; {SESSION_COOKIE}={token}"))
        .body(Body::empty())
    else {
        panic!("request should build");
    };
    let (status, body) = app.dispatch(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location_preference"], "BOTH");
    assert_eq!(body["max_parallel_hackathons"], 1);
}

#[tokio::test]
async fn pipeline_flow_from_discovery_to_submission() {
    let app = TestApp::new(false);
    let token = app.token();
    let hackathon = app.seed_hackathon("climate-1").await;

    let (status, found) = app
        .send(Method::GET, "/api/v1/hackathons/discovery", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found[0]["title"], "Climate Hack");
    assert!(found[0]["priority_score"].as_f64().is_some_and(|s| s > 0.0));

    let (status, entry) = app
        .send(
            Method::POST,
            "/api/v1/team-hackathons",
            Some(&token),
            Some(json!({ "hackathon_id": hackathon.id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["status"], "WATCHING");
    let Some(entry_id) = entry["id"].as_str().map(str::to_string) else {
        panic!("entry id missing");
    };

    let (status, plan) = app
        .send(
            Method::POST,
            &format!("/api/v1/team-hackathons/{entry_id}/generate-plan"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["phases"].as_array().map(Vec::len), Some(3));
    assert_eq!(plan["phases"][2]["name"], "Polish & Submission");
    assert_eq!(plan["tasks"].as_array().map(Vec::len), Some(8));
    let Some(task_id) = plan["tasks"][0]["id"].as_str().map(str::to_string) else {
        panic!("task id missing");
    };

    let (status, task) = app
        .send(
            Method::PATCH,
            &format!("/api/v1/tasks/{task_id}"),
            Some(&token),
            Some(json!({ "status": "DONE" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["status"], "DONE");

    let (status, requirement) = app
        .send(
            Method::POST,
            &format!("/api/v1/team-hackathons/{entry_id}/requirements/parse"),
            Some(&token),
            Some(json!({ "raw_text": "Submit a GitHub repo and a demo video." })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let types: Vec<&str> = requirement["checklist"]
        .as_array()
        .map(|items| items.iter().filter_map(|i| i["type"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(types, vec!["github", "demo", "video"]);

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/v1/team-hackathons/{entry_id}/project"),
            Some(&token),
            Some(json!({ "name": "Cooler", "demo_url": "https://cooler.example" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, submission) = app
        .send(
            Method::GET,
            &format!("/api/v1/team-hackathons/{entry_id}/submission-status"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(submission["missing"], json!(["GitHub repository URL"]));

    let (status, alerts) = app
        .send(Method::GET, "/api/v1/alerts", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        alerts
            .as_array()
            .is_some_and(|a| a.iter().any(|alert| alert["severity"] == "info"))
    );

    let (status, entry) = app
        .send(
            Method::PATCH,
            &format!("/api/v1/team-hackathons/{entry_id}"),
            Some(&token),
            Some(json!({ "status": "SUBMITTED", "past_result": "WON" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["status"], "SUBMITTED");

    let (status, overview) = app
        .send(Method::GET, "/api/v1/analytics/overview", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview, json!({ "total": 1, "submitted": 1, "won": 1 }));

    let (status, themes) = app
        .send(Method::GET, "/api/v1/analytics/themes", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(themes["Climate"], json!({ "participated": 1, "won": 1 }));

    let (status, reply) = app
        .send(
            Method::POST,
            &format!("/api/v1/team-hackathons/{entry_id}/assistant"),
            Some(&token),
            Some(json!({ "messages": [{ "role": "user", "content": "What now?" }] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        reply["reply"]
            .as_str()
            .is_some_and(|r| r.starts_with("[STUB MODE]"))
    );
}

#[tokio::test]
async fn teams_cannot_see_each_other() {
    let app = TestApp::new(false);
    let owner = app.token();
    let intruder = app.token();
    let hackathon = app.seed_hackathon("climate-2").await;

    let (_, entry) = app
        .send(
            Method::POST,
            "/api/v1/team-hackathons",
            Some(&owner),
            Some(json!({ "hackathon_id": hackathon.id })),
        )
        .await;
    let Some(entry_id) = entry["id"].as_str().map(str::to_string) else {
        panic!("entry id missing");
    };

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/team-hackathons/{entry_id}"),
            Some(&intruder),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 2001);

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/api/v1/team-hackathons/{entry_id}/generate-plan"),
            Some(&intruder),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, listed) = app
        .send(Method::GET, "/api/v1/team-hackathons", Some(&intruder), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn invalid_preferences_are_rejected() {
    let app = TestApp::new(false);
    let token = app.token();
    let (status, body) = app
        .send(
            Method::PUT,
            "/api/v1/team/preferences",
            Some(&token),
            Some(json!({ "max_parallel_hackathons": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1001);

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/v1/team/preferences",
            Some(&token),
            Some(json!({ "preferred_themes": ["AI"], "location_preference": "ONLINE_ONLY" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["preferred_themes"], json!(["AI"]));
    assert_eq!(body["max_parallel_hackathons"], 1);
}

#[tokio::test]
async fn admin_sync_is_gated_by_configuration() {
    let disabled = TestApp::new(false);
    let token = disabled.token();
    let (status, body) = disabled
        .send(Method::POST, "/api/v1/admin/sync-hackathons", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], 4003);

    let enabled = TestApp::new(true);
    let token = enabled.token_for(TeamId::new());
    let (status, report) = enabled
        .send(Method::POST, "/api/v1/admin/sync-hackathons", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["sources"], 2);
    assert_eq!(report["failed"], json!([]));

    let (status, found) = enabled
        .send(Method::GET, "/api/v1/hackathons/discovery", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().map(Vec::len), report["upserted"].as_u64().map(|n| n as usize));
}
