//! hackathon-pipeline server entry point.
//!
//! Starts the Axum HTTP server with the REST endpoints.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use hackathon_pipeline::api;
use hackathon_pipeline::app_state::AppState;
use hackathon_pipeline::auth::SessionKeys;
use hackathon_pipeline::config::{LogFormat, TrackerConfig};
use hackathon_pipeline::ingest::SourceRegistry;
use hackathon_pipeline::llm::LlmClient;
use hackathon_pipeline::persistence::{MemoryStore, PostgresStore, TrackerStore};
use hackathon_pipeline::service::TrackerService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config =
        TrackerConfig::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting hackathon-pipeline");
    if config.uses_dev_secret() {
        tracing::warn!("SESSION_SECRET not set, using the development secret");
    }

    // Build persistence layer
    let store: Arc<dyn TrackerStore> = if config.persistence_enabled {
        let store = PostgresStore::connect(&config)
            .await
            .context("failed to connect to PostgreSQL")?;
        tracing::info!("using PostgreSQL store");
        Arc::new(store)
    } else {
        tracing::info!("persistence disabled, using in-memory store");
        Arc::new(MemoryStore::new())
    };

    // Build collaborators
    let generator = LlmClient::new(config.llm.clone()).context("failed to build LLM client")?;
    tracing::info!(provider = ?generator.provider(), "text generation ready");
    let sources = SourceRegistry::from_names(&config.ingest_sources);
    tracing::info!(sources = ?sources.names(), "ingestion sources enabled");

    // Build service layer
    let tracker = Arc::new(TrackerService::new(store, Arc::new(generator), sources));

    // Build application state
    let app_state = AppState {
        tracker,
        session_keys: SessionKeys::new(&config.session_secret, config.session_ttl_secs),
        admin_sync_enabled: config.admin_sync_enabled,
    };

    // Build router
    let app = Router::new().merge(api::build_router());

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::openapi::ApiDoc::openapi()),
        )
    };

    let app = app
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
