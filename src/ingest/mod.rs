//! Hackathon ingestion from external platforms.
//!
//! Each platform is an [`EventSource`]. The [`SourceRegistry`] holds the
//! sources enabled by configuration, keyed by platform name, and the
//! service upserts whatever they return by `(platform, external_id)`.

pub mod sources;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::EventInput;

pub use sources::{DevfolioSource, DevpostSource};

/// Failure fetching events from a source.
#[derive(Debug, thiserror::Error)]
#[error("source {source_name} failed: {message}")]
pub struct IngestError {
    /// Platform name of the failing source.
    pub source_name: String,
    /// What went wrong.
    pub message: String,
}

/// A platform that publishes hackathons.
#[async_trait]
pub trait EventSource: Send + Sync + std::fmt::Debug {
    /// Platform name, used as the `platform` column of ingested events.
    fn name(&self) -> &str;

    /// Fetches the platform's current events. Relative dates are computed
    /// from `now`.
    async fn fetch_events(&self, now: DateTime<Utc>) -> Result<Vec<EventInput>, IngestError>;
}

/// Enabled event sources keyed by platform name.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: BTreeMap<String, Arc<dyn EventSource>>,
}

impl SourceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry with the built-in sources listed in `names`.
    /// Unknown names are logged and skipped.
    #[must_use]
    pub fn from_names(names: &[String]) -> Self {
        let mut registry = Self::new();
        for name in names {
            match name.trim().to_ascii_lowercase().as_str() {
                "devpost" => registry.register(Arc::new(DevpostSource)),
                "devfolio" => registry.register(Arc::new(DevfolioSource)),
                "" => {}
                other => tracing::warn!(source = other, "unknown ingest source, skipping"),
            }
        }
        registry
    }

    /// Adds `source`, replacing any source with the same name.
    pub fn register(&mut self, source: Arc<dyn EventSource>) {
        self.sources.insert(source.name().to_string(), source);
    }

    /// Looks up a source by platform name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn EventSource>> {
        self.sources.get(name).cloned()
    }

    /// Registered platform names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.sources.keys().map(String::as_str).collect()
    }

    /// Iterates the sources in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn EventSource>> {
        self.sources.values()
    }

    /// Number of registered sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// `true` if no source is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
