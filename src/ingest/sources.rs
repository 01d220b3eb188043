//! Built-in platform sources.
//!
//! Neither platform exposes a public listing API, so both sources serve a
//! curated set of upcoming events dated relative to the sync time.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::{EventSource, IngestError};
use crate::domain::{EventInput, LocationType};

/// Devpost (devpost.com).
#[derive(Debug, Clone, Copy, Default)]
pub struct DevpostSource;

#[async_trait]
impl EventSource for DevpostSource {
    fn name(&self) -> &str {
        "devpost"
    }

    async fn fetch_events(&self, now: DateTime<Utc>) -> Result<Vec<EventInput>, IngestError> {
        Ok(vec![EventInput {
            external_id: "devpost-ai".to_string(),
            title: "Devpost AI Innovation Challenge".to_string(),
            url: "https://devpost.com/hackathons/ai-innovation".to_string(),
            start_date: Some(now + Duration::days(7)),
            end_date: Some(now + Duration::days(10)),
            registration_deadline: Some(now + Duration::days(5)),
            prize_pool: Some(75_000.0),
            currency: Some("USD".to_string()),
            location_type: LocationType::Online,
            city: None,
            country: Some("Remote".to_string()),
            themes: vec!["AI".to_string(), "Developer Tools".to_string()],
            timezone: Some("UTC".to_string()),
            raw_description: "Devpost curated AI hackathon focused on new agentic workflows."
                .to_string(),
        }])
    }
}

/// Devfolio (devfolio.co).
#[derive(Debug, Clone, Copy, Default)]
pub struct DevfolioSource;

#[async_trait]
impl EventSource for DevfolioSource {
    fn name(&self) -> &str {
        "devfolio"
    }

    async fn fetch_events(&self, now: DateTime<Utc>) -> Result<Vec<EventInput>, IngestError> {
        Ok(vec![EventInput {
            external_id: "devfolio-energy".to_string(),
            title: "Devfolio Energy Future Hack".to_string(),
            url: "https://devfolio.co/hackathons/energy-future".to_string(),
            start_date: Some(now + Duration::days(20)),
            end_date: Some(now + Duration::days(24)),
            registration_deadline: Some(now + Duration::days(15)),
            prize_pool: Some(50_000.0),
            currency: Some("USD".to_string()),
            location_type: LocationType::Hybrid,
            city: Some("Bengaluru".to_string()),
            country: Some("India".to_string()),
            themes: vec!["Climate".to_string(), "AI".to_string()],
            timezone: Some("Asia/Kolkata".to_string()),
            raw_description: "Devfolio event for climate, infra, and AI builders.".to_string(),
        }])
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_are_dated_from_now() {
        let now = Utc::now();
        let Ok(events) = DevpostSource.fetch_events(now).await else {
            panic!("devpost source cannot fail");
        };
        let Some(event) = events.first() else {
            panic!("expected one event");
        };
        assert_eq!(event.external_id, "devpost-ai");
        assert_eq!(event.registration_deadline, Some(now + Duration::days(5)));
        assert!(event.start_date < event.end_date);
    }

    #[tokio::test]
    async fn devfolio_event_is_hybrid() {
        let Ok(events) = DevfolioSource.fetch_events(Utc::now()).await else {
            panic!("devfolio source cannot fail");
        };
        assert_eq!(events.len(), 1);
        assert!(events.iter().all(|e| e.location_type == LocationType::Hybrid));
    }
}
