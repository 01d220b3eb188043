//! Ingested hackathon events.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::HackathonId;

/// Where a hackathon takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    /// Remote only.
    Online,
    /// In person only.
    Offline,
    /// Both remote and in person.
    Hybrid,
}

impl LocationType {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "ONLINE",
            Self::Offline => "OFFLINE",
            Self::Hybrid => "HYBRID",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ONLINE" => Ok(Self::Online),
            "OFFLINE" => Ok(Self::Offline),
            "HYBRID" => Ok(Self::Hybrid),
            other => Err(format!("unknown location type: {other}")),
        }
    }
}

/// A hackathon as stored after ingestion.
///
/// Read-only to the planning core: the scorer, plan builder and alert
/// computer all receive snapshots of this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Hackathon {
    /// Unique hackathon identifier.
    pub id: HackathonId,
    /// Source platform name (e.g. `"devpost"`).
    pub platform: String,
    /// Identifier of the event on its source platform.
    pub external_id: String,
    /// Event title.
    pub title: String,
    /// Public event page.
    pub url: String,
    /// Start of the hacking window.
    pub start_date: Option<DateTime<Utc>>,
    /// End of the hacking window (the submission deadline).
    pub end_date: Option<DateTime<Utc>>,
    /// Last day to register.
    pub registration_deadline: Option<DateTime<Utc>>,
    /// Total prize pool in `currency` units.
    pub prize_pool: Option<f64>,
    /// ISO currency code of the prize pool.
    pub currency: Option<String>,
    /// Online / offline / hybrid.
    pub location_type: LocationType,
    /// Host city for in-person events.
    pub city: Option<String>,
    /// Host country.
    pub country: Option<String>,
    /// IANA timezone of the organisers.
    pub timezone: Option<String>,
    /// Event themes in source order. Duplicates carry no meaning.
    pub themes: Vec<String>,
    /// Free-text description as scraped.
    pub raw_description: String,
}

/// Normalized event record produced by an ingestion source.
///
/// Upserted into [`Hackathon`] keyed by `(platform, external_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInput {
    /// Identifier of the event on its source platform.
    pub external_id: String,
    /// Event title.
    pub title: String,
    /// Public event page.
    pub url: String,
    /// Start of the hacking window.
    pub start_date: Option<DateTime<Utc>>,
    /// End of the hacking window.
    pub end_date: Option<DateTime<Utc>>,
    /// Last day to register.
    pub registration_deadline: Option<DateTime<Utc>>,
    /// Total prize pool.
    pub prize_pool: Option<f64>,
    /// Currency of the prize pool.
    pub currency: Option<String>,
    /// Online / offline / hybrid.
    pub location_type: LocationType,
    /// Host city.
    pub city: Option<String>,
    /// Host country.
    pub country: Option<String>,
    /// Event themes.
    pub themes: Vec<String>,
    /// Organiser timezone.
    pub timezone: Option<String>,
    /// Free-text description.
    pub raw_description: String,
}

impl EventInput {
    /// Materializes the input as a [`Hackathon`] owned by `platform`.
    #[must_use]
    pub fn into_hackathon(self, id: HackathonId, platform: &str) -> Hackathon {
        Hackathon {
            id,
            platform: platform.to_string(),
            external_id: self.external_id,
            title: self.title,
            url: self.url,
            start_date: self.start_date,
            end_date: self.end_date,
            registration_deadline: self.registration_deadline,
            prize_pool: self.prize_pool,
            currency: self.currency,
            location_type: self.location_type,
            city: self.city,
            country: self.country,
            timezone: self.timezone,
            themes: self.themes,
            raw_description: self.raw_description,
        }
    }
}
