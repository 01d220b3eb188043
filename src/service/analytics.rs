//! Pipeline aggregations for the analytics dashboard.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Months, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Hackathon, PastResult, PipelineStatus, TeamHackathon};

/// Months covered by the participation timeline.
const TIMELINE_MONTHS: u32 = 12;

/// Headline counts over the whole pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct AnalyticsOverview {
    /// Entries in the pipeline.
    pub total: usize,
    /// Entries with status `SUBMITTED`.
    pub submitted: usize,
    /// Entries marked as won.
    pub won: usize,
}

/// Participation and wins for one theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ThemeStats {
    /// Entries past `WATCHING` and not skipped.
    pub participated: usize,
    /// Entries marked as won.
    pub won: usize,
}

/// Participation and wins for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TimelinePoint {
    /// Month label, e.g. `"Mar 2026"`.
    pub month: String,
    /// Entries submitted or with a recorded result.
    pub participated: usize,
    /// Entries marked as won.
    pub won: usize,
}

/// Counts entries, submissions and wins.
#[must_use]
pub fn overview(entries: &[TeamHackathon]) -> AnalyticsOverview {
    AnalyticsOverview {
        total: entries.len(),
        submitted: entries
            .iter()
            .filter(|e| e.status == PipelineStatus::Submitted)
            .count(),
        won: entries
            .iter()
            .filter(|e| e.past_result == PastResult::Won)
            .count(),
    }
}

/// Per-theme participation and wins. An entry counts once for each theme
/// of its hackathon; themes of watched-only entries appear with zeros.
#[must_use]
pub fn theme_breakdown(entries: &[(TeamHackathon, Hackathon)]) -> BTreeMap<String, ThemeStats> {
    let mut themes: BTreeMap<String, ThemeStats> = BTreeMap::new();
    for (entry, hackathon) in entries {
        let participated = entry.status.is_participating();
        let won = entry.past_result == PastResult::Won;
        for theme in &hackathon.themes {
            let stats = themes.entry(theme.clone()).or_default();
            if participated {
                stats.participated += 1;
            }
            if won {
                stats.won += 1;
            }
        }
    }
    themes
}

/// Monthly participation over the last twelve months, by entry creation
/// date, oldest month first.
#[must_use]
pub fn timeline(entries: &[TeamHackathon], now: DateTime<Utc>) -> Vec<TimelinePoint> {
    let since = now
        .checked_sub_months(Months::new(TIMELINE_MONTHS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut months: BTreeMap<(i32, u32), TimelinePoint> = BTreeMap::new();
    for entry in entries.iter().filter(|e| e.created_at >= since) {
        let created = entry.created_at;
        let point = months
            .entry((created.year(), created.month()))
            .or_insert_with(|| TimelinePoint {
                month: created.format("%b %Y").to_string(),
                participated: 0,
                won: 0,
            });
        if entry.status == PipelineStatus::Submitted || entry.past_result != PastResult::None {
            point.participated += 1;
        }
        if entry.past_result == PastResult::Won {
            point.won += 1;
        }
    }
    months.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HackathonId, LocationType, TeamId};
    use chrono::{Duration, TimeZone};

    fn entry(status: PipelineStatus, result: PastResult) -> TeamHackathon {
        let mut e = TeamHackathon::new(TeamId::new(), HackathonId::new(), 0.0);
        e.status = status;
        e.past_result = result;
        e
    }

    fn hackathon(themes: &[&str]) -> Hackathon {
        Hackathon {
            id: HackathonId::new(),
            platform: "devpost".to_string(),
            external_id: "x".to_string(),
            title: "X".to_string(),
            url: String::new(),
            start_date: None,
            end_date: None,
            registration_deadline: None,
            prize_pool: None,
            currency: None,
            location_type: LocationType::Online,
            city: None,
            country: None,
            timezone: None,
            themes: themes.iter().map(|t| (*t).to_string()).collect(),
            raw_description: String::new(),
        }
    }

    #[test]
    fn overview_counts_submissions_and_wins() {
        let entries = [
            entry(PipelineStatus::Submitted, PastResult::Won),
            entry(PipelineStatus::Submitted, PastResult::None),
            entry(PipelineStatus::Watching, PastResult::None),
        ];
        assert_eq!(
            overview(&entries),
            AnalyticsOverview {
                total: 3,
                submitted: 2,
                won: 1
            }
        );
    }

    #[test]
    fn themes_count_participation_and_wins() {
        let entries = [
            (
                entry(PipelineStatus::Building, PastResult::None),
                hackathon(&["AI", "Climate"]),
            ),
            (
                entry(PipelineStatus::Submitted, PastResult::Won),
                hackathon(&["AI"]),
            ),
            (
                entry(PipelineStatus::Watching, PastResult::None),
                hackathon(&["Fintech"]),
            ),
        ];
        let themes = theme_breakdown(&entries);
        assert_eq!(
            themes.get("AI"),
            Some(&ThemeStats {
                participated: 2,
                won: 1
            })
        );
        assert_eq!(
            themes.get("Climate"),
            Some(&ThemeStats {
                participated: 1,
                won: 0
            })
        );
        assert_eq!(themes.get("Fintech"), Some(&ThemeStats::default()));
    }

    #[test]
    fn timeline_groups_recent_months() {
        let now = Utc.with_ymd_and_hms(2026, 5, 15, 12, 0, 0).single().unwrap_or_default();
        let mut march = entry(PipelineStatus::Submitted, PastResult::None);
        march.created_at = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).single().unwrap_or_default();
        let mut march_win = entry(PipelineStatus::Building, PastResult::Won);
        march_win.created_at = march.created_at + Duration::days(10);
        let mut may = entry(PipelineStatus::Watching, PastResult::None);
        may.created_at = now;
        let mut old = entry(PipelineStatus::Submitted, PastResult::Won);
        old.created_at = now - Duration::days(400);

        let points = timeline(&[may, march, old, march_win], now);
        assert_eq!(
            points,
            vec![
                TimelinePoint {
                    month: "Mar 2026".to_string(),
                    participated: 2,
                    won: 1
                },
                TimelinePoint {
                    month: "May 2026".to_string(),
                    participated: 0,
                    won: 0
                },
            ]
        );
    }
}
