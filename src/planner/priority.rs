//! Priority scoring: how well a hackathon fits a team.
//!
//! The score is a weighted sum of prize size, theme overlap with the team's
//! preferences, theme overlap with member skills and deadline urgency, minus
//! a penalty for a format the team does not attend. It is clamped at zero
//! and rounded to two decimals.

use chrono::{DateTime, Utc};

use crate::domain::{Hackathon, LocationPreference, LocationType, TeamPreferences};

/// Prize pool that earns one point.
const PRIZE_UNIT: f64 = 10_000.0;
/// Cap on the prize contribution.
const PRIZE_CAP: f64 = 5.0;
/// Flat bonus when the prize meets the team's minimum.
const PRIZE_THRESHOLD_BONUS: f64 = 2.0;
/// Per matching preferred theme.
const THEME_MATCH: f64 = 1.5;
/// Per theme matching a team skill.
const SKILL_MATCH: f64 = 1.0;
/// Deadline within a week.
const URGENT_BONUS: f64 = 2.0;
/// Deadline within three weeks.
const SOON_BONUS: f64 = 1.0;
/// Event format the team does not attend.
const LOCATION_PENALTY: f64 = 3.0;

const URGENT_DAYS: f64 = 7.0;
const SOON_DAYS: f64 = 21.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Computes the priority score of `hackathon` for a team.
///
/// Total over its inputs: missing prize, dates or preferences simply
/// contribute nothing. The result is never negative.
#[must_use]
pub fn compute_priority_score(
    hackathon: &Hackathon,
    prefs: &TeamPreferences,
    team_skills: &[String],
    now: DateTime<Utc>,
) -> f64 {
    let mut score = 0.0;

    score += prize_component(hackathon.prize_pool, prefs.min_prize_amount);
    score += THEME_MATCH * count_matches(&hackathon.themes, &prefs.preferred_themes) as f64;
    score += SKILL_MATCH * count_matches(&hackathon.themes, team_skills) as f64;
    score += urgency_component(hackathon, now);
    score -= location_penalty(prefs.location_preference, hackathon.location_type);

    round2(score).max(0.0)
}

fn prize_component(prize_pool: Option<f64>, min_prize: Option<f64>) -> f64 {
    let Some(prize) = prize_pool.filter(|p| *p > 0.0) else {
        return 0.0;
    };
    let mut component = (prize / PRIZE_UNIT).min(PRIZE_CAP);
    if let Some(min) = min_prize.filter(|m| *m > 0.0)
        && prize >= min
    {
        component += PRIZE_THRESHOLD_BONUS;
    }
    component
}

/// Counts hackathon themes equal (ignoring case) to any candidate. Each
/// theme counts at most once, however many candidates it matches.
fn count_matches(themes: &[String], candidates: &[String]) -> usize {
    let lowered: Vec<String> = candidates.iter().map(|c| c.to_lowercase()).collect();
    themes
        .iter()
        .filter(|theme| {
            let theme = theme.to_lowercase();
            lowered.iter().any(|c| *c == theme)
        })
        .count()
}

fn urgency_component(hackathon: &Hackathon, now: DateTime<Utc>) -> f64 {
    let deadline = hackathon
        .registration_deadline
        .or(hackathon.start_date)
        .or(hackathon.end_date);
    let Some(deadline) = deadline.filter(|d| *d > now) else {
        return 0.0;
    };

    #[allow(clippy::cast_precision_loss)]
    let days_left = (deadline - now).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY;
    if days_left <= URGENT_DAYS {
        URGENT_BONUS
    } else if days_left <= SOON_DAYS {
        SOON_BONUS
    } else {
        0.0
    }
}

fn location_penalty(preference: LocationPreference, location: LocationType) -> f64 {
    match (preference, location) {
        (LocationPreference::OnlineOnly, LocationType::Offline)
        | (LocationPreference::OfflineOnly, LocationType::Online) => LOCATION_PENALTY,
        _ => 0.0,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HackathonId, TeamId};
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_default()
    }

    fn hackathon() -> Hackathon {
        Hackathon {
            id: HackathonId::new(),
            platform: "devpost".to_string(),
            external_id: "ext-1".to_string(),
            title: "Test Hack".to_string(),
            url: "https://example.com".to_string(),
            start_date: None,
            end_date: None,
            registration_deadline: None,
            prize_pool: None,
            currency: None,
            location_type: LocationType::Hybrid,
            city: None,
            country: None,
            timezone: None,
            themes: Vec::new(),
            raw_description: String::new(),
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn nothing_in_common_scores_zero() {
        let mut h = hackathon();
        h.themes = strings(&["Fintech"]);
        h.registration_deadline = Some(now() + Duration::days(30));
        let prefs = TeamPreferences::defaults_for(TeamId::new());
        assert_eq!(compute_priority_score(&h, &prefs, &strings(&["Rust"]), now()), 0.0);
    }

    #[test]
    fn worked_example_scores_ten_and_a_half() {
        let mut h = hackathon();
        h.prize_pool = Some(50_000.0);
        h.themes = strings(&["AI"]);
        h.registration_deadline = Some(now() + Duration::days(5));
        let mut prefs = TeamPreferences::defaults_for(TeamId::new());
        prefs.min_prize_amount = Some(10_000.0);
        prefs.preferred_themes = strings(&["ai"]);

        assert_eq!(compute_priority_score(&h, &prefs, &[], now()), 10.5);
    }

    #[test]
    fn prize_contribution_is_capped() {
        let mut h = hackathon();
        h.prize_pool = Some(1_000_000.0);
        let prefs = TeamPreferences::defaults_for(TeamId::new());
        assert_eq!(compute_priority_score(&h, &prefs, &[], now()), 5.0);
    }

    #[test]
    fn prize_below_minimum_gets_no_bonus() {
        let mut h = hackathon();
        h.prize_pool = Some(5_000.0);
        let mut prefs = TeamPreferences::defaults_for(TeamId::new());
        prefs.min_prize_amount = Some(10_000.0);
        assert_eq!(compute_priority_score(&h, &prefs, &[], now()), 0.5);
    }

    #[test]
    fn theme_can_count_for_preference_and_skill() {
        let mut h = hackathon();
        h.themes = strings(&["AI", "Climate", "ai"]);
        let mut prefs = TeamPreferences::defaults_for(TeamId::new());
        prefs.preferred_themes = strings(&["AI"]);
        // "AI" and "ai" both match: 2 × 1.5 for themes, 2 × 1 for skills.
        let score = compute_priority_score(&h, &prefs, &strings(&["Ai"]), now());
        assert_eq!(score, 5.0);
    }

    #[test]
    fn urgency_falls_back_through_dates() {
        let prefs = TeamPreferences::defaults_for(TeamId::new());

        let mut h = hackathon();
        h.end_date = Some(now() + Duration::days(14));
        assert_eq!(compute_priority_score(&h, &prefs, &[], now()), 1.0);

        h.start_date = Some(now() + Duration::days(3));
        assert_eq!(compute_priority_score(&h, &prefs, &[], now()), 2.0);

        h.registration_deadline = Some(now() + Duration::days(60));
        assert_eq!(compute_priority_score(&h, &prefs, &[], now()), 0.0);
    }

    #[test]
    fn past_deadline_earns_nothing() {
        let mut h = hackathon();
        h.registration_deadline = Some(now() - Duration::days(1));
        let prefs = TeamPreferences::defaults_for(TeamId::new());
        assert_eq!(compute_priority_score(&h, &prefs, &[], now()), 0.0);
    }

    #[test]
    fn location_mismatch_is_penalised_but_clamped() {
        let mut h = hackathon();
        h.location_type = LocationType::Offline;
        h.prize_pool = Some(20_000.0);
        let mut prefs = TeamPreferences::defaults_for(TeamId::new());
        prefs.location_preference = LocationPreference::OnlineOnly;
        assert_eq!(compute_priority_score(&h, &prefs, &[], now()), 0.0);

        h.prize_pool = Some(50_000.0);
        assert_eq!(compute_priority_score(&h, &prefs, &[], now()), 2.0);

        prefs.location_preference = LocationPreference::OfflineOnly;
        h.location_type = LocationType::Hybrid;
        assert_eq!(compute_priority_score(&h, &prefs, &[], now()), 5.0);
    }

    #[test]
    fn score_is_never_negative() {
        let mut prefs = TeamPreferences::defaults_for(TeamId::new());
        prefs.location_preference = LocationPreference::OfflineOnly;
        let mut h = hackathon();
        h.location_type = LocationType::Online;
        for prize in [0.0, 1.0, 9_999.0, 10_000.0, 123_456.0, 1e9] {
            h.prize_pool = Some(prize);
            assert!(compute_priority_score(&h, &prefs, &[], now()) >= 0.0);
        }
    }

    #[test]
    fn result_is_rounded_to_two_decimals() {
        let mut h = hackathon();
        h.prize_pool = Some(12_345.0);
        let prefs = TeamPreferences::defaults_for(TeamId::new());
        assert_eq!(compute_priority_score(&h, &prefs, &[], now()), 1.23);
    }
}
