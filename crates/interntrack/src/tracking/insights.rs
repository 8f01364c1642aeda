//! Anonymous per-listing aggregate, safe to serve without authorization.
//!
//! The input is [`TrackingPulse`] projections rather than full records, so
//! user identity can never leak into the response by construction.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::domain::{ApplicationStatus, TrackingPulse};

/// How far back a record creation still counts as recent activity.
pub const RECENT_ACTIVITY_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestLevel {
    Low,
    Medium,
    High,
}

impl InterestLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub const fn from_total(total: usize) -> Self {
        if total >= 20 {
            Self::High
        } else if total >= 10 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListingInsights {
    pub total: usize,
    /// Records still sitting in `not_applied`.
    pub saved: usize,
    pub applied: usize,
    pub interviewing: usize,
    /// Offers received plus accepted.
    pub offers: usize,
    pub recent_activity: usize,
    pub interest_level: InterestLevel,
    /// Percentage of trackers who applied, rounded; 0 when nobody tracks.
    pub application_rate: u8,
}

pub fn listing_insights(pulses: &[TrackingPulse], now: DateTime<Utc>) -> ListingInsights {
    let mut saved = 0;
    let mut applied = 0;
    let mut interviewing = 0;
    let mut offers = 0;
    let mut recent_activity = 0;

    let recent_cutoff = now - Duration::days(RECENT_ACTIVITY_WINDOW_DAYS);
    for pulse in pulses {
        match pulse.status {
            ApplicationStatus::NotApplied => saved += 1,
            ApplicationStatus::Applied => applied += 1,
            ApplicationStatus::Interviewing => interviewing += 1,
            ApplicationStatus::OfferReceived | ApplicationStatus::Accepted => offers += 1,
            ApplicationStatus::Rejected | ApplicationStatus::Declined => {}
        }

        if pulse.created_at >= recent_cutoff {
            recent_activity += 1;
        }
    }

    let total = pulses.len();
    let application_rate = if total == 0 {
        0
    } else {
        ((applied as f64 / total as f64) * 100.0).round() as u8
    };

    ListingInsights {
        total,
        saved,
        applied,
        interviewing,
        offers,
        recent_activity,
        interest_level: InterestLevel::from_total(total),
        application_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulse(status: ApplicationStatus, days_old: i64) -> TrackingPulse {
        TrackingPulse {
            status,
            created_at: Utc::now() - Duration::days(days_old),
        }
    }

    #[test]
    fn zero_records_report_all_zeros_without_dividing() {
        let insights = listing_insights(&[], Utc::now());
        assert_eq!(insights.total, 0);
        assert_eq!(insights.saved, 0);
        assert_eq!(insights.applied, 0);
        assert_eq!(insights.interviewing, 0);
        assert_eq!(insights.offers, 0);
        assert_eq!(insights.recent_activity, 0);
        assert_eq!(insights.interest_level, InterestLevel::Low);
        assert_eq!(insights.application_rate, 0);
    }

    #[test]
    fn buckets_count_statuses_and_offers_merge_two() {
        let pulses = vec![
            pulse(ApplicationStatus::NotApplied, 30),
            pulse(ApplicationStatus::Applied, 30),
            pulse(ApplicationStatus::Applied, 2),
            pulse(ApplicationStatus::Interviewing, 30),
            pulse(ApplicationStatus::OfferReceived, 30),
            pulse(ApplicationStatus::Accepted, 30),
            pulse(ApplicationStatus::Rejected, 1),
            pulse(ApplicationStatus::Declined, 30),
        ];

        let insights = listing_insights(&pulses, Utc::now());
        assert_eq!(insights.total, 8);
        assert_eq!(insights.saved, 1);
        assert_eq!(insights.applied, 2);
        assert_eq!(insights.interviewing, 1);
        assert_eq!(insights.offers, 2);
        assert_eq!(insights.recent_activity, 2);
        assert_eq!(insights.application_rate, 25);
    }

    #[test]
    fn interest_level_thresholds() {
        assert_eq!(InterestLevel::from_total(0), InterestLevel::Low);
        assert_eq!(InterestLevel::from_total(9), InterestLevel::Low);
        assert_eq!(InterestLevel::from_total(10), InterestLevel::Medium);
        assert_eq!(InterestLevel::from_total(19), InterestLevel::Medium);
        assert_eq!(InterestLevel::from_total(20), InterestLevel::High);
        assert_eq!(InterestLevel::from_total(250), InterestLevel::High);
    }

    #[test]
    fn application_rate_rounds_to_nearest_percent() {
        let pulses = vec![
            pulse(ApplicationStatus::Applied, 30),
            pulse(ApplicationStatus::NotApplied, 30),
            pulse(ApplicationStatus::NotApplied, 30),
        ];
        // 1/3 of trackers applied
        assert_eq!(listing_insights(&pulses, Utc::now()).application_rate, 33);

        let pulses = vec![
            pulse(ApplicationStatus::Applied, 30),
            pulse(ApplicationStatus::Applied, 30),
            pulse(ApplicationStatus::NotApplied, 30),
        ];
        assert_eq!(listing_insights(&pulses, Utc::now()).application_rate, 67);
    }
}
