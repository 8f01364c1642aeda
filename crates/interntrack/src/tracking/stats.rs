use serde::Serialize;

use super::domain::{ApplicationStatus, TrackingRecord};

/// Per-status counts across everything one user tracks. One field per enum
/// variant so a new status that forgets the aggregate fails to compile
/// instead of silently vanishing from the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PersonalStats {
    pub total: usize,
    pub not_applied: usize,
    pub applied: usize,
    pub interviewing: usize,
    pub offer_received: usize,
    pub rejected: usize,
    pub accepted: usize,
    pub declined: usize,
}

impl PersonalStats {
    pub fn collect<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a TrackingRecord>,
    {
        let mut stats = Self::default();
        for record in records {
            stats.total += 1;
            match record.status {
                ApplicationStatus::NotApplied => stats.not_applied += 1,
                ApplicationStatus::Applied => stats.applied += 1,
                ApplicationStatus::Interviewing => stats.interviewing += 1,
                ApplicationStatus::OfferReceived => stats.offer_received += 1,
                ApplicationStatus::Rejected => stats.rejected += 1,
                ApplicationStatus::Accepted => stats.accepted += 1,
                ApplicationStatus::Declined => stats.declined += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::UserId;
    use crate::listings::domain::ListingId;
    use crate::tracking::domain::TrackingId;
    use chrono::Utc;

    fn record(index: usize, status: ApplicationStatus) -> TrackingRecord {
        TrackingRecord {
            id: TrackingId(format!("trk-{index}")),
            user: UserId::from("user"),
            listing: ListingId(format!("lst-{index}")),
            status,
            application_date: None,
            status_history: Vec::new(),
            private_notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_input_yields_all_zeros() {
        let records: Vec<TrackingRecord> = Vec::new();
        assert_eq!(PersonalStats::collect(&records), PersonalStats::default());
    }

    #[test]
    fn every_status_lands_in_its_own_bucket() {
        let records: Vec<TrackingRecord> = ApplicationStatus::ordered()
            .into_iter()
            .enumerate()
            .map(|(index, status)| record(index, status))
            .collect();

        let stats = PersonalStats::collect(&records);
        assert_eq!(stats.total, 7);
        assert_eq!(stats.not_applied, 1);
        assert_eq!(stats.applied, 1);
        assert_eq!(stats.interviewing, 1);
        assert_eq!(stats.offer_received, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.declined, 1);
    }
}
