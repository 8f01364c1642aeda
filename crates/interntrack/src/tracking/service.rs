use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::warn;

use crate::identity::UserId;
use crate::listings::domain::ListingId;
use crate::listings::repository::{ListingRepository, ListingStoreError};

use super::domain::{
    initial_note, transition_note, ApplicationStatus, StatusHistoryEntry, TrackingId,
    TrackingRecord, PRIVATE_NOTES_MAX_CHARS,
};
use super::insights::{listing_insights, ListingInsights};
use super::repository::{TrackingRepository, TrackingStoreError};
use super::stats::PersonalStats;

/// State machine over tracking records, composed from the two repositories.
/// Every operation takes the caller identity explicitly; nothing here reads
/// ambient request state.
pub struct TrackingService<L, T> {
    listings: Arc<L>,
    records: Arc<T>,
}

static TRACKING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_tracking_id() -> TrackingId {
    let id = TRACKING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    TrackingId(format!("trk-{id:06}"))
}

/// Error raised by tracking operations, one variant per §7-style outcome.
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("internship listing not found")]
    ListingNotFound,
    #[error("tracking record not found")]
    NotFound,
    #[error("tracking record belongs to another user")]
    Forbidden,
    #[error("this listing is already being tracked")]
    AlreadyTracked,
    #[error("application_date is required when the status first becomes applied")]
    MissingApplicationDate,
    #[error("notes exceed {max} characters (got {len})")]
    NotesTooLong { max: usize, len: usize },
    #[error(transparent)]
    Records(#[from] TrackingStoreError),
    #[error(transparent)]
    Listings(#[from] ListingStoreError),
}

impl<L, T> TrackingService<L, T>
where
    L: ListingRepository + 'static,
    T: TrackingRepository + 'static,
{
    pub fn new(listings: Arc<L>, records: Arc<T>) -> Self {
        Self { listings, records }
    }

    /// Start tracking a listing. The record is created with the given status
    /// (default `not_applied`) and one seed history entry; the listing's
    /// tracking counter is bumped best-effort afterwards, not transactionally.
    pub fn track(
        &self,
        user: UserId,
        listing_id: ListingId,
        initial_status: Option<ApplicationStatus>,
        application_date: Option<NaiveDate>,
    ) -> Result<TrackingRecord, TrackingError> {
        let mut listing = self
            .listings
            .fetch(&listing_id)?
            .ok_or(TrackingError::ListingNotFound)?;

        let status = initial_status.unwrap_or(ApplicationStatus::NotApplied);
        if status == ApplicationStatus::Applied && application_date.is_none() {
            return Err(TrackingError::MissingApplicationDate);
        }

        let now = Utc::now();
        let record = TrackingRecord {
            id: next_tracking_id(),
            user,
            listing: listing_id,
            status,
            application_date,
            status_history: vec![StatusHistoryEntry {
                status,
                recorded_at: now,
                note: initial_note(status),
            }],
            private_notes: String::new(),
            created_at: now,
            updated_at: now,
        };

        let stored = match self.records.insert(record) {
            Ok(stored) => stored,
            Err(TrackingStoreError::Conflict) => return Err(TrackingError::AlreadyTracked),
            Err(other) => return Err(other.into()),
        };

        listing.tracking_count += 1;
        listing.updated_at = now;
        if let Err(error) = self.listings.update(listing) {
            warn!(%error, tracking = %stored.id.0, "tracking_count increment failed");
        }

        Ok(stored)
    }

    /// Move a record to a new status, appending exactly one history entry.
    /// Entering `applied` for the first time requires an application date,
    /// either supplied here or already on the record.
    pub fn update_status(
        &self,
        caller: &UserId,
        id: &TrackingId,
        new_status: ApplicationStatus,
        application_date: Option<NaiveDate>,
        note: Option<String>,
    ) -> Result<TrackingRecord, TrackingError> {
        let mut record = self.owned_record(caller, id)?;

        if new_status == ApplicationStatus::Applied
            && application_date.is_none()
            && record.application_date.is_none()
        {
            return Err(TrackingError::MissingApplicationDate);
        }

        let previous = record.status;
        if let Some(date) = application_date {
            record.application_date = Some(date);
        }
        record.status = new_status;

        let now = Utc::now();
        let note = note
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| transition_note(previous, new_status));
        record.status_history.push(StatusHistoryEntry {
            status: new_status,
            recorded_at: now,
            note,
        });
        record.updated_at = now;

        self.records.update(record.clone())?;
        Ok(record)
    }

    /// Overwrite the owner's private notes. Does not touch the history.
    pub fn update_notes(
        &self,
        caller: &UserId,
        id: &TrackingId,
        notes: String,
    ) -> Result<TrackingRecord, TrackingError> {
        let len = notes.chars().count();
        if len > PRIVATE_NOTES_MAX_CHARS {
            return Err(TrackingError::NotesTooLong {
                max: PRIVATE_NOTES_MAX_CHARS,
                len,
            });
        }

        let mut record = self.owned_record(caller, id)?;
        record.private_notes = notes;
        record.updated_at = Utc::now();
        self.records.update(record.clone())?;
        Ok(record)
    }

    /// Stop tracking. The listing's counter is decremented best-effort; a
    /// listing that was retired in the meantime is tolerated silently.
    pub fn untrack(&self, caller: &UserId, id: &TrackingId) -> Result<(), TrackingError> {
        let record = self.owned_record(caller, id)?;
        self.records.remove(&record.id)?;

        match self.listings.fetch(&record.listing) {
            Ok(Some(mut listing)) => {
                listing.tracking_count = listing.tracking_count.saturating_sub(1);
                listing.updated_at = Utc::now();
                if let Err(error) = self.listings.update(listing) {
                    warn!(%error, tracking = %record.id.0, "tracking_count decrement failed");
                }
            }
            Ok(None) => {}
            Err(error) => {
                warn!(%error, tracking = %record.id.0, "tracking_count decrement failed");
            }
        }

        Ok(())
    }

    pub fn get(&self, caller: &UserId, id: &TrackingId) -> Result<TrackingRecord, TrackingError> {
        self.owned_record(caller, id)
    }

    /// Everything the caller tracks, newest first.
    pub fn records_for(&self, caller: &UserId) -> Result<Vec<TrackingRecord>, TrackingError> {
        let mut records = self.records.for_user(caller)?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    pub fn personal_stats(&self, caller: &UserId) -> Result<PersonalStats, TrackingError> {
        let records = self.records.for_user(caller)?;
        Ok(PersonalStats::collect(&records))
    }

    /// Anonymous aggregate for one listing; no ownership check by design.
    pub fn insights(&self, listing_id: &ListingId) -> Result<ListingInsights, TrackingError> {
        if self.listings.fetch(listing_id)?.is_none() {
            return Err(TrackingError::ListingNotFound);
        }

        let pulses = self.records.pulses_for_listing(listing_id)?;
        Ok(listing_insights(&pulses, Utc::now()))
    }

    fn owned_record(
        &self,
        caller: &UserId,
        id: &TrackingId,
    ) -> Result<TrackingRecord, TrackingError> {
        let record = self.records.fetch(id)?.ok_or(TrackingError::NotFound)?;
        if record.user != *caller {
            return Err(TrackingError::Forbidden);
        }
        Ok(record)
    }
}
