use crate::identity::UserId;
use crate::listings::domain::ListingId;

use super::domain::{TrackingId, TrackingPulse, TrackingRecord};

/// Storage abstraction for tracking records.
///
/// The (user, listing) uniqueness invariant lives here: the application
/// performs check-then-act with no locking, so `insert` must reject a second
/// record for an existing pair the way a unique index would, even under
/// concurrent requests.
pub trait TrackingRepository: Send + Sync {
    fn insert(&self, record: TrackingRecord) -> Result<TrackingRecord, TrackingStoreError>;
    fn fetch(&self, id: &TrackingId) -> Result<Option<TrackingRecord>, TrackingStoreError>;
    fn update(&self, record: TrackingRecord) -> Result<(), TrackingStoreError>;
    fn remove(&self, id: &TrackingId) -> Result<(), TrackingStoreError>;
    /// All records owned by one user, for the personal board and stats.
    fn for_user(&self, user: &UserId) -> Result<Vec<TrackingRecord>, TrackingStoreError>;
    /// Identity-free projections for one listing, for the public insights.
    fn pulses_for_listing(
        &self,
        listing: &ListingId,
    ) -> Result<Vec<TrackingPulse>, TrackingStoreError>;
}

/// Error enumeration for tracking storage failures.
#[derive(Debug, thiserror::Error)]
pub enum TrackingStoreError {
    #[error("tracking record already exists for this listing")]
    Conflict,
    #[error("tracking record not found")]
    NotFound,
    #[error("tracking store unavailable: {0}")]
    Unavailable(String),
}
