pub mod domain;
pub mod insights;
pub mod repository;
pub mod router;
pub mod service;
pub mod stats;

pub use domain::{
    ApplicationStatus, StatusHistoryEntry, TrackingId, TrackingPulse, TrackingRecord,
    PRIVATE_NOTES_MAX_CHARS,
};
pub use insights::{listing_insights, InterestLevel, ListingInsights, RECENT_ACTIVITY_WINDOW_DAYS};
pub use repository::{TrackingRepository, TrackingStoreError};
pub use router::tracking_router;
pub use service::{TrackingError, TrackingService};
pub use stats::PersonalStats;
