pub mod deadline;
pub mod domain;
pub mod filter;
pub mod repository;
pub mod router;
pub mod service;
pub mod sweep;

pub use deadline::{classify, days_remaining, is_expired, DeadlineProximity};
pub use domain::{
    Comment, CommentId, CommentRating, CommentReaction, CommentType, InternshipListing, ListingId,
    LocationType, ReactionSets, SalaryRange,
};
pub use filter::{build_query, FilterError, ListingFilter, ListingQueryParams, ListingSort};
pub use repository::{ListingRepository, ListingStoreError};
pub use router::listing_router;
pub use service::{ListingChanges, ListingDraft, ListingError, ListingService};
pub use sweep::{deactivate_expired, SweepOutcome, SweptListing};
