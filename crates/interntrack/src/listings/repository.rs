use super::domain::{InternshipListing, ListingId};
use super::filter::{ListingFilter, ListingSort};

/// Storage abstraction for the listing catalog so services and the sweep can
/// be exercised against in-memory fakes. `search` applies the filter/sort
/// pair produced by the builder; implementations share its semantics via
/// [`ListingFilter::matches`] and [`ListingSort::apply`].
pub trait ListingRepository: Send + Sync {
    fn insert(&self, listing: InternshipListing) -> Result<InternshipListing, ListingStoreError>;
    fn fetch(&self, id: &ListingId) -> Result<Option<InternshipListing>, ListingStoreError>;
    fn update(&self, listing: InternshipListing) -> Result<(), ListingStoreError>;
    fn remove(&self, id: &ListingId) -> Result<(), ListingStoreError>;
    fn search(
        &self,
        filter: &ListingFilter,
        sort: ListingSort,
    ) -> Result<Vec<InternshipListing>, ListingStoreError>;
}

/// Error enumeration for listing storage failures.
#[derive(Debug, thiserror::Error)]
pub enum ListingStoreError {
    #[error("listing already exists")]
    Conflict,
    #[error("listing not found")]
    NotFound,
    #[error("listing store unavailable: {0}")]
    Unavailable(String),
}
