//! Batch deactivation of listings whose deadline day has fully elapsed.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::deadline::is_expired;
use super::domain::ListingId;
use super::filter::{ListingFilter, ListingSort};
use super::repository::{ListingRepository, ListingStoreError};

/// Identifying details of one listing the sweep deactivated.
#[derive(Debug, Clone, Serialize)]
pub struct SweptListing {
    pub id: ListingId,
    pub company: String,
    pub position_title: String,
    pub application_deadline: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepOutcome {
    pub modified: usize,
    pub deactivated: Vec<SweptListing>,
}

/// Flip `is_active` off on every active listing whose deadline is strictly
/// before `today`. Idempotent: already-inactive listings are never touched,
/// so a second run over the same data reports zero modified. The flip is
/// one-way; nothing here ever reactivates a listing.
pub fn deactivate_expired<R>(
    repository: &R,
    today: NaiveDate,
) -> Result<SweepOutcome, ListingStoreError>
where
    R: ListingRepository,
{
    let filter = ListingFilter {
        active: Some(true),
        ..Default::default()
    };
    let candidates = repository.search(&filter, ListingSort::DeadlineSoonest)?;

    let mut deactivated = Vec::new();
    for mut listing in candidates {
        if !is_expired(listing.application_deadline, today) {
            continue;
        }

        listing.is_active = false;
        listing.updated_at = Utc::now();
        let swept = SweptListing {
            id: listing.id.clone(),
            company: listing.company.clone(),
            position_title: listing.position_title.clone(),
            application_deadline: listing.application_deadline,
        };
        repository.update(listing)?;
        debug!(listing = %swept.id.0, deadline = %swept.application_deadline, "listing deactivated");
        deactivated.push(swept);
    }

    info!(modified = deactivated.len(), "deadline sweep finished");
    Ok(SweepOutcome {
        modified: deactivated.len(),
        deactivated,
    })
}
