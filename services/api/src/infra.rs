use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use interntrack::identity::UserId;
use interntrack::listings::domain::{InternshipListing, ListingId};
use interntrack::listings::filter::{ListingFilter, ListingSort};
use interntrack::listings::repository::{ListingRepository, ListingStoreError};
use interntrack::tracking::domain::{TrackingId, TrackingPulse, TrackingRecord};
use interntrack::tracking::repository::{TrackingRepository, TrackingStoreError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
pub(crate) struct InMemoryListingRepository {
    records: Mutex<HashMap<ListingId, InternshipListing>>,
}

impl ListingRepository for InMemoryListingRepository {
    fn insert(&self, listing: InternshipListing) -> Result<InternshipListing, ListingStoreError> {
        let mut guard = self.records.lock().expect("listing mutex poisoned");
        if guard.contains_key(&listing.id) {
            return Err(ListingStoreError::Conflict);
        }
        guard.insert(listing.id.clone(), listing.clone());
        Ok(listing)
    }

    fn fetch(&self, id: &ListingId) -> Result<Option<InternshipListing>, ListingStoreError> {
        let guard = self.records.lock().expect("listing mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, listing: InternshipListing) -> Result<(), ListingStoreError> {
        let mut guard = self.records.lock().expect("listing mutex poisoned");
        if guard.contains_key(&listing.id) {
            guard.insert(listing.id.clone(), listing);
            Ok(())
        } else {
            Err(ListingStoreError::NotFound)
        }
    }

    fn remove(&self, id: &ListingId) -> Result<(), ListingStoreError> {
        let mut guard = self.records.lock().expect("listing mutex poisoned");
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(ListingStoreError::NotFound)
    }

    fn search(
        &self,
        filter: &ListingFilter,
        sort: ListingSort,
    ) -> Result<Vec<InternshipListing>, ListingStoreError> {
        let guard = self.records.lock().expect("listing mutex poisoned");
        let mut hits: Vec<InternshipListing> = guard
            .values()
            .filter(|listing| filter.matches(listing))
            .cloned()
            .collect();
        sort.apply(&mut hits);
        Ok(hits)
    }
}

/// In-memory tracking store. `insert` enforces the (user, listing) unique
/// index, which is the only thing standing between concurrent duplicate
/// tracks and a double record.
#[derive(Default)]
pub(crate) struct InMemoryTrackingRepository {
    records: Mutex<HashMap<TrackingId, TrackingRecord>>,
}

impl TrackingRepository for InMemoryTrackingRepository {
    fn insert(&self, record: TrackingRecord) -> Result<TrackingRecord, TrackingStoreError> {
        let mut guard = self.records.lock().expect("tracking mutex poisoned");
        let duplicate_pair = guard
            .values()
            .any(|existing| existing.user == record.user && existing.listing == record.listing);
        if duplicate_pair || guard.contains_key(&record.id) {
            return Err(TrackingStoreError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &TrackingId) -> Result<Option<TrackingRecord>, TrackingStoreError> {
        let guard = self.records.lock().expect("tracking mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, record: TrackingRecord) -> Result<(), TrackingStoreError> {
        let mut guard = self.records.lock().expect("tracking mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(TrackingStoreError::NotFound)
        }
    }

    fn remove(&self, id: &TrackingId) -> Result<(), TrackingStoreError> {
        let mut guard = self.records.lock().expect("tracking mutex poisoned");
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(TrackingStoreError::NotFound)
    }

    fn for_user(&self, user: &UserId) -> Result<Vec<TrackingRecord>, TrackingStoreError> {
        let guard = self.records.lock().expect("tracking mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.user == *user)
            .cloned()
            .collect())
    }

    fn pulses_for_listing(
        &self,
        listing: &ListingId,
    ) -> Result<Vec<TrackingPulse>, TrackingStoreError> {
        let guard = self.records.lock().expect("tracking mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.listing == *listing)
            .map(TrackingRecord::pulse)
            .collect())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
