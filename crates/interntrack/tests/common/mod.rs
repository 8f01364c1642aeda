//! Shared in-memory fakes and fixtures for the integration suites.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDate, Utc};

use interntrack::identity::UserId;
use interntrack::listings::domain::{InternshipListing, ListingId};
use interntrack::listings::filter::{ListingFilter, ListingSort};
use interntrack::listings::repository::{ListingRepository, ListingStoreError};
use interntrack::listings::service::{ListingDraft, ListingService};
use interntrack::tracking::domain::{TrackingId, TrackingPulse, TrackingRecord};
use interntrack::tracking::repository::{TrackingRepository, TrackingStoreError};
use interntrack::tracking::service::TrackingService;

#[derive(Default)]
pub struct MemoryListings {
    records: Mutex<HashMap<ListingId, InternshipListing>>,
}

impl ListingRepository for MemoryListings {
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
        if !guard.contains_key(&listing.id) {
            return Err(ListingStoreError::NotFound);
        }
        guard.insert(listing.id.clone(), listing);
        Ok(())
    }

    fn remove(&self, id: &ListingId) -> Result<(), ListingStoreError> {
        let mut guard = self.records.lock().expect("listing mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(ListingStoreError::NotFound)
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

/// Tracking store enforcing the (user, listing) unique index the way the
/// real persistence layer would.
#[derive(Default)]
pub struct MemoryTracking {
    records: Mutex<HashMap<TrackingId, TrackingRecord>>,
}

impl TrackingRepository for MemoryTracking {
    fn insert(&self, record: TrackingRecord) -> Result<TrackingRecord, TrackingStoreError> {
        let mut guard = self.records.lock().expect("tracking mutex poisoned");
        let duplicate = guard
            .values()
            .any(|existing| existing.user == record.user && existing.listing == record.listing);
        if duplicate || guard.contains_key(&record.id) {
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
        if !guard.contains_key(&record.id) {
            return Err(TrackingStoreError::NotFound);
        }
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn remove(&self, id: &TrackingId) -> Result<(), TrackingStoreError> {
        let mut guard = self.records.lock().expect("tracking mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(TrackingStoreError::NotFound)
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

pub struct Harness {
    pub listings: Arc<MemoryListings>,
    pub tracking: Arc<MemoryTracking>,
    pub listing_service: Arc<ListingService<MemoryListings>>,
    pub tracking_service: Arc<TrackingService<MemoryListings, MemoryTracking>>,
}

pub fn harness() -> Harness {
    let listings = Arc::new(MemoryListings::default());
    let tracking = Arc::new(MemoryTracking::default());
    Harness {
        listing_service: Arc::new(ListingService::new(listings.clone())),
        tracking_service: Arc::new(TrackingService::new(listings.clone(), tracking.clone())),
        listings,
        tracking,
    }
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn draft(company: &str, deadline: NaiveDate) -> ListingDraft {
    ListingDraft {
        company: company.to_string(),
        position_title: "Software Engineering Intern".to_string(),
        location: Some("Des Moines, IA".to_string()),
        location_type: None,
        application_deadline: deadline,
        description: "Summer internship on the platform team".to_string(),
        requirements: vec!["Rust".to_string(), "SQL".to_string()],
        application_link: Some("https://careers.example.com/intern".to_string()),
        salary_range: None,
        tags: vec!["rust".to_string(), "backend".to_string()],
    }
}

pub fn publish(harness: &Harness, owner: &str, company: &str, offset_days: i64) -> InternshipListing {
    harness
        .listing_service
        .publish(
            UserId::from(owner),
            draft(company, today() + Duration::days(offset_days)),
        )
        .expect("listing publishes")
}
