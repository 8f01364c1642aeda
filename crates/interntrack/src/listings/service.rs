use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

use crate::identity::UserId;

use super::deadline::is_expired;
use super::domain::{
    Comment, CommentId, CommentRating, CommentReaction, CommentType, InternshipListing, ListingId,
    LocationType, SalaryRange,
};
use super::filter::{build_query, FilterError, ListingQueryParams};
use super::repository::{ListingRepository, ListingStoreError};

/// Owner-supplied fields for a new listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingDraft {
    pub company: String,
    pub position_title: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub location_type: Option<LocationType>,
    pub application_deadline: NaiveDate,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub application_link: Option<String>,
    #[serde(default)]
    pub salary_range: Option<SalaryRange>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update; absent fields keep their current value. `is_active` is not
/// editable here: the sweep owns the true-to-false transition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingChanges {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position_title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub location_type: Option<LocationType>,
    #[serde(default)]
    pub application_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Option<Vec<String>>,
    #[serde(default)]
    pub application_link: Option<String>,
    #[serde(default)]
    pub salary_range: Option<SalaryRange>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },
    #[error("comment text must not be empty")]
    EmptyComment,
    #[error("listing not found")]
    NotFound,
    #[error("comment not found")]
    CommentNotFound,
    #[error("only the listing owner may modify it")]
    Forbidden,
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Store(#[from] ListingStoreError),
}

/// Catalog operations over a listing repository. Caller identity is always an
/// explicit argument; ownership checks happen here, not in middleware.
pub struct ListingService<R> {
    repository: Arc<R>,
}

static LISTING_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static COMMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_listing_id() -> ListingId {
    let id = LISTING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ListingId(format!("lst-{id:06}"))
}

fn next_comment_id() -> CommentId {
    let id = COMMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CommentId(format!("cmt-{id:06}"))
}

impl<R> ListingService<R>
where
    R: ListingRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Direct repository access for batch operations such as the sweep.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Publish a new listing. A draft whose deadline day has already elapsed
    /// publishes inactive so it never shows up in active searches.
    pub fn publish(
        &self,
        owner: UserId,
        draft: ListingDraft,
    ) -> Result<InternshipListing, ListingError> {
        require_non_blank(&draft.company, "company")?;
        require_non_blank(&draft.position_title, "position_title")?;
        require_non_blank(&draft.description, "description")?;

        let now = Utc::now();
        let listing = InternshipListing {
            id: next_listing_id(),
            owner,
            company: draft.company,
            position_title: draft.position_title,
            location: draft.location,
            location_type: draft.location_type,
            application_deadline: draft.application_deadline,
            description: draft.description,
            requirements: draft.requirements,
            application_link: draft.application_link,
            salary_range: draft.salary_range,
            tags: draft.tags,
            is_active: !is_expired(draft.application_deadline, now.date_naive()),
            tracking_count: 0,
            likes: Default::default(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(listing)?;
        info!(listing = %stored.id.0, company = %stored.company, "listing published");
        Ok(stored)
    }

    pub fn get(&self, id: &ListingId) -> Result<InternshipListing, ListingError> {
        self.repository.fetch(id)?.ok_or(ListingError::NotFound)
    }

    /// Run a catalog search from raw query parameters.
    pub fn search(
        &self,
        params: &ListingQueryParams,
    ) -> Result<Vec<InternshipListing>, ListingError> {
        let (filter, sort) = build_query(params)?;
        Ok(self.repository.search(&filter, sort)?)
    }

    pub fn edit(
        &self,
        caller: &UserId,
        id: &ListingId,
        changes: ListingChanges,
    ) -> Result<InternshipListing, ListingError> {
        let mut listing = self.owned_listing(caller, id)?;

        if let Some(company) = changes.company {
            require_non_blank(&company, "company")?;
            listing.company = company;
        }
        if let Some(title) = changes.position_title {
            require_non_blank(&title, "position_title")?;
            listing.position_title = title;
        }
        if let Some(location) = changes.location {
            listing.location = Some(location);
        }
        if let Some(location_type) = changes.location_type {
            listing.location_type = Some(location_type);
        }
        if let Some(deadline) = changes.application_deadline {
            listing.application_deadline = deadline;
        }
        if let Some(description) = changes.description {
            require_non_blank(&description, "description")?;
            listing.description = description;
        }
        if let Some(requirements) = changes.requirements {
            listing.requirements = requirements;
        }
        if let Some(link) = changes.application_link {
            listing.application_link = Some(link);
        }
        if let Some(range) = changes.salary_range {
            listing.salary_range = Some(range);
        }
        if let Some(tags) = changes.tags {
            listing.tags = tags;
        }

        listing.updated_at = Utc::now();
        self.repository.update(listing.clone())?;
        Ok(listing)
    }

    /// Remove a listing. Tracking records that reference it are left behind
    /// as dangling references and tolerated by the tracking reads.
    pub fn retire(&self, caller: &UserId, id: &ListingId) -> Result<(), ListingError> {
        let listing = self.owned_listing(caller, id)?;
        self.repository.remove(&listing.id)?;
        info!(listing = %listing.id.0, "listing retired");
        Ok(())
    }

    pub fn add_comment(
        &self,
        author: UserId,
        id: &ListingId,
        text: String,
        comment_type: CommentType,
    ) -> Result<Comment, ListingError> {
        if text.trim().is_empty() {
            return Err(ListingError::EmptyComment);
        }

        let mut listing = self.get(id)?;
        let comment = Comment {
            id: next_comment_id(),
            author,
            text,
            comment_type,
            reactions: Default::default(),
            likes: Default::default(),
            unlikes: Default::default(),
            created_at: Utc::now(),
        };
        listing.comments.push(comment.clone());
        listing.updated_at = Utc::now();
        self.repository.update(listing)?;
        Ok(comment)
    }

    pub fn react_to_comment(
        &self,
        user: &UserId,
        id: &ListingId,
        comment_id: &CommentId,
        reaction: CommentReaction,
    ) -> Result<Comment, ListingError> {
        self.with_comment(id, comment_id, |comment| {
            comment.reactions.toggle(reaction, user);
        })
    }

    pub fn rate_comment(
        &self,
        user: &UserId,
        id: &ListingId,
        comment_id: &CommentId,
        rating: CommentRating,
    ) -> Result<Comment, ListingError> {
        self.with_comment(id, comment_id, |comment| {
            comment.rate(user, rating);
        })
    }

    /// Toggle the caller's like on the listing. Returns the updated listing.
    pub fn toggle_like(
        &self,
        user: &UserId,
        id: &ListingId,
    ) -> Result<InternshipListing, ListingError> {
        let mut listing = self.get(id)?;
        listing.toggle_like(user);
        listing.updated_at = Utc::now();
        self.repository.update(listing.clone())?;
        Ok(listing)
    }

    fn owned_listing(
        &self,
        caller: &UserId,
        id: &ListingId,
    ) -> Result<InternshipListing, ListingError> {
        let listing = self.get(id)?;
        if listing.owner != *caller {
            return Err(ListingError::Forbidden);
        }
        Ok(listing)
    }

    fn with_comment(
        &self,
        id: &ListingId,
        comment_id: &CommentId,
        mutate: impl FnOnce(&mut Comment),
    ) -> Result<Comment, ListingError> {
        let mut listing = self.get(id)?;
        let comment = listing
            .comment_mut(comment_id)
            .ok_or(ListingError::CommentNotFound)?;
        mutate(comment);
        let snapshot = comment.clone();
        listing.updated_at = Utc::now();
        self.repository.update(listing)?;
        Ok(snapshot)
    }
}

fn require_non_blank(value: &str, field: &'static str) -> Result<(), ListingError> {
    if value.trim().is_empty() {
        Err(ListingError::MissingField { field })
    } else {
        Ok(())
    }
}
