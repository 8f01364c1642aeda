//! Translates flat query-string parameters into a listing search descriptor.
//!
//! The builder is a pure function: the same parameter bag always produces the
//! same `(ListingFilter, ListingSort)` pair, and a malformed date fails the
//! whole build with the offending field named, never a partial result.

use super::domain::InternshipListing;
use chrono::NaiveDate;
use serde::Deserialize;

/// Raw query parameters as received from URL query-string parsing. Every
/// field is an optional string; interpretation happens in [`build_query`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQueryParams {
    pub company: Option<String>,
    pub location: Option<String>,
    pub deadline_from: Option<String>,
    pub deadline_to: Option<String>,
    pub tags: Option<String>,
    pub search: Option<String>,
    pub active: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("{field} must be a YYYY-MM-DD date, got '{value}'")]
    InvalidDate { field: &'static str, value: String },
}

impl FilterError {
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidDate { field, .. } => field,
        }
    }
}

/// Conjunction of the active sub-filters. An empty filter matches every
/// listing. Substring needles are stored lowercased.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub company_contains: Option<String>,
    pub location_contains: Option<String>,
    pub deadline_from: Option<NaiveDate>,
    pub deadline_to: Option<NaiveDate>,
    pub tags_any: Vec<String>,
    pub search_term: Option<String>,
    pub active: Option<bool>,
}

impl ListingFilter {
    pub fn matches(&self, listing: &InternshipListing) -> bool {
        if let Some(needle) = &self.company_contains {
            if !listing.company.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }

        if let Some(needle) = &self.location_contains {
            let found = listing
                .location
                .as_deref()
                .is_some_and(|location| location.to_lowercase().contains(needle.as_str()));
            if !found {
                return false;
            }
        }

        if let Some(from) = self.deadline_from {
            if listing.application_deadline < from {
                return false;
            }
        }

        if let Some(to) = self.deadline_to {
            if listing.application_deadline > to {
                return false;
            }
        }

        if !self.tags_any.is_empty() {
            let intersects = listing
                .tags
                .iter()
                .any(|tag| self.tags_any.iter().any(|wanted| wanted == tag));
            if !intersects {
                return false;
            }
        }

        if let Some(term) = &self.search_term {
            let hit = listing.company.to_lowercase().contains(term.as_str())
                || listing.position_title.to_lowercase().contains(term.as_str())
                || listing.description.to_lowercase().contains(term.as_str());
            if !hit {
                return false;
            }
        }

        if let Some(active) = self.active {
            if listing.is_active != active {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingSort {
    /// Ascending application deadline, soonest first.
    DeadlineSoonest,
    /// Descending tracking count, most-tracked first.
    MostTracked,
    /// Descending creation date, newest first. The default.
    #[default]
    NewestFirst,
}

impl ListingSort {
    pub fn apply(self, listings: &mut [InternshipListing]) {
        match self {
            Self::DeadlineSoonest => {
                listings.sort_by_key(|listing| listing.application_deadline);
            }
            Self::MostTracked => {
                listings.sort_by(|a, b| b.tracking_count.cmp(&a.tracking_count));
            }
            Self::NewestFirst => {
                listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
        }
    }
}

/// Build the filter/sort pair from raw parameters.
pub fn build_query(params: &ListingQueryParams) -> Result<(ListingFilter, ListingSort), FilterError> {
    let mut filter = ListingFilter::default();

    if let Some(company) = normalized(&params.company) {
        filter.company_contains = Some(company.to_lowercase());
    }

    if let Some(location) = normalized(&params.location) {
        filter.location_contains = Some(location.to_lowercase());
    }

    filter.deadline_from = parse_bound(&params.deadline_from, "deadline_from")?;
    filter.deadline_to = parse_bound(&params.deadline_to, "deadline_to")?;

    if let Some(raw) = &params.tags {
        for piece in raw.split(',') {
            let tag = piece.trim();
            if tag.is_empty() || filter.tags_any.iter().any(|seen| seen == tag) {
                continue;
            }
            filter.tags_any.push(tag.to_string());
        }
    }

    if let Some(term) = normalized(&params.search) {
        filter.search_term = Some(term.to_lowercase());
    }

    // Only the exact literals carry meaning; anything else is ignored rather
    // than rejected, matching lenient query-string handling.
    filter.active = match params.active.as_deref() {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    };

    let sort = match params.sort.as_deref() {
        Some("deadline") => ListingSort::DeadlineSoonest,
        Some("tracking") => ListingSort::MostTracked,
        _ => ListingSort::NewestFirst,
    };

    Ok((filter, sort))
}

fn normalized(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_bound(
    value: &Option<String>,
    field: &'static str,
) -> Result<Option<NaiveDate>, FilterError> {
    let Some(raw) = normalized(value) else {
        return Ok(None);
    };

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| FilterError::InvalidDate {
            field,
            value: raw.to_string(),
        })
}
