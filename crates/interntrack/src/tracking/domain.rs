use crate::identity::UserId;
use crate::listings::domain::ListingId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for tracking records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackingId(pub String);

/// Upper bound on the owner-visible free-text notes.
pub const PRIVATE_NOTES_MAX_CHARS: usize = 2000;

/// Lifecycle position of one user's pursuit of one listing.
///
/// Any state may transition to any other: users fix mis-clicks and record
/// offers that fall through, so the machine stays permissive and keeps the
/// full trail in `status_history` instead of constraining the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    NotApplied,
    Applied,
    Interviewing,
    OfferReceived,
    Rejected,
    Accepted,
    Declined,
}

impl ApplicationStatus {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::NotApplied,
            Self::Applied,
            Self::Interviewing,
            Self::OfferReceived,
            Self::Rejected,
            Self::Accepted,
            Self::Declined,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NotApplied => "Not Applied",
            Self::Applied => "Applied",
            Self::Interviewing => "Interviewing",
            Self::OfferReceived => "Offer Received",
            Self::Rejected => "Rejected",
            Self::Accepted => "Accepted",
            Self::Declined => "Declined",
        }
    }
}

/// One entry in the append-only status trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub status: ApplicationStatus,
    pub recorded_at: DateTime<Utc>,
    pub note: String,
}

/// The join entity between a user and a listing. At most one record exists
/// per (user, listing) pair; the repository enforces the uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingRecord {
    pub id: TrackingId,
    pub user: UserId,
    pub listing: ListingId,
    pub status: ApplicationStatus,
    pub application_date: Option<NaiveDate>,
    /// Append-only; entries are never rewritten or reordered.
    pub status_history: Vec<StatusHistoryEntry>,
    pub private_notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TrackingRecord {
    /// Identity-free projection used by the public insights aggregate.
    pub fn pulse(&self) -> TrackingPulse {
        TrackingPulse {
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// What the anonymous aggregate is allowed to see: status and age, nothing
/// that could identify the tracking user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackingPulse {
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

pub(crate) fn transition_note(from: ApplicationStatus, to: ApplicationStatus) -> String {
    if from == to {
        format!("status reaffirmed as {}", to.label())
    } else {
        format!("status changed from {} to {}", from.label(), to.label())
    }
}

pub(crate) fn initial_note(status: ApplicationStatus) -> String {
    format!("tracking started as {}", status.label())
}
