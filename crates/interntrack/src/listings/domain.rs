use crate::identity::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identifier wrapper for internship listings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

/// Identifier wrapper for comments embedded in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Remote,
    Hybrid,
    Onsite,
}

impl LocationType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Remote => "Remote",
            Self::Hybrid => "Hybrid",
            Self::Onsite => "On-site",
        }
    }
}

/// Advertised compensation band. Currency is free-form ("USD", "EUR", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: u32,
    pub max: u32,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentType {
    Tip,
    Advice,
    Culture,
    General,
}

impl CommentType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tip => "Tip",
            Self::Advice => "Advice",
            Self::Culture => "Culture",
            Self::General => "General",
        }
    }
}

/// Reactions a reader can toggle on a comment, each an independent set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentReaction {
    Helpful,
    Thanks,
    Insightful,
}

/// Like/unlike are mutually exclusive per user, unlike reactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentRating {
    Like,
    Unlike,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionSets {
    pub helpful: BTreeSet<UserId>,
    pub thanks: BTreeSet<UserId>,
    pub insightful: BTreeSet<UserId>,
}

impl ReactionSets {
    /// Toggle the user's membership in one reaction set. Returns whether the
    /// user is a member after the call.
    pub fn toggle(&mut self, reaction: CommentReaction, user: &UserId) -> bool {
        let set = match reaction {
            CommentReaction::Helpful => &mut self.helpful,
            CommentReaction::Thanks => &mut self.thanks,
            CommentReaction::Insightful => &mut self.insightful,
        };

        if set.remove(user) {
            false
        } else {
            set.insert(user.clone());
            true
        }
    }
}

/// A discussion comment embedded in its parent listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub author: UserId,
    pub text: String,
    pub comment_type: CommentType,
    pub reactions: ReactionSets,
    pub likes: BTreeSet<UserId>,
    pub unlikes: BTreeSet<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Apply a like or unlike, keeping the two sets disjoint per user.
    /// Rating the same way twice withdraws the rating.
    pub fn rate(&mut self, user: &UserId, rating: CommentRating) {
        let (chosen, opposite) = match rating {
            CommentRating::Like => (&mut self.likes, &mut self.unlikes),
            CommentRating::Unlike => (&mut self.unlikes, &mut self.likes),
        };

        if chosen.remove(user) {
            return;
        }
        opposite.remove(user);
        chosen.insert(user.clone());
    }
}

/// An internship posting. Owned by its creating user; only the owner mutates
/// it, except for the deadline sweep flipping `is_active` off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternshipListing {
    pub id: ListingId,
    pub owner: UserId,
    pub company: String,
    pub position_title: String,
    pub location: Option<String>,
    pub location_type: Option<LocationType>,
    pub application_deadline: NaiveDate,
    pub description: String,
    pub requirements: Vec<String>,
    pub application_link: Option<String>,
    pub salary_range: Option<SalaryRange>,
    pub tags: Vec<String>,
    pub is_active: bool,
    /// Derived counter of live tracking records; maintained by best-effort
    /// increment/decrement, so it can drift from the true count under crashes.
    pub tracking_count: u64,
    pub likes: BTreeSet<UserId>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InternshipListing {
    pub fn comment_mut(&mut self, id: &CommentId) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|comment| comment.id == *id)
    }

    /// Toggle the caller's like on the listing itself. Returns whether the
    /// caller likes the listing after the call.
    pub fn toggle_like(&mut self, user: &UserId) -> bool {
        if self.likes.remove(user) {
            false
        } else {
            self.likes.insert(user.clone());
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment() -> Comment {
        Comment {
            id: CommentId("c-1".to_string()),
            author: UserId::from("author"),
            text: "Ask about the return-offer rate".to_string(),
            comment_type: CommentType::Tip,
            reactions: ReactionSets::default(),
            likes: BTreeSet::new(),
            unlikes: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn like_displaces_unlike_for_the_same_user() {
        let mut comment = comment();
        let reader = UserId::from("reader");

        comment.rate(&reader, CommentRating::Unlike);
        assert!(comment.unlikes.contains(&reader));

        comment.rate(&reader, CommentRating::Like);
        assert!(comment.likes.contains(&reader));
        assert!(!comment.unlikes.contains(&reader));
    }

    #[test]
    fn repeating_a_rating_withdraws_it() {
        let mut comment = comment();
        let reader = UserId::from("reader");

        comment.rate(&reader, CommentRating::Like);
        comment.rate(&reader, CommentRating::Like);
        assert!(comment.likes.is_empty());
        assert!(comment.unlikes.is_empty());
    }

    #[test]
    fn reaction_sets_toggle_independently() {
        let mut reactions = ReactionSets::default();
        let reader = UserId::from("reader");

        assert!(reactions.toggle(CommentReaction::Helpful, &reader));
        assert!(reactions.toggle(CommentReaction::Thanks, &reader));
        assert!(reactions.helpful.contains(&reader));
        assert!(reactions.thanks.contains(&reader));

        assert!(!reactions.toggle(CommentReaction::Helpful, &reader));
        assert!(!reactions.helpful.contains(&reader));
        assert!(reactions.thanks.contains(&reader));
    }
}
