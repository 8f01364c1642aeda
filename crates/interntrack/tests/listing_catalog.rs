//! Catalog specifications: publishing, ownership, search, and comments.

mod common;

use common::{draft, harness, publish, today};
use interntrack::identity::UserId;
use interntrack::listings::domain::{CommentRating, CommentReaction, CommentType};
use interntrack::listings::filter::ListingQueryParams;
use interntrack::listings::service::{ListingChanges, ListingError};

#[test]
fn publish_validates_required_fields() {
    let harness = harness();
    let mut bad = draft("Acme", today());
    bad.company = "   ".to_string();

    match harness
        .listing_service
        .publish(UserId::from("poster"), bad)
    {
        Err(ListingError::MissingField { field: "company" }) => {}
        other => panic!("expected missing company, got {other:?}"),
    }
}

#[test]
fn past_deadline_publishes_inactive() {
    let harness = harness();
    let listing = publish(&harness, "poster", "Stale Co", -3);
    assert!(!listing.is_active);

    let listing = publish(&harness, "poster", "Fresh Co", 3);
    assert!(listing.is_active);
}

#[test]
fn search_composes_filters_conjunctively() {
    let harness = harness();
    publish(&harness, "poster", "Acme Robotics", 5);
    publish(&harness, "poster", "Acme Biotech", 40);
    publish(&harness, "poster", "Globex", 5);

    let params = ListingQueryParams {
        company: Some("acme".to_string()),
        deadline_to: Some((today() + chrono::Duration::days(10)).format("%Y-%m-%d").to_string()),
        ..Default::default()
    };
    let hits = harness.listing_service.search(&params).expect("search runs");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].company, "Acme Robotics");
}

#[test]
fn search_sorts_by_tracking_when_asked() {
    let harness = harness();
    let quiet = publish(&harness, "poster", "Quiet", 30);
    let popular = publish(&harness, "poster", "Popular", 30);

    for index in 0..3 {
        harness
            .tracking_service
            .track(
                UserId(format!("fan-{index}")),
                popular.id.clone(),
                None,
                None,
            )
            .expect("tracks popular");
    }
    harness
        .tracking_service
        .track(UserId::from("lone-fan"), quiet.id, None, None)
        .expect("tracks quiet");

    let params = ListingQueryParams {
        sort: Some("tracking".to_string()),
        ..Default::default()
    };
    let hits = harness.listing_service.search(&params).expect("search runs");
    assert_eq!(hits[0].company, "Popular");
    assert_eq!(hits[0].tracking_count, 3);
}

#[test]
fn edit_and_retire_are_owner_only() {
    let harness = harness();
    let listing = publish(&harness, "poster", "Acme", 30);
    let intruder = UserId::from("intruder");

    assert!(matches!(
        harness
            .listing_service
            .edit(&intruder, &listing.id, ListingChanges::default()),
        Err(ListingError::Forbidden)
    ));
    assert!(matches!(
        harness.listing_service.retire(&intruder, &listing.id),
        Err(ListingError::Forbidden)
    ));

    let changes = ListingChanges {
        position_title: Some("Platform Engineering Intern".to_string()),
        ..Default::default()
    };
    let updated = harness
        .listing_service
        .edit(&UserId::from("poster"), &listing.id, changes)
        .expect("owner edits");
    assert_eq!(updated.position_title, "Platform Engineering Intern");
    assert_eq!(updated.company, "Acme", "untouched fields survive");

    harness
        .listing_service
        .retire(&UserId::from("poster"), &listing.id)
        .expect("owner retires");
    assert!(matches!(
        harness.listing_service.get(&listing.id),
        Err(ListingError::NotFound)
    ));
}

#[test]
fn comments_collect_reactions_and_exclusive_ratings() {
    let harness = harness();
    let listing = publish(&harness, "poster", "Acme", 30);

    let comment = harness
        .listing_service
        .add_comment(
            UserId::from("alum"),
            &listing.id,
            "Interview loop is two rounds, both technical".to_string(),
            CommentType::Tip,
        )
        .expect("comment lands");

    let reader = UserId::from("reader");
    let updated = harness
        .listing_service
        .react_to_comment(&reader, &listing.id, &comment.id, CommentReaction::Helpful)
        .expect("reaction toggles on");
    assert!(updated.reactions.helpful.contains(&reader));

    let updated = harness
        .listing_service
        .rate_comment(&reader, &listing.id, &comment.id, CommentRating::Unlike)
        .expect("unlike lands");
    assert!(updated.unlikes.contains(&reader));

    let updated = harness
        .listing_service
        .rate_comment(&reader, &listing.id, &comment.id, CommentRating::Like)
        .expect("like displaces unlike");
    assert!(updated.likes.contains(&reader));
    assert!(!updated.unlikes.contains(&reader));

    // a second reader's reaction piles onto the same set
    let other = UserId::from("other");
    let updated = harness
        .listing_service
        .react_to_comment(&other, &listing.id, &comment.id, CommentReaction::Helpful)
        .expect("second reaction lands");
    assert_eq!(updated.reactions.helpful.len(), 2);
}

#[test]
fn blank_comments_are_rejected() {
    let harness = harness();
    let listing = publish(&harness, "poster", "Acme", 30);

    assert!(matches!(
        harness.listing_service.add_comment(
            UserId::from("alum"),
            &listing.id,
            "  \n ".to_string(),
            CommentType::General,
        ),
        Err(ListingError::EmptyComment)
    ));
}

#[test]
fn listing_likes_toggle() {
    let harness = harness();
    let listing = publish(&harness, "poster", "Acme", 30);
    let fan = UserId::from("fan");

    let updated = harness
        .listing_service
        .toggle_like(&fan, &listing.id)
        .expect("like lands");
    assert!(updated.likes.contains(&fan));

    let updated = harness
        .listing_service
        .toggle_like(&fan, &listing.id)
        .expect("like withdraws");
    assert!(updated.likes.is_empty());
}
