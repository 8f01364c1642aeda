use crate::infra::{parse_date, InMemoryListingRepository, InMemoryTrackingRepository};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use std::sync::Arc;

use interntrack::error::AppError;
use interntrack::identity::UserId;
use interntrack::listings::deadline::{classify, days_remaining};
use interntrack::listings::domain::{CommentType, InternshipListing};
use interntrack::listings::repository::ListingRepository;
use interntrack::listings::service::{ListingDraft, ListingError, ListingService};
use interntrack::listings::sweep::deactivate_expired;
use interntrack::tracking::domain::ApplicationStatus;
use interntrack::tracking::service::TrackingService;

#[derive(Args, Debug)]
pub(crate) struct DeadlineCheckArgs {
    /// Application deadline to classify (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) deadline: NaiveDate,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date for proximity, insights, and the sweep (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_deadline_check(args: DeadlineCheckArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let days = days_remaining(args.deadline, today);
    let level = classify(args.deadline, today);

    println!("Deadline {} evaluated on {}", args.deadline, today);
    match days {
        days if days < 0 => println!("Passed {} day(s) ago", -days),
        0 => println!("Due today"),
        days => println!("{days} day(s) remaining"),
    }
    println!("Proximity level: {}", level.label());

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let listings = Arc::new(InMemoryListingRepository::default());
    let tracking = Arc::new(InMemoryTrackingRepository::default());
    let listing_service = ListingService::new(listings.clone());
    let tracking_service = TrackingService::new(listings.clone(), tracking);

    println!("InternTrack demo (evaluated {today})");

    let poster = UserId::from("career-center");
    let stale = listing_service.publish(
        poster.clone(),
        draft("Stale Systems", "Backend Intern", today + Duration::days(10)),
    )?;
    let urgent = listing_service.publish(
        poster.clone(),
        draft("Urgent Analytics", "Data Intern", today + Duration::days(2)),
    )?;
    let relaxed = listing_service.publish(
        poster,
        draft("Relaxed Robotics", "Controls Intern", today + Duration::days(45)),
    )?;

    // age the first listing past its deadline so the sweep has work to do
    let mut aged = listing_service.get(&stale.id)?;
    aged.application_deadline = today - Duration::days(1);
    listings
        .as_ref()
        .update(aged)
        .map_err(ListingError::Store)?;

    let ana = UserId::from("ana");
    let ben = UserId::from("ben");
    let cara = UserId::from("cara");

    let ana_urgent = tracking_service.track(ana.clone(), urgent.id.clone(), None, None)?;
    let ben_urgent = tracking_service.track(ben.clone(), urgent.id.clone(), None, None)?;
    tracking_service.track(cara, urgent.id.clone(), None, None)?;
    let ana_relaxed = tracking_service.track(ana.clone(), relaxed.id.clone(), None, None)?;

    tracking_service.update_status(
        &ana,
        &ana_urgent.id,
        ApplicationStatus::Applied,
        Some(today),
        Some("Submitted through the company portal".to_string()),
    )?;
    tracking_service.update_status(
        &ana,
        &ana_urgent.id,
        ApplicationStatus::Interviewing,
        None,
        None,
    )?;
    tracking_service.update_status(
        &ben,
        &ben_urgent.id,
        ApplicationStatus::Applied,
        Some(today),
        None,
    )?;
    tracking_service.update_notes(
        &ana,
        &ana_relaxed.id,
        "Recruiter said applications open next month".to_string(),
    )?;

    listing_service.add_comment(
        ben,
        &urgent.id,
        "Phone screen was all SQL questions".to_string(),
        CommentType::Tip,
    )?;

    println!("\nCatalog");
    for listing in listing_service.search(&Default::default())? {
        render_listing(&listing, today);
    }

    let outcome = deactivate_expired(listings.as_ref(), today).map_err(ListingError::Store)?;
    println!("\nDeadline sweep: {} listing(s) deactivated", outcome.modified);
    for swept in &outcome.deactivated {
        println!(
            "- {} | {} | deadline {}",
            swept.company, swept.position_title, swept.application_deadline
        );
    }

    let stats = tracking_service.personal_stats(&ana)?;
    println!("\nAna's pipeline");
    println!(
        "- {} tracked | {} saved | {} applied | {} interviewing",
        stats.total, stats.not_applied, stats.applied, stats.interviewing
    );

    let insights = tracking_service.insights(&urgent.id)?;
    println!("\nInsights for {} ({})", urgent.company, urgent.position_title);
    println!(
        "- {} tracker(s) | {} saved | {} applied | {} interviewing | {} offer(s)",
        insights.total, insights.saved, insights.applied, insights.interviewing, insights.offers
    );
    println!(
        "- interest {} | application rate {}% | {} new this week",
        insights.interest_level.label(),
        insights.application_rate,
        insights.recent_activity
    );

    Ok(())
}

fn draft(company: &str, title: &str, deadline: NaiveDate) -> ListingDraft {
    ListingDraft {
        company: company.to_string(),
        position_title: title.to_string(),
        location: Some("Des Moines, IA".to_string()),
        location_type: None,
        application_deadline: deadline,
        description: format!("{title} position at {company} for next summer"),
        requirements: vec!["Enrolled in a CS program".to_string()],
        application_link: None,
        salary_range: None,
        tags: vec!["internship".to_string()],
    }
}

fn render_listing(listing: &InternshipListing, today: NaiveDate) {
    let proximity = classify(listing.application_deadline, today);
    let activity = if listing.is_active { "active" } else { "inactive" };
    println!(
        "- {} | {} | due {} ({}) | {} | {} tracker(s)",
        listing.company,
        listing.position_title,
        listing.application_deadline,
        proximity.label(),
        activity,
        listing.tracking_count
    );
}
