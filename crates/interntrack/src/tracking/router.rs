use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, put},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::identity::caller_identity;
use crate::listings::domain::ListingId;
use crate::listings::repository::{ListingRepository, ListingStoreError};

use super::domain::{ApplicationStatus, TrackingId};
use super::repository::{TrackingRepository, TrackingStoreError};
use super::service::{TrackingError, TrackingService};

/// Router builder exposing the tracking pipeline and the public insights
/// read. Everything except insights requires the forwarded identity header.
pub fn tracking_router<L, T>(service: Arc<TrackingService<L, T>>) -> Router
where
    L: ListingRepository + 'static,
    T: TrackingRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/tracking",
            get(list_handler::<L, T>).post(track_handler::<L, T>),
        )
        .route("/api/v1/tracking/stats", get(stats_handler::<L, T>))
        .route(
            "/api/v1/tracking/:tracking_id",
            get(get_handler::<L, T>).delete(untrack_handler::<L, T>),
        )
        .route(
            "/api/v1/tracking/:tracking_id/status",
            patch(status_handler::<L, T>),
        )
        .route(
            "/api/v1/tracking/:tracking_id/notes",
            put(notes_handler::<L, T>),
        )
        .route(
            "/api/v1/listings/:listing_id/insights",
            get(insights_handler::<L, T>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackRequest {
    pub(crate) listing_id: String,
    #[serde(default)]
    pub(crate) status: Option<ApplicationStatus>,
    #[serde(default)]
    pub(crate) application_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdateRequest {
    pub(crate) status: ApplicationStatus,
    #[serde(default)]
    pub(crate) application_date: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NotesRequest {
    pub(crate) notes: String,
}

fn error_response(error: TrackingError) -> Response {
    let status = match &error {
        TrackingError::ListingNotFound
        | TrackingError::NotFound
        | TrackingError::Records(TrackingStoreError::NotFound)
        | TrackingError::Listings(ListingStoreError::NotFound) => StatusCode::NOT_FOUND,
        TrackingError::Forbidden => StatusCode::FORBIDDEN,
        TrackingError::AlreadyTracked | TrackingError::Records(TrackingStoreError::Conflict) => {
            StatusCode::CONFLICT
        }
        TrackingError::MissingApplicationDate | TrackingError::NotesTooLong { .. } => {
            StatusCode::BAD_REQUEST
        }
        TrackingError::Records(TrackingStoreError::Unavailable(_))
        | TrackingError::Listings(ListingStoreError::Unavailable(_))
        | TrackingError::Listings(ListingStoreError::Conflict) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let body = match &error {
        TrackingError::MissingApplicationDate => {
            json!({ "errors": [{ "field": "application_date", "message": error.to_string() }] })
        }
        TrackingError::NotesTooLong { .. } => {
            json!({ "errors": [{ "field": "notes", "message": error.to_string() }] })
        }
        other => json!({ "error": other.to_string() }),
    };

    (status, axum::Json(body)).into_response()
}

pub(crate) async fn track_handler<L, T>(
    State(service): State<Arc<TrackingService<L, T>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<TrackRequest>,
) -> Response
where
    L: ListingRepository + 'static,
    T: TrackingRepository + 'static,
{
    let caller = match caller_identity(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match service.track(
        caller,
        ListingId(request.listing_id),
        request.status,
        request.application_date,
    ) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<L, T>(
    State(service): State<Arc<TrackingService<L, T>>>,
    headers: HeaderMap,
) -> Response
where
    L: ListingRepository + 'static,
    T: TrackingRepository + 'static,
{
    let caller = match caller_identity(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match service.records_for(&caller) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stats_handler<L, T>(
    State(service): State<Arc<TrackingService<L, T>>>,
    headers: HeaderMap,
) -> Response
where
    L: ListingRepository + 'static,
    T: TrackingRepository + 'static,
{
    let caller = match caller_identity(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match service.personal_stats(&caller) {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<L, T>(
    State(service): State<Arc<TrackingService<L, T>>>,
    Path(tracking_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    L: ListingRepository + 'static,
    T: TrackingRepository + 'static,
{
    let caller = match caller_identity(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match service.get(&caller, &TrackingId(tracking_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<L, T>(
    State(service): State<Arc<TrackingService<L, T>>>,
    Path(tracking_id): Path<String>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<StatusUpdateRequest>,
) -> Response
where
    L: ListingRepository + 'static,
    T: TrackingRepository + 'static,
{
    let caller = match caller_identity(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match service.update_status(
        &caller,
        &TrackingId(tracking_id),
        request.status,
        request.application_date,
        request.note,
    ) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn notes_handler<L, T>(
    State(service): State<Arc<TrackingService<L, T>>>,
    Path(tracking_id): Path<String>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<NotesRequest>,
) -> Response
where
    L: ListingRepository + 'static,
    T: TrackingRepository + 'static,
{
    let caller = match caller_identity(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match service.update_notes(&caller, &TrackingId(tracking_id), request.notes) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn untrack_handler<L, T>(
    State(service): State<Arc<TrackingService<L, T>>>,
    Path(tracking_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    L: ListingRepository + 'static,
    T: TrackingRepository + 'static,
{
    let caller = match caller_identity(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match service.untrack(&caller, &TrackingId(tracking_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

/// Deliberately unauthenticated: the aggregate is identity-free by
/// construction, so there is nothing to protect.
pub(crate) async fn insights_handler<L, T>(
    State(service): State<Arc<TrackingService<L, T>>>,
    Path(listing_id): Path<String>,
) -> Response
where
    L: ListingRepository + 'static,
    T: TrackingRepository + 'static,
{
    match service.insights(&ListingId(listing_id)) {
        Ok(insights) => (StatusCode::OK, axum::Json(insights)).into_response(),
        Err(error) => error_response(error),
    }
}
