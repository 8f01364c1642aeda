use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use crate::identity::caller_identity;

use super::domain::{CommentId, CommentRating, CommentReaction, CommentType, ListingId};
use super::filter::ListingQueryParams;
use super::repository::{ListingRepository, ListingStoreError};
use super::service::{ListingChanges, ListingDraft, ListingError, ListingService};
use super::sweep::deactivate_expired;

/// Router builder exposing the listing catalog endpoints.
pub fn listing_router<R>(service: Arc<ListingService<R>>) -> Router
where
    R: ListingRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/listings",
            get(search_handler::<R>).post(publish_handler::<R>),
        )
        .route("/api/v1/listings/sweep", post(sweep_handler::<R>))
        .route(
            "/api/v1/listings/:listing_id",
            get(get_handler::<R>)
                .put(edit_handler::<R>)
                .delete(retire_handler::<R>),
        )
        .route("/api/v1/listings/:listing_id/like", post(like_handler::<R>))
        .route(
            "/api/v1/listings/:listing_id/comments",
            post(comment_handler::<R>),
        )
        .route(
            "/api/v1/listings/:listing_id/comments/:comment_id/reactions",
            post(react_handler::<R>),
        )
        .route(
            "/api/v1/listings/:listing_id/comments/:comment_id/rating",
            post(rate_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentRequest {
    pub(crate) text: String,
    #[serde(default)]
    pub(crate) comment_type: Option<CommentType>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReactionRequest {
    pub(crate) reaction: CommentReaction,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RatingRequest {
    pub(crate) rating: CommentRating,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SweepRequest {
    /// Evaluation date override, mainly for operational replays and tests.
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

fn error_response(error: ListingError) -> Response {
    let status = match &error {
        ListingError::MissingField { .. } | ListingError::EmptyComment | ListingError::Filter(_) => {
            StatusCode::BAD_REQUEST
        }
        ListingError::NotFound | ListingError::CommentNotFound => StatusCode::NOT_FOUND,
        ListingError::Forbidden => StatusCode::FORBIDDEN,
        ListingError::Store(ListingStoreError::Conflict) => StatusCode::CONFLICT,
        ListingError::Store(ListingStoreError::NotFound) => StatusCode::NOT_FOUND,
        ListingError::Store(ListingStoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = match &error {
        ListingError::MissingField { field } => {
            json!({ "errors": [{ "field": field, "message": error.to_string() }] })
        }
        ListingError::EmptyComment => {
            json!({ "errors": [{ "field": "text", "message": error.to_string() }] })
        }
        ListingError::Filter(filter_error) => {
            json!({ "errors": [{ "field": filter_error.field(), "message": filter_error.to_string() }] })
        }
        other => json!({ "error": other.to_string() }),
    };

    (status, axum::Json(body)).into_response()
}

pub(crate) async fn search_handler<R>(
    State(service): State<Arc<ListingService<R>>>,
    Query(params): Query<ListingQueryParams>,
) -> Response
where
    R: ListingRepository + 'static,
{
    match service.search(&params) {
        Ok(listings) => (StatusCode::OK, axum::Json(listings)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn publish_handler<R>(
    State(service): State<Arc<ListingService<R>>>,
    headers: HeaderMap,
    axum::Json(draft): axum::Json<ListingDraft>,
) -> Response
where
    R: ListingRepository + 'static,
{
    let owner = match caller_identity(&headers) {
        Ok(owner) => owner,
        Err(response) => return response,
    };

    match service.publish(owner, draft) {
        Ok(listing) => (StatusCode::CREATED, axum::Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<ListingService<R>>>,
    Path(listing_id): Path<String>,
) -> Response
where
    R: ListingRepository + 'static,
{
    match service.get(&ListingId(listing_id)) {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn edit_handler<R>(
    State(service): State<Arc<ListingService<R>>>,
    Path(listing_id): Path<String>,
    headers: HeaderMap,
    axum::Json(changes): axum::Json<ListingChanges>,
) -> Response
where
    R: ListingRepository + 'static,
{
    let caller = match caller_identity(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match service.edit(&caller, &ListingId(listing_id), changes) {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn retire_handler<R>(
    State(service): State<Arc<ListingService<R>>>,
    Path(listing_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    R: ListingRepository + 'static,
{
    let caller = match caller_identity(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match service.retire(&caller, &ListingId(listing_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn like_handler<R>(
    State(service): State<Arc<ListingService<R>>>,
    Path(listing_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    R: ListingRepository + 'static,
{
    let caller = match caller_identity(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match service.toggle_like(&caller, &ListingId(listing_id)) {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn comment_handler<R>(
    State(service): State<Arc<ListingService<R>>>,
    Path(listing_id): Path<String>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<CommentRequest>,
) -> Response
where
    R: ListingRepository + 'static,
{
    let author = match caller_identity(&headers) {
        Ok(author) => author,
        Err(response) => return response,
    };

    let comment_type = request.comment_type.unwrap_or(CommentType::General);
    match service.add_comment(author, &ListingId(listing_id), request.text, comment_type) {
        Ok(comment) => (StatusCode::CREATED, axum::Json(comment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn react_handler<R>(
    State(service): State<Arc<ListingService<R>>>,
    Path((listing_id, comment_id)): Path<(String, String)>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<ReactionRequest>,
) -> Response
where
    R: ListingRepository + 'static,
{
    let caller = match caller_identity(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match service.react_to_comment(
        &caller,
        &ListingId(listing_id),
        &CommentId(comment_id),
        request.reaction,
    ) {
        Ok(comment) => (StatusCode::OK, axum::Json(comment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rate_handler<R>(
    State(service): State<Arc<ListingService<R>>>,
    Path((listing_id, comment_id)): Path<(String, String)>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<RatingRequest>,
) -> Response
where
    R: ListingRepository + 'static,
{
    let caller = match caller_identity(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match service.rate_comment(
        &caller,
        &ListingId(listing_id),
        &CommentId(comment_id),
        request.rating,
    ) {
        Ok(comment) => (StatusCode::OK, axum::Json(comment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn sweep_handler<R>(
    State(service): State<Arc<ListingService<R>>>,
    axum::Json(request): axum::Json<SweepRequest>,
) -> Response
where
    R: ListingRepository + 'static,
{
    let today = request.today.unwrap_or_else(|| Local::now().date_naive());
    match deactivate_expired(service.repository(), today) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}
