use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use interntrack::listings::repository::ListingRepository;
use interntrack::listings::router::listing_router;
use interntrack::listings::service::ListingService;
use interntrack::tracking::repository::TrackingRepository;
use interntrack::tracking::router::tracking_router;
use interntrack::tracking::service::TrackingService;

/// Compose the domain routers with the operational endpoints.
pub(crate) fn with_domain_routes<L, T>(
    listing_service: Arc<ListingService<L>>,
    tracking_service: Arc<TrackingService<L, T>>,
) -> axum::Router
where
    L: ListingRepository + 'static,
    T: TrackingRepository + 'static,
{
    listing_router(listing_service)
        .merge(tracking_router(tracking_service))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
