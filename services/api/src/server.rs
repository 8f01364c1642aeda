use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryListingRepository, InMemoryTrackingRepository};
use crate::routes::with_domain_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use interntrack::config::AppConfig;
use interntrack::error::AppError;
use interntrack::listings::service::ListingService;
use interntrack::telemetry;
use interntrack::tracking::service::TrackingService;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let listings = Arc::new(InMemoryListingRepository::default());
    let tracking = Arc::new(InMemoryTrackingRepository::default());
    let listing_service = Arc::new(ListingService::new(listings.clone()));
    let tracking_service = Arc::new(TrackingService::new(listings, tracking));

    let app = with_domain_routes(listing_service, tracking_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "internship tracking service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
