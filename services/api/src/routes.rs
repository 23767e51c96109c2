use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use jobboard::clock::Clock;
use jobboard::config::FeedConfig;
use jobboard::marketplace::applications::{
    application_router, ApplicationRepository, ApplicationService,
};
use jobboard::marketplace::moderation::{moderation_router, ModerationService, ModerationStore};
use jobboard::marketplace::notifications::{
    notification_router, FeedAggregator, NotificationFeedService, NotificationSource,
};
use serde_json::json;
use std::sync::Arc;

/// The three marketplace services sharing one backing store.
pub(crate) struct MarketplaceServices<S> {
    pub(crate) applications: Arc<ApplicationService<S>>,
    pub(crate) moderation: Arc<ModerationService<S>>,
    pub(crate) feed: Arc<NotificationFeedService<S>>,
}

impl<S> MarketplaceServices<S>
where
    S: ApplicationRepository + ModerationStore + NotificationSource + 'static,
{
    pub(crate) fn new(store: Arc<S>, clock: Arc<dyn Clock>, feed: &FeedConfig) -> Self {
        Self {
            applications: Arc::new(ApplicationService::with_clock(store.clone(), clock.clone())),
            moderation: Arc::new(ModerationService::with_clock(store.clone(), clock)),
            feed: Arc::new(NotificationFeedService::new(
                store,
                FeedAggregator::new(feed.remark_prefix.clone()),
            )),
        }
    }
}

pub(crate) fn with_marketplace_routes<S>(services: &MarketplaceServices<S>) -> Router
where
    S: ApplicationRepository + ModerationStore + NotificationSource + 'static,
{
    application_router(services.applications.clone())
        .merge(moderation_router(services.moderation.clone()))
        .merge(notification_router(services.feed.clone()))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
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
