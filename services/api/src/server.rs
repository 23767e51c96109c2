use crate::cli::ServeArgs;
use crate::demo::seed_demo_data;
use crate::infra::{AppState, InMemoryMarketplace};
use crate::routes::{with_marketplace_routes, MarketplaceServices};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use jobboard::clock::SystemClock;
use jobboard::config::AppConfig;
use jobboard::error::AppError;
use jobboard::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
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

    let store = Arc::new(InMemoryMarketplace::default());
    if args.seed_demo {
        let seeded = seed_demo_data(&store, Utc::now());
        info!(entities = seeded, "seeded in-memory store with demo data");
    }
    let services = MarketplaceServices::new(store, Arc::new(SystemClock), &config.feed);

    let app = with_marketplace_routes(&services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "job marketplace service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
