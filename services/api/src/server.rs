use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryOfferStore};
use crate::routes::with_insights_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use credit_insights::config::AppConfig;
use credit_insights::eligibility::{InsightsService, OfferCsvImporter};
use credit_insights::error::AppError;
use credit_insights::telemetry;
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

    let store = Arc::new(InMemoryOfferStore::default());
    if let Some(path) = &config.offers.seed_csv {
        let seeded = OfferCsvImporter::from_path(path)?;
        info!(count = seeded.len(), path = %path.display(), "seeded offer store");
        store.extend(seeded);
    }
    let service = Arc::new(InsightsService::new(store));

    let app = with_insights_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "credit insights service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
