use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryContractorDirectory};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use crewmatch::config::AppConfig;
use crewmatch::error::AppError;
use crewmatch::marketplace::{InMemoryProjectStore, MatchingApi};
use crewmatch::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let directory = match args.contractors.take() {
        Some(path) => {
            let directory = InMemoryContractorDirectory::load(&path)?;
            info!(
                path = %path.display(),
                contractors = directory.len(),
                "contractor directory loaded"
            );
            directory
        }
        None => InMemoryContractorDirectory::default(),
    };

    let api = Arc::new(MatchingApi::new(
        Arc::new(InMemoryProjectStore::default()),
        Arc::new(directory),
        config.store,
    ));

    let app = with_service_routes(api)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        max_write_attempts = config.store.max_write_attempts,
        "crewmatch marketplace ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
