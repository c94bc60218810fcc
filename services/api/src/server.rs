use crate::cli::ServeArgs;
use crate::demo::seed_catalogue;
use crate::infra::{AppState, InMemoryBookmarkRepository, InMemoryProjectRepository};
use crate::routes::with_project_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use esg_tracker::config::AppConfig;
use esg_tracker::error::AppError;
use esg_tracker::projects::ProjectService;
use esg_tracker::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    let project_service = Arc::new(ProjectService::new(
        Arc::new(InMemoryProjectRepository::default()),
        Arc::new(InMemoryBookmarkRepository::default()),
    ));

    if config.catalogue.seed_sample_data {
        if let Err(err) = seed_catalogue(&project_service) {
            warn!(error = %err, "sample catalogue could not be seeded");
        }
    }

    let app = with_project_routes(project_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "esg tracker ready");

    axum::serve(listener, app).await?;
    Ok(())
}
