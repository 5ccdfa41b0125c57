use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAssessmentRepository};
use crate::routes::with_service_routes;
use auticare::assessment::AssessmentOrchestrator;
use auticare::config::{AppConfig, PredictionConfig};
use auticare::error::AppError;
use auticare::prediction::PredictionProxy;
use auticare::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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
    if let Some(url) = args.ml_service_url.take() {
        config.prediction =
            PredictionConfig::new(Some(url)).with_timeout(config.prediction.timeout());
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        ml_service_configured: config.prediction.is_configured(),
    };

    if !config.prediction.is_configured() {
        warn!("ML_SERVICE_URL not set; video predictions will answer 503");
    }

    let proxy = Arc::new(PredictionProxy::http(config.prediction.clone())?);
    let repository = Arc::new(InMemoryAssessmentRepository::default());
    let orchestrator = Arc::new(AssessmentOrchestrator::new(proxy.clone(), repository));

    let app = with_service_routes(proxy, orchestrator)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        timeout_secs = config.prediction.timeout().as_secs(),
        "screening service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
