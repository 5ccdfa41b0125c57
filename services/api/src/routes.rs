use crate::infra::AppState;
use auticare::assessment::{assessment_router, AssessmentOrchestrator, AssessmentRepository};
use auticare::prediction::{prediction_router, PredictionProxy, PredictionTransport};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_service_routes<T, R>(
    proxy: Arc<PredictionProxy<T>>,
    orchestrator: Arc<AssessmentOrchestrator<PredictionProxy<T>, R>>,
) -> axum::Router
where
    T: PredictionTransport + 'static,
    R: AssessmentRepository + 'static,
{
    prediction_router(proxy)
        .merge(assessment_router(orchestrator))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck(Extension(state): Extension<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "ml_service_configured": state.ml_service_configured,
    }))
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
