use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use super::error::PredictionError;
use super::proxy::PredictionProxy;
use super::transport::PredictionTransport;

pub const PREDICT_VIDEO_PATH: &str = "/api/predict-video";

/// Inbound body for the proxy endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictVideoRequest {
    #[serde(rename = "videoUrl", default)]
    pub video_url: Option<String>,
}

/// Router exposing the prediction proxy to browsers on any origin.
pub fn prediction_router<T>(proxy: Arc<PredictionProxy<T>>) -> Router
where
    T: PredictionTransport + 'static,
{
    Router::new()
        .route(
            PREDICT_VIDEO_PATH,
            post(predict_handler::<T>).options(preflight_handler),
        )
        .layer(cors_layer())
        .with_state(proxy)
}

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

pub(crate) async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

pub(crate) async fn predict_handler<T>(
    State(proxy): State<Arc<PredictionProxy<T>>>,
    payload: Result<Json<PredictVideoRequest>, JsonRejection>,
) -> Response
where
    T: PredictionTransport + 'static,
{
    let video_url = match payload {
        Ok(Json(request)) => request.video_url.unwrap_or_default(),
        Err(_) => String::new(),
    };

    match proxy.predict(&video_url).await {
        Ok(prediction) => (StatusCode::OK, Json(prediction)).into_response(),
        Err(err) => err.into_response(),
    }
}

impl IntoResponse for PredictionError {
    fn into_response(self) -> Response {
        match &self {
            PredictionError::MissingVideoUrl => {
                let payload = json!({ "error": self.to_string() });
                (StatusCode::BAD_REQUEST, Json(payload)).into_response()
            }
            PredictionError::ServiceNotConfigured => {
                let payload = json!({
                    "error": self.to_string(),
                    "instructions": self.suggestion(),
                });
                (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
            }
            PredictionError::Timeout { .. } => {
                let payload = json!({
                    "error": self.to_string(),
                    "type": "timeout",
                    "suggestion": self.suggestion(),
                });
                (StatusCode::GATEWAY_TIMEOUT, Json(payload)).into_response()
            }
            PredictionError::Upstream { .. }
            | PredictionError::Transport(_)
            | PredictionError::InvalidUpstreamPayload(_) => {
                let payload = json!({
                    "error": self.to_string(),
                    "type": "processing_error",
                    "suggestion": self.suggestion(),
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
            }
        }
    }
}
