use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{info, warn};

use super::domain::{
    CallState, UpstreamRequest, UpstreamResponse, VideoPrediction, DEFAULT_CONFIDENCE,
};
use super::error::PredictionError;
use super::transport::{HttpPredictionTransport, PredictionTransport};
use crate::config::PredictionConfig;

/// Forwards a video URL to the configured ML service and normalizes the answer.
///
/// Stateless apart from the read-only configuration: each call owns its own
/// deadline and connection, and nothing is cached or retried here.
pub struct PredictionProxy<T> {
    config: PredictionConfig,
    transport: Arc<T>,
}

impl PredictionProxy<HttpPredictionTransport> {
    pub fn http(config: PredictionConfig) -> Result<Self, PredictionError> {
        let transport = HttpPredictionTransport::new()
            .map_err(|err| PredictionError::Transport(err.to_string()))?;
        Ok(Self::new(config, Arc::new(transport)))
    }
}

impl<T> PredictionProxy<T>
where
    T: PredictionTransport + 'static,
{
    pub fn new(config: PredictionConfig, transport: Arc<T>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &PredictionConfig {
        &self.config
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Obtain a prediction for `video_url`, or fail with a classified error.
    pub async fn predict(&self, video_url: &str) -> Result<VideoPrediction, PredictionError> {
        let video_url = video_url.trim();
        if video_url.is_empty() {
            return Err(PredictionError::MissingVideoUrl);
        }

        let Some(endpoint) = self.config.endpoint() else {
            warn!("prediction requested but ML_SERVICE_URL is not configured");
            return Err(PredictionError::ServiceNotConfigured);
        };

        let request = UpstreamRequest {
            video_url: video_url.to_string(),
        };
        let deadline = self.config.timeout();
        let started = Instant::now();

        info!(
            %endpoint,
            %video_url,
            state = CallState::Dispatched.as_str(),
            "forwarding video to ML service"
        );

        let outcome = match tokio::time::timeout(
            deadline,
            self.transport.dispatch(endpoint, &request),
        )
        .await
        {
            Err(_) => Err(PredictionError::Timeout { after: deadline }),
            Ok(Err(err)) => Err(PredictionError::Transport(err.0)),
            Ok(Ok(response)) => normalize_response(response),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(prediction) => info!(
                state = CallState::Succeeded.as_str(),
                elapsed_ms,
                prediction_score = prediction.prediction_score,
                confidence = prediction.confidence,
                "ML prediction received"
            ),
            Err(err) => warn!(
                state = err.terminal_state().as_str(),
                kind = err.kind(),
                elapsed_ms,
                error = %err,
                "ML prediction failed"
            ),
        }

        outcome
    }
}

/// Seam used by the assessment flow so it can run against a fake predictor.
#[async_trait]
pub trait VideoPredictor: Send + Sync {
    async fn predict_video(&self, video_url: &str) -> Result<VideoPrediction, PredictionError>;
}

#[async_trait]
impl<T> VideoPredictor for PredictionProxy<T>
where
    T: PredictionTransport + 'static,
{
    async fn predict_video(&self, video_url: &str) -> Result<VideoPrediction, PredictionError> {
        self.predict(video_url).await
    }
}

fn normalize_response(response: UpstreamResponse) -> Result<VideoPrediction, PredictionError> {
    if !response.is_success() {
        return Err(PredictionError::Upstream {
            status: response.status,
            body: response.body,
        });
    }

    let payload: Value = serde_json::from_str(&response.body).map_err(|err| {
        PredictionError::InvalidUpstreamPayload(format!("body is not JSON: {err}"))
    })?;

    parse_payload(&payload)
}

pub(crate) fn parse_payload(payload: &Value) -> Result<VideoPrediction, PredictionError> {
    let invalid = |detail: &str| PredictionError::InvalidUpstreamPayload(detail.to_string());

    let prediction_score = payload
        .get("prediction_score")
        .and_then(Value::as_f64)
        .ok_or_else(|| invalid("prediction_score is missing or not a number"))?;
    if !(0.0..=100.0).contains(&prediction_score) {
        return Err(PredictionError::InvalidUpstreamPayload(format!(
            "prediction_score {prediction_score} is outside [0, 100]"
        )));
    }

    let confidence = match payload.get("confidence") {
        None | Some(Value::Null) => DEFAULT_CONFIDENCE,
        Some(value) => value
            .as_f64()
            .ok_or_else(|| invalid("confidence is not a number"))?,
    };
    if !(0.0..=1.0).contains(&confidence) {
        return Err(PredictionError::InvalidUpstreamPayload(format!(
            "confidence {confidence} is outside [0, 1]"
        )));
    }

    let features_detected = match payload.get("features_detected") {
        None | Some(Value::Null) => BTreeMap::new(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(name, value)| {
                value.as_f64().map(|value| (name.clone(), value)).ok_or_else(|| {
                    PredictionError::InvalidUpstreamPayload(format!(
                        "feature '{name}' is not a number"
                    ))
                })
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?,
        Some(_) => return Err(invalid("features_detected is not an object")),
    };

    Ok(VideoPrediction {
        prediction_score,
        confidence,
        features_detected,
        captured_at: Utc::now(),
    })
}
