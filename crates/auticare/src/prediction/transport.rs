use async_trait::async_trait;

use super::domain::{UpstreamRequest, UpstreamResponse};

const USER_AGENT: &str = concat!("auticare/", env!("CARGO_PKG_VERSION"));

/// Network failure below the HTTP status layer (DNS, refused connection, reset).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Performs the single outbound POST to the ML service.
///
/// Implementations must not retry and must not apply their own deadline; the
/// proxy owns both decisions.
#[async_trait]
pub trait PredictionTransport: Send + Sync {
    async fn dispatch(
        &self,
        endpoint: &str,
        request: &UpstreamRequest,
    ) -> Result<UpstreamResponse, TransportError>;
}

/// `reqwest`-backed transport used by the running service.
#[derive(Debug, Clone)]
pub struct HttpPredictionTransport {
    http_client: reqwest::Client,
}

impl HttpPredictionTransport {
    pub fn new() -> Result<Self, TransportError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl PredictionTransport for HttpPredictionTransport {
    async fn dispatch(
        &self,
        endpoint: &str,
        request: &UpstreamRequest,
    ) -> Result<UpstreamResponse, TransportError> {
        let response = self
            .http_client
            .post(endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(UpstreamResponse { status, body })
    }
}
