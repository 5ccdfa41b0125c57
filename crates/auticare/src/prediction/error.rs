use std::time::Duration;

use super::domain::CallState;

/// Failures surfaced by the prediction proxy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictionError {
    #[error("videoUrl is required")]
    MissingVideoUrl,
    #[error("ML prediction service is not configured")]
    ServiceNotConfigured,
    #[error("ML service did not respond within {} seconds", .after.as_secs())]
    Timeout { after: Duration },
    #[error("ML service returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("could not reach ML service: {0}")]
    Transport(String),
    #[error("ML service returned an invalid payload: {0}")]
    InvalidUpstreamPayload(String),
}

impl PredictionError {
    /// Stable tag for callers that branch on the failure kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingVideoUrl => "missing_video_url",
            Self::ServiceNotConfigured => "service_not_configured",
            Self::Timeout { .. } => "timeout",
            Self::Upstream { .. } => "upstream_error",
            Self::Transport(_) => "transport_error",
            Self::InvalidUpstreamPayload(_) => "invalid_upstream_payload",
        }
    }

    pub const fn terminal_state(&self) -> CallState {
        match self {
            Self::MissingVideoUrl | Self::ServiceNotConfigured => CallState::Idle,
            Self::Timeout { .. } => CallState::TimedOut,
            Self::Upstream { .. } | Self::Transport(_) => CallState::UpstreamFailed,
            Self::InvalidUpstreamPayload(_) => CallState::PayloadInvalid,
        }
    }

    /// Whether an outer layer may reasonably try the same call again.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Transport(_))
    }

    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::MissingVideoUrl => "Upload a video before requesting an analysis.",
            Self::ServiceNotConfigured => {
                "Set ML_SERVICE_URL to the prediction endpoint and restart the service."
            }
            Self::Timeout { .. } => {
                "Video processing took too long. Try a shorter video (under 2 minutes) or try again later."
            }
            Self::Upstream { .. } | Self::Transport(_) => {
                "The analysis service is unavailable right now. Please try again later."
            }
            Self::InvalidUpstreamPayload(_) => {
                "The analysis service returned an unexpected result. Please contact support if this persists."
            }
        }
    }
}
