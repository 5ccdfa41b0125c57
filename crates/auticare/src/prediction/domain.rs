use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Confidence assumed when the ML service does not report one.
pub const DEFAULT_CONFIDENCE: f64 = 0.75;

/// Normalized prediction returned by the ML service for one video.
///
/// Serialized field names match the proxy's HTTP success body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoPrediction {
    pub prediction_score: f64,
    pub confidence: f64,
    pub features_detected: BTreeMap<String, f64>,
    #[serde(rename = "timestamp")]
    pub captured_at: DateTime<Utc>,
}

/// Outbound body sent to the ML service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamRequest {
    pub video_url: String,
}

/// Raw status and body captured from the ML service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Per-call lifecycle. Every call ends one hop after `Dispatched`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Dispatched,
    Succeeded,
    TimedOut,
    UpstreamFailed,
    PayloadInvalid,
}

impl CallState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dispatched => "dispatched",
            Self::Succeeded => "succeeded",
            Self::TimedOut => "timed_out",
            Self::UpstreamFailed => "upstream_failed",
            Self::PayloadInvalid => "payload_invalid",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Idle | Self::Dispatched)
    }
}
