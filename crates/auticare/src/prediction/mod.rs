//! Proxy between the screening UI and the external ML video prediction service.
//!
//! The ML service itself (video download, feature extraction, model inference)
//! is an opaque collaborator reached over HTTP. This module only forwards the
//! video URL, enforces the deadline, and normalizes or classifies the answer.

pub mod domain;
pub mod error;
pub mod proxy;
pub mod router;
pub mod transport;

pub use domain::{
    CallState, UpstreamRequest, UpstreamResponse, VideoPrediction, DEFAULT_CONFIDENCE,
};
pub use error::PredictionError;
pub use proxy::{PredictionProxy, VideoPredictor};
pub use router::{prediction_router, PredictVideoRequest, PREDICT_VIDEO_PATH};
pub use transport::{HttpPredictionTransport, PredictionTransport, TransportError};
