use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{AssessmentId, AssessmentRecord, AssessmentSubmission, SeverityView};
use super::repository::{AssessmentRepository, RepositoryError};
use crate::prediction::{PredictionError, VideoPrediction, VideoPredictor};
use crate::scoring::{fuse, FusionError, FusionResult};

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("asm-{id:06}"))
}

/// How many times the orchestrator asks for a prediction before giving up.
///
/// Only transient failures (timeouts, unreachable service) are retried; the
/// proxy itself never retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl RetryPolicy {
    pub const fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    /// `backoff` grows linearly with the attempt number.
    pub fn bounded(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn delay_before(&self, attempt: u32) -> Duration {
        self.backoff * attempt.saturating_sub(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::single_attempt()
    }
}

/// Reason the video portion of an assessment was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoAnalysisFailure {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: String,
    pub suggestion: &'static str,
}

impl From<&PredictionError> for VideoAnalysisFailure {
    fn from(err: &PredictionError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            suggestion: err.suggestion(),
        }
    }
}

/// Everything the report screen needs after an assessment completes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentOutcome {
    pub record: AssessmentRecord,
    pub fusion: FusionResult,
    pub severity: SeverityView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_analysis_error: Option<VideoAnalysisFailure>,
}

/// Sequences questionnaire scoring, optional video analysis, fusion, and storage.
pub struct AssessmentOrchestrator<P, R> {
    predictor: Arc<P>,
    repository: Arc<R>,
    retry: RetryPolicy,
}

impl<P, R> AssessmentOrchestrator<P, R>
where
    P: VideoPredictor + 'static,
    R: AssessmentRepository + 'static,
{
    pub fn new(predictor: Arc<P>, repository: Arc<R>) -> Self {
        Self::with_retry(predictor, repository, RetryPolicy::default())
    }

    pub fn with_retry(predictor: Arc<P>, repository: Arc<R>, retry: RetryPolicy) -> Self {
        Self {
            predictor,
            repository,
            retry,
        }
    }

    /// Complete an assessment. A failed video analysis degrades to the
    /// questionnaire score instead of failing the whole submission.
    pub async fn submit(
        &self,
        submission: AssessmentSubmission,
    ) -> Result<AssessmentOutcome, AssessmentError> {
        let AssessmentSubmission {
            user_id,
            role,
            questionnaire_score,
            video_url,
            metadata,
            top_contributors,
        } = submission;

        let user_id = user_id.trim().to_string();
        if user_id.is_empty() {
            return Err(AssessmentError::MissingUserId);
        }

        // validate before spending an ML call on it
        let questionnaire_only = fuse(questionnaire_score, None)?;

        let video_url = video_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let (fusion, video_analysis_error) = match &video_url {
            Some(url) => match self.predict_with_retry(url).await {
                Ok(prediction) => (fuse(questionnaire_score, Some(prediction))?, None),
                Err(err) => {
                    warn!(
                        %user_id,
                        kind = err.kind(),
                        error = %err,
                        "video analysis failed, continuing with questionnaire score"
                    );
                    (questionnaire_only, Some(VideoAnalysisFailure::from(&err)))
                }
            },
            None => (questionnaire_only, None),
        };
        let fusion = fusion.with_contributors(top_contributors);

        let record = AssessmentRecord {
            id: next_assessment_id(),
            user_id,
            role,
            questionnaire_score,
            ml_score: fusion
                .video_prediction
                .as_ref()
                .map(|prediction| prediction.prediction_score),
            fused_score: fusion.authoritative_score(),
            severity: fusion.severity,
            video_url,
            metadata,
            created_at: Utc::now(),
        };

        let stored = self.repository.insert(record)?;

        info!(
            assessment_id = %stored.id,
            role = stored.role.label(),
            severity = stored.severity.as_str(),
            fused = fusion.fused_score.is_some(),
            "assessment recorded"
        );

        Ok(AssessmentOutcome {
            severity: SeverityView::from(stored.severity),
            record: stored,
            fusion,
            video_analysis_error,
        })
    }

    pub fn get(&self, id: &AssessmentId) -> Result<AssessmentRecord, AssessmentError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn history(&self, user_id: &str) -> Result<Vec<AssessmentRecord>, AssessmentError> {
        Ok(self.repository.list_for_user(user_id)?)
    }

    async fn predict_with_retry(
        &self,
        video_url: &str,
    ) -> Result<VideoPrediction, PredictionError> {
        let mut attempt = 1;
        loop {
            match self.predictor.predict_video(video_url).await {
                Ok(prediction) => return Ok(prediction),
                Err(err) if err.is_transient() && attempt < self.retry.max_attempts => {
                    attempt += 1;
                    let delay = self.retry.delay_before(attempt);
                    warn!(
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        kind = err.kind(),
                        "retrying video analysis"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Error raised by the assessment orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("userId is required")]
    MissingUserId,
    #[error(transparent)]
    Fusion(#[from] FusionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
