use serde::{Deserialize, Serialize};

use super::severity::Severity;
use crate::prediction::VideoPrediction;

pub const QUESTIONNAIRE_WEIGHT: f64 = 0.6;
pub const VIDEO_WEIGHT: f64 = 0.4;

const SCORE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=100.0;
const CONFIDENCE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=1.0;

/// Question that drove the questionnaire score, paired with a suggested next step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    pub question: String,
    pub suggested_action: String,
}

/// Outcome of blending a questionnaire score with an optional video prediction.
///
/// `fused_score` is present exactly when `video_prediction` is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionResult {
    pub normalized_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_prediction: Option<VideoPrediction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fused_score: Option<f64>,
    pub severity: Severity,
    pub top_contributors: Vec<Contributor>,
}

impl FusionResult {
    /// The score severity was derived from: fused when available.
    pub fn authoritative_score(&self) -> f64 {
        self.fused_score.unwrap_or(self.normalized_score)
    }

    pub fn with_contributors(mut self, contributors: Vec<Contributor>) -> Self {
        self.top_contributors = contributors;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreField {
    NormalizedScore,
    PredictionScore,
    Confidence,
}

impl ScoreField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NormalizedScore => "normalizedScore",
            Self::PredictionScore => "predictionScore",
            Self::Confidence => "confidence",
        }
    }
}

impl std::fmt::Display for ScoreField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FusionError {
    #[error("{field} must lie in [{min}, {max}] (got {value})")]
    InvalidScoreRange {
        field: ScoreField,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl FusionError {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidScoreRange { .. } => "invalid_score_range",
        }
    }
}

/// Combine a questionnaire score with an optional video prediction.
///
/// The fused score uses fixed 60/40 weights and is rounded half away from zero
/// to one decimal place. Confidence is validated and carried but does not
/// change the weights.
pub fn fuse(
    normalized_score: f64,
    prediction: Option<VideoPrediction>,
) -> Result<FusionResult, FusionError> {
    check_range(ScoreField::NormalizedScore, normalized_score, SCORE_RANGE)?;

    let fused_score = match &prediction {
        Some(prediction) => {
            check_range(
                ScoreField::PredictionScore,
                prediction.prediction_score,
                SCORE_RANGE,
            )?;
            check_range(
                ScoreField::Confidence,
                prediction.confidence,
                CONFIDENCE_RANGE,
            )?;
            Some(round_one_decimal(
                QUESTIONNAIRE_WEIGHT * normalized_score
                    + VIDEO_WEIGHT * prediction.prediction_score,
            ))
        }
        None => None,
    };

    let severity = Severity::from_score(fused_score.unwrap_or(normalized_score));

    Ok(FusionResult {
        normalized_score,
        video_prediction: prediction,
        fused_score,
        severity,
        top_contributors: Vec::new(),
    })
}

fn check_range(
    field: ScoreField,
    value: f64,
    range: std::ops::RangeInclusive<f64>,
) -> Result<(), FusionError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(FusionError::InvalidScoreRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
