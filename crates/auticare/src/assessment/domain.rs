use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::scoring::{Contributor, Severity};

/// Stable identifier for a persisted assessment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentId(pub String);

impl std::fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who completed the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentRole {
    Individual,
    Parent,
    Clinician,
}

impl AssessmentRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Individual => "Individual",
            Self::Parent => "Parent",
            Self::Clinician => "Clinician",
        }
    }
}

/// Completed questionnaire handed to the orchestrator by the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSubmission {
    pub user_id: String,
    pub role: AssessmentRole,
    pub questionnaire_score: f64,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub top_contributors: Vec<Contributor>,
}

/// One row per completed assessment. Created once and never updated.
///
/// `fused_score` holds the authoritative score: the fused value when a video
/// prediction exists, otherwise the questionnaire score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub id: AssessmentId,
    pub user_id: String,
    pub role: AssessmentRole,
    pub questionnaire_score: f64,
    pub ml_score: Option<f64>,
    pub fused_score: f64,
    pub severity: Severity,
    pub video_url: Option<String>,
    pub metadata: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

/// Severity tier with the copy the report screen shows next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeverityView {
    pub tier: Severity,
    pub label: &'static str,
    pub guidance: &'static str,
}

impl From<Severity> for SeverityView {
    fn from(tier: Severity) -> Self {
        Self {
            tier,
            label: tier.label(),
            guidance: tier.guidance(),
        }
    }
}
