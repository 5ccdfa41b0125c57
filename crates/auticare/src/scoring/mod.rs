//! Questionnaire and video score fusion with the canonical severity table.

pub mod fusion;
pub mod severity;

pub use fusion::{
    fuse, Contributor, FusionError, FusionResult, ScoreField, QUESTIONNAIRE_WEIGHT, VIDEO_WEIGHT,
};
pub use severity::Severity;
