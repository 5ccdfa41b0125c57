//! Assessment flow: questionnaire score, optional video analysis, fusion, and
//! the append-only persistence contract consumed by the report screens.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AssessmentId, AssessmentRecord, AssessmentRole, AssessmentSubmission, SeverityView,
};
pub use repository::{AssessmentRepository, RepositoryError};
pub use router::assessment_router;
pub use service::{
    AssessmentError, AssessmentOrchestrator, AssessmentOutcome, RetryPolicy,
    VideoAnalysisFailure,
};
