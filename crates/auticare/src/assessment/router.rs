use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{AssessmentId, AssessmentSubmission};
use super::repository::{AssessmentRepository, RepositoryError};
use super::service::{AssessmentError, AssessmentOrchestrator};
use crate::prediction::VideoPredictor;

/// Router builder exposing assessment submission and retrieval.
pub fn assessment_router<P, R>(orchestrator: Arc<AssessmentOrchestrator<P, R>>) -> Router
where
    P: VideoPredictor + 'static,
    R: AssessmentRepository + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(submit_handler::<P, R>))
        .route(
            "/api/v1/assessments/:assessment_id",
            get(fetch_handler::<P, R>),
        )
        .route(
            "/api/v1/users/:user_id/assessments",
            get(history_handler::<P, R>),
        )
        .with_state(orchestrator)
}

pub(crate) async fn submit_handler<P, R>(
    State(orchestrator): State<Arc<AssessmentOrchestrator<P, R>>>,
    axum::Json(submission): axum::Json<AssessmentSubmission>,
) -> Response
where
    P: VideoPredictor + 'static,
    R: AssessmentRepository + 'static,
{
    match orchestrator.submit(submission).await {
        Ok(outcome) => (StatusCode::CREATED, axum::Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn fetch_handler<P, R>(
    State(orchestrator): State<Arc<AssessmentOrchestrator<P, R>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    P: VideoPredictor + 'static,
    R: AssessmentRepository + 'static,
{
    match orchestrator.get(&AssessmentId(assessment_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn history_handler<P, R>(
    State(orchestrator): State<Arc<AssessmentOrchestrator<P, R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    P: VideoPredictor + 'static,
    R: AssessmentRepository + 'static,
{
    match orchestrator.history(&user_id) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: AssessmentError) -> Response {
    let (status, kind) = match &err {
        AssessmentError::MissingUserId => (StatusCode::BAD_REQUEST, "missing_user_id"),
        AssessmentError::Fusion(fusion) => (StatusCode::UNPROCESSABLE_ENTITY, fusion.kind()),
        AssessmentError::Repository(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, "not_found")
        }
        AssessmentError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, "conflict")
        }
        AssessmentError::Repository(RepositoryError::Unavailable(_)) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "repository_unavailable")
        }
    };

    let payload = json!({
        "error": err.to_string(),
        "type": kind,
    });
    (status, axum::Json(payload)).into_response()
}
