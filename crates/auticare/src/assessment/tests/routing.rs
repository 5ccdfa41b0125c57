use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::assessment::router::{fetch_handler, submit_handler};
use crate::assessment::AssessmentOrchestrator;
use crate::prediction::PredictionError;

fn post_assessment(body: Value) -> Request<Body> {
    Request::post("/api/v1/assessments")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn submit_route_returns_created_outcome() {
    let (orchestrator, _, _) = build_orchestrator(vec![Ok(prediction(30.0, 0.9))]);
    let router = router_with(orchestrator);

    let response = router
        .oneshot(post_assessment(json!({
            "userId": "user-7f3a",
            "role": "parent",
            "questionnaireScore": 70,
            "videoUrl": VIDEO_URL,
            "metadata": { "ageMonths": 30 }
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["record"]["severity"], json!("moderate"));
    assert_eq!(payload["record"]["fusedScore"], json!(54.0));
    assert_eq!(payload["record"]["mlScore"], json!(30.0));
    assert_eq!(payload["fusion"]["fusedScore"], json!(54.0));
    assert_eq!(payload["fusion"]["videoPrediction"]["confidence"], json!(0.9));
    assert_eq!(payload["severity"]["label"], json!("Moderate"));
    assert!(payload.get("videoAnalysisError").is_none());
}

#[tokio::test]
async fn submit_route_reports_degraded_video_analysis() {
    let (orchestrator, _, _) =
        build_orchestrator(vec![Err(PredictionError::ServiceNotConfigured)]);
    let router = router_with(orchestrator);

    let response = router
        .oneshot(post_assessment(json!({
            "userId": "user-7f3a",
            "role": "individual",
            "questionnaireScore": 30,
            "videoUrl": VIDEO_URL
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["record"]["severity"], json!("mild"));
    assert_eq!(payload["record"]["mlScore"], Value::Null);
    assert_eq!(
        payload["videoAnalysisError"]["type"],
        json!("service_not_configured")
    );
    assert!(payload["fusion"].get("fusedScore").is_none());
}

#[tokio::test]
async fn submit_handler_rejects_out_of_range_scores() {
    let (orchestrator, _, _) = build_orchestrator(Vec::new());

    let response = submit_handler(
        State(Arc::new(orchestrator)),
        axum::Json(submission(101.0, None)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["type"], json!("invalid_score_range"));
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_repository_failure() {
    let orchestrator = AssessmentOrchestrator::new(
        ScriptedPredictor::with(Vec::new()),
        Arc::new(UnavailableRepository),
    );

    let response = submit_handler(
        State(Arc::new(orchestrator)),
        axum::Json(submission(40.0, None)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn fetch_handler_returns_stored_record() {
    let (orchestrator, _, _) = build_orchestrator(Vec::new());
    let orchestrator = Arc::new(orchestrator);
    let outcome = orchestrator
        .submit(submission(66.0, None))
        .await
        .expect("assessment completes");

    let response = fetch_handler(
        State(orchestrator.clone()),
        axum::extract::Path(outcome.record.id.0.clone()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["id"], json!(outcome.record.id.0));
    assert_eq!(payload["severity"], json!("high"));
    assert_eq!(payload["role"], json!("parent"));
}

#[tokio::test]
async fn fetch_route_returns_not_found_for_unknown_id() {
    let (orchestrator, _, _) = build_orchestrator(Vec::new());
    let router = router_with(orchestrator);

    let response = router
        .oneshot(
            Request::get("/api/v1/assessments/asm-missing")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn history_route_lists_user_records() {
    let (orchestrator, _, _) = build_orchestrator(Vec::new());
    let orchestrator = Arc::new(orchestrator);
    orchestrator
        .submit(submission(12.0, None))
        .await
        .expect("assessment completes");
    let router = crate::assessment::assessment_router(orchestrator);

    let response = router
        .oneshot(
            Request::get("/api/v1/users/user-7f3a/assessments")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let records = payload.as_array().expect("array body");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["severity"], json!("low"));
}
