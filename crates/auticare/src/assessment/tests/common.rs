use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::assessment::domain::{
    AssessmentId, AssessmentRecord, AssessmentRole, AssessmentSubmission,
};
use crate::assessment::repository::{AssessmentRepository, RepositoryError};
use crate::assessment::{assessment_router, AssessmentOrchestrator};
use crate::prediction::{PredictionError, VideoPrediction, VideoPredictor};

pub(super) const VIDEO_URL: &str = "https://storage.example.com/videos/session-42.mp4";

pub(super) fn prediction(score: f64, confidence: f64) -> VideoPrediction {
    let mut features_detected = BTreeMap::new();
    features_detected.insert("eye_contact_frequency".to_string(), 0.412);
    features_detected.insert("repetitive_motion_score".to_string(), 0.187);
    VideoPrediction {
        prediction_score: score,
        confidence,
        features_detected,
        captured_at: Utc
            .with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
            .single()
            .expect("valid timestamp"),
    }
}

pub(super) fn submission(score: f64, video_url: Option<&str>) -> AssessmentSubmission {
    AssessmentSubmission {
        user_id: "user-7f3a".to_string(),
        role: AssessmentRole::Parent,
        questionnaire_score: score,
        video_url: video_url.map(str::to_string),
        metadata: serde_json::Map::new(),
        top_contributors: Vec::new(),
    }
}

/// Predictor replaying a fixed script of results, one per call.
#[derive(Default)]
pub(super) struct ScriptedPredictor {
    script: Mutex<VecDeque<Result<VideoPrediction, PredictionError>>>,
    calls: AtomicUsize,
}

impl ScriptedPredictor {
    pub(super) fn with(results: Vec<Result<VideoPrediction, PredictionError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(results.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoPredictor for ScriptedPredictor {
    async fn predict_video(&self, _video_url: &str) -> Result<VideoPrediction, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .expect("script mutex poisoned")
            .pop_front()
            .unwrap_or(Err(PredictionError::ServiceNotConfigured))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<AssessmentId, AssessmentRecord>>>,
}

impl AssessmentRepository for MemoryRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<_> = guard
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_user(&self, _user_id: &str) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_orchestrator(
    results: Vec<Result<VideoPrediction, PredictionError>>,
) -> (
    AssessmentOrchestrator<ScriptedPredictor, MemoryRepository>,
    Arc<ScriptedPredictor>,
    Arc<MemoryRepository>,
) {
    let predictor = ScriptedPredictor::with(results);
    let repository = Arc::new(MemoryRepository::default());
    let orchestrator = AssessmentOrchestrator::new(predictor.clone(), repository.clone());
    (orchestrator, predictor, repository)
}

pub(super) fn router_with(
    orchestrator: AssessmentOrchestrator<ScriptedPredictor, MemoryRepository>,
) -> axum::Router {
    assessment_router(Arc::new(orchestrator))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}
