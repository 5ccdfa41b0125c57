use auticare::config::{AppConfig, PredictionConfig};
use auticare::error::AppError;
use auticare::prediction::{PredictionProxy, VideoPrediction, DEFAULT_CONFIDENCE};
use auticare::scoring::{fuse, FusionResult, QUESTIONNAIRE_WEIGHT, VIDEO_WEIGHT};
use auticare::telemetry;
use chrono::Utc;
use clap::Args;
use std::collections::BTreeMap;

#[derive(Args, Debug)]
pub(crate) struct FuseArgs {
    /// Normalized questionnaire score (0-100)
    #[arg(long)]
    pub(crate) questionnaire_score: f64,
    /// Video prediction score reported by the ML service (0-100)
    #[arg(long)]
    pub(crate) prediction_score: Option<f64>,
    /// Model confidence for the prediction (0-1, defaults to 0.75)
    #[arg(long, requires = "prediction_score")]
    pub(crate) confidence: Option<f64>,
}

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Publicly fetchable URL of the uploaded video
    #[arg(long)]
    pub(crate) video_url: String,
    /// Override ML_SERVICE_URL for this call
    #[arg(long)]
    pub(crate) ml_service_url: Option<String>,
}

pub(crate) fn run_fuse(args: FuseArgs) -> Result<(), AppError> {
    let FuseArgs {
        questionnaire_score,
        prediction_score,
        confidence,
    } = args;

    let prediction = prediction_score.map(|prediction_score| VideoPrediction {
        prediction_score,
        confidence: confidence.unwrap_or(DEFAULT_CONFIDENCE),
        features_detected: BTreeMap::new(),
        captured_at: Utc::now(),
    });

    let result = fuse(questionnaire_score, prediction)?;
    for line in fusion_summary(&result) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) async fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let PredictArgs {
        video_url,
        ml_service_url,
    } = args;

    let mut config = AppConfig::load()?;
    if let Some(url) = ml_service_url {
        config.prediction =
            PredictionConfig::new(Some(url)).with_timeout(config.prediction.timeout());
    }
    telemetry::init(&config.telemetry)?;

    let proxy = PredictionProxy::http(config.prediction)?;
    let prediction = proxy.predict(&video_url).await?;

    match serde_json::to_string_pretty(&prediction) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("Prediction payload unavailable: {err}"),
    }
    Ok(())
}

pub(crate) fn fusion_summary(result: &FusionResult) -> Vec<String> {
    let mut lines = vec![
        "Screening score summary".to_string(),
        format!("Questionnaire score: {:.1}", result.normalized_score),
    ];

    match (&result.video_prediction, result.fused_score) {
        (Some(prediction), Some(fused)) => {
            lines.push(format!(
                "Video prediction: {:.1} (confidence {:.0}%)",
                prediction.prediction_score,
                prediction.confidence * 100.0
            ));
            lines.push(format!(
                "Fused score: {:.1} ({:.0}% questionnaire / {:.0}% video)",
                fused,
                QUESTIONNAIRE_WEIGHT * 100.0,
                VIDEO_WEIGHT * 100.0
            ));
        }
        _ => lines.push("Video prediction: none (questionnaire score only)".to_string()),
    }

    lines.push(format!(
        "Severity: {} - {}",
        result.severity.label(),
        result.severity.guidance()
    ));
    lines
}
