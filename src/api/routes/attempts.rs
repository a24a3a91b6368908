//! Analysis and attempt routes.

use crate::analyzer::{AnalyzeParams, AnalyzerResult};
use crate::api::error::{ApiError, ApiResult};
use crate::api::AppState;
use crate::lessons::{submit_attempt, AttemptRecord, AttemptSubmission};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::post,
    Router,
};
use tracing::info;

/// Create the analysis router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/attempts", post(create_attempt))
}

/// POST /analyze - Judge a transcript against ad-hoc expectations.
async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeParams>, JsonRejection>,
) -> ApiResult<Json<AnalyzerResult>> {
    let Json(params) = payload?;
    Ok(Json(state.analyzer.analyze(&params)))
}

/// POST /attempts - Judge a transcript against a catalog exercise.
async fn create_attempt(
    State(state): State<AppState>,
    payload: Result<Json<AttemptSubmission>, JsonRejection>,
) -> ApiResult<Json<AttemptRecord>> {
    let Json(submission) = payload?;
    let exercise = state
        .catalog
        .exercise(&submission.exercise_id)
        .ok_or_else(|| {
            ApiError::not_found(format!("Exercise {} not found", submission.exercise_id))
        })?;

    let record = submit_attempt(&state.analyzer, exercise, &submission)?;
    info!("Attempt on {}: {}", record.exercise_id, record.outcome);

    Ok(Json(record))
}
