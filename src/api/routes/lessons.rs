//! Lesson API routes.

use crate::api::error::{ApiError, ApiResult};
use crate::api::AppState;
use crate::lessons::Lesson;
use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;

/// Lesson listing entry without exercise bodies.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub order: u32,
    pub exercise_count: usize,
}

impl From<&Lesson> for LessonSummary {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id.clone(),
            title: lesson.title.clone(),
            description: lesson.description.clone(),
            order: lesson.order,
            exercise_count: lesson.exercises.len(),
        }
    }
}

/// Create the lessons router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lessons", get(list_lessons))
        .route("/lessons/:lesson_id", get(get_lesson))
}

/// GET /lessons - List lessons in order.
async fn list_lessons(State(state): State<AppState>) -> Json<Vec<LessonSummary>> {
    Json(state.catalog.lessons().iter().map(LessonSummary::from).collect())
}

/// GET /lessons/:lesson_id - Get a lesson with its exercises.
async fn get_lesson(
    State(state): State<AppState>,
    Path(lesson_id): Path<String>,
) -> ApiResult<Json<Lesson>> {
    let lesson = state
        .catalog
        .lesson(&lesson_id)
        .cloned()
        .ok_or_else(|| ApiError::not_found(format!("Lesson {} not found", lesson_id)))?;

    Ok(Json(lesson))
}
