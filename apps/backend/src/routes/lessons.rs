//! Lesson endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::CurrentUser;
use crate::services::progress;
use crate::AppState;

const LESSONS_CACHE_KEY: &str = "lessons";

/// GET /api/lessons
pub async fn list(State(state): State<AppState>) -> Result<Json<LessonListResponse>> {
    if let Some(lessons) = state.lessons_cache.get(LESSONS_CACHE_KEY) {
        tracing::debug!("Serving lessons from cache");
        return Ok(Json(LessonListResponse { lessons }));
    }

    let lessons = state.db.get_all::<DbLesson>().await?;
    state.lessons_cache.insert(LESSONS_CACHE_KEY, lessons.clone());
    Ok(Json(LessonListResponse { lessons }))
}

/// POST /api/lessons
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateLessonRequest>,
) -> Result<Json<DbLesson>> {
    let lesson = state.db.add_one::<DbLesson>(&payload).await?;
    state.lessons_cache.invalidate(LESSONS_CACHE_KEY);
    tracing::info!(lesson_id = lesson.id, "Created lesson {}", lesson.name);
    Ok(Json(lesson))
}

/// GET /api/lessons/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(lesson_id): Path<i64>,
) -> Result<Json<LessonView>> {
    let view = progress::get_lesson(state.db.as_ref(), user_id, lesson_id).await?;
    Ok(Json(view))
}

/// PUT /api/lessons/:id
pub async fn update(
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
    Json(payload): Json<UpdateLessonRequest>,
) -> Result<Json<DbLesson>> {
    let lesson = state.db.update_one::<DbLesson>(lesson_id, &payload).await?;
    state.lessons_cache.invalidate(LESSONS_CACHE_KEY);
    Ok(Json(lesson))
}

/// DELETE /api/lessons/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
) -> Result<Json<DeletedResponse>> {
    let deleted = state.db.delete_one::<DbLesson>(lesson_id).await?;
    state.lessons_cache.invalidate(LESSONS_CACHE_KEY);
    tracing::info!(lesson_id, "Deleted lesson");
    Ok(Json(DeletedResponse { deleted }))
}

/// GET /api/lessons/:id/result
pub async fn result(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(lesson_id): Path<i64>,
) -> Result<Json<Option<LessonResult>>> {
    let result = progress::compute_lesson_result(state.db.as_ref(), user_id, lesson_id).await?;
    Ok(Json(result))
}

/// POST /api/lessons/:id/steps
pub async fn add_step(
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
    Json(payload): Json<CreateStepRequest>,
) -> Result<Json<DbStep>> {
    // 404 for unknown lessons instead of a foreign key error
    state.db.get_one::<DbLesson>(lesson_id).await?;

    let new_step = NewStep {
        lesson_id,
        position: payload.position.unwrap_or(0),
        name: payload.name,
        description: payload.description,
    };
    let step = state.db.add_one::<DbStep>(&new_step).await?;
    Ok(Json(step))
}
