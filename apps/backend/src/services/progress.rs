//! Lesson progress operations.
//!
//! Everything here goes through a [`ProgressStore`], so the same code runs
//! against Postgres in the server and against the in-memory store in tests.

use typing_core::{summarize_lessons, LessonResult, LessonsStats, StepResultUpdate};

use crate::db::ProgressStore;
use crate::error::{ApiError, Result};
use crate::models::LessonView;

fn lesson_not_found(lesson_id: i64) -> ApiError {
    ApiError::NotFound(format!("Lesson with id={} was not found", lesson_id))
}

/// Load a lesson tree with the caller's results and aggregate progress.
pub async fn get_lesson<S>(store: &S, user_id: Option<i64>, lesson_id: i64) -> Result<LessonView>
where
    S: ProgressStore + ?Sized,
{
    let lesson = store
        .get_lesson_with_steps(lesson_id, user_id)
        .await?
        .ok_or_else(|| lesson_not_found(lesson_id))?;

    let result = typing_core::compute_lesson_result(user_id, &lesson);
    Ok(LessonView { lesson, result })
}

/// Aggregate progress of a user on a lesson; `None` for anonymous callers.
///
/// The lesson must exist even when no user is given.
pub async fn compute_lesson_result<S>(
    store: &S,
    user_id: Option<i64>,
    lesson_id: i64,
) -> Result<Option<LessonResult>>
where
    S: ProgressStore + ?Sized,
{
    let lesson = store
        .get_lesson_with_steps(lesson_id, user_id)
        .await?
        .ok_or_else(|| lesson_not_found(lesson_id))?;

    Ok(typing_core::compute_lesson_result(user_id, &lesson))
}

/// Record an attempt on a step and return the id of the user's step result.
///
/// Provided fields overwrite the stored ones; a positive `timing` is appended
/// as a new sample.
pub async fn set_step_result<S>(
    store: &S,
    user_id: i64,
    step_id: i64,
    update: &StepResultUpdate,
) -> Result<i64>
where
    S: ProgressStore + ?Sized,
{
    update.validate()?;

    if !store.step_exists(step_id).await? {
        return Err(ApiError::NotFound(format!(
            "Step with id={} was not found",
            step_id
        )));
    }

    let result = store.record_attempt(user_id, step_id, update).await?;

    tracing::debug!(
        user_id,
        step_id,
        step_result_id = result.id,
        "Step result saved"
    );
    Ok(result.id)
}

/// Summary of a user's progress over every lesson.
pub async fn user_lessons_stats<S>(store: &S, user_id: i64) -> Result<LessonsStats>
where
    S: ProgressStore + ?Sized,
{
    let mut results = Vec::new();
    for lesson_id in store.lesson_ids().await? {
        // Lessons removed between the two reads are skipped.
        let Some(lesson) = store.get_lesson_with_steps(lesson_id, Some(user_id)).await? else {
            continue;
        };
        if let Some(result) = typing_core::compute_lesson_result(Some(user_id), &lesson) {
            results.push(result);
        }
    }

    Ok(summarize_lessons(&results))
}
