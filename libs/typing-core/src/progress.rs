//! Lesson progress aggregation.
//!
//! Folds the per-step results of one user into a [`LessonResult`]. All
//! divisions are integer floor divisions; nothing here rounds to nearest.

use crate::types::{LessonDetail, LessonResult, LessonsStats, StepResult, StepStatus};

/// Compute a user's progress across a lesson.
///
/// `lesson.steps` must already carry the user's results (at most one per step).
/// Returns `None` for anonymous callers. When the lesson has no steps or the
/// user has no results, only the identifying fields are set.
pub fn compute_lesson_result(user_id: Option<i64>, lesson: &LessonDetail) -> Option<LessonResult> {
    let user_id = user_id?;

    let steps_count = lesson.steps.len();
    let results: Vec<&StepResult> = lesson
        .steps
        .iter()
        .filter_map(|step| step.result.as_ref())
        .collect();
    let results_count = results.len();

    if steps_count == 0 || results_count == 0 {
        return Some(LessonResult::unset(lesson.id, user_id));
    }

    let percentage = (results_count * 100 / steps_count) as i32;

    let wpm_sum: i64 = results.iter().map(|r| r.wpm.unwrap_or(0) as i64).sum();
    let average_wpm = (wpm_sum / results_count as i64) as i32;

    let (total_time_spent, total_time_best) = results
        .iter()
        .filter_map(|r| r.timing_totals())
        .fold((0i64, 0i64), |(spent, best), (s, b)| (spent + s, best + b));

    Some(LessonResult {
        lesson_id: lesson.id,
        user_id,
        percentage: Some(percentage),
        status: Some(lesson_status(steps_count, &results)),
        average_wpm: Some(average_wpm),
        total_time_spent: Some(total_time_spent),
        total_time_best: Some(total_time_best),
    })
}

/// Any failed step fails the lesson; success needs every step passed.
fn lesson_status(steps_count: usize, results: &[&StepResult]) -> StepStatus {
    if results.iter().any(|r| r.status == Some(StepStatus::Fail)) {
        return StepStatus::Fail;
    }
    let all_passed = results
        .iter()
        .all(|r| r.status == Some(StepStatus::Success));
    if results.len() == steps_count && all_passed {
        StepStatus::Success
    } else {
        StepStatus::NotChecked
    }
}

/// Summarize a user's lesson results into profile statistics.
pub fn summarize_lessons(results: &[LessonResult]) -> LessonsStats {
    let started: Vec<&LessonResult> = results.iter().filter(|r| r.percentage.is_some()).collect();

    let lessons_completed = started
        .iter()
        .filter(|r| r.percentage == Some(100))
        .count();

    let average_wpm = if started.is_empty() {
        None
    } else {
        let sum: i64 = started
            .iter()
            .map(|r| r.average_wpm.unwrap_or(0) as i64)
            .sum();
        Some((sum / started.len() as i64) as i32)
    };

    let total_time_spent = started.iter().filter_map(|r| r.total_time_spent).sum();

    LessonsStats {
        lessons_total: results.len(),
        lessons_started: started.len(),
        lessons_completed,
        average_wpm,
        total_time_spent,
    }
}
