//! Persistence contract for lesson progress.

use async_trait::async_trait;
use chrono::Utc;

use crate::error::Result;
use crate::models::{LessonDetail, StepResult, StepResultUpdate, TimingSample};

/// Reads and writes needed by the progress operations.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Load a lesson with its ordered steps and texts.
    ///
    /// When `user_id` is set, each step carries that user's result (with
    /// timings). Returns `None` if the lesson does not exist.
    async fn get_lesson_with_steps(
        &self,
        lesson_id: i64,
        user_id: Option<i64>,
    ) -> Result<Option<LessonDetail>>;

    /// All of a user's results on the steps of a lesson, timings included.
    async fn get_step_results_with_timings(
        &self,
        lesson_id: i64,
        user_id: i64,
    ) -> Result<Vec<StepResult>>;

    /// Create or partially update the single result for (user, step).
    async fn upsert_step_result(
        &self,
        user_id: i64,
        step_id: i64,
        update: &StepResultUpdate,
    ) -> Result<StepResult>;

    /// Append one timing sample to a result.
    async fn append_timing(&self, step_result_id: i64, seconds: i32) -> Result<()>;

    /// Save one attempt: upsert the result, then append its positive timing.
    ///
    /// Stores that support transactions apply both writes or neither.
    async fn record_attempt(
        &self,
        user_id: i64,
        step_id: i64,
        update: &StepResultUpdate,
    ) -> Result<StepResult> {
        let mut result = self.upsert_step_result(user_id, step_id, update).await?;
        if let Some(seconds) = update.timing_sample() {
            self.append_timing(result.id, seconds).await?;
            result.timings.push(TimingSample {
                seconds,
                created_at: Utc::now(),
            });
        }
        Ok(result)
    }

    async fn step_exists(&self, step_id: i64) -> Result<bool>;

    /// IDs of every lesson, ascending.
    async fn lesson_ids(&self) -> Result<Vec<i64>>;
}
