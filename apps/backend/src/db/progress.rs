//! Progress queries: lesson trees, step results and timings

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgConnection;

use super::{Database, ProgressStore};
use crate::error::{ApiError, Result};
use crate::models::*;

#[async_trait]
impl ProgressStore for Database {
    async fn get_lesson_with_steps(
        &self,
        lesson_id: i64,
        user_id: Option<i64>,
    ) -> Result<Option<LessonDetail>> {
        let lesson = sqlx::query_as::<_, DbLesson>(
            r#"
            SELECT id, name, description, language
            FROM lessons
            WHERE id = $1
            "#,
        )
        .bind(lesson_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(lesson) = lesson else {
            return Ok(None);
        };

        let steps = sqlx::query_as::<_, DbStep>(
            r#"
            SELECT id, lesson_id, position, name, description
            FROM lesson_steps
            WHERE lesson_id = $1
            ORDER BY position, id
            "#,
        )
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await?;

        let texts = sqlx::query_as::<_, DbStepText>(
            r#"
            SELECT t.id, t.lesson_step_id, t.name, t.text
            FROM lesson_step_texts t
            JOIN lesson_steps s ON s.id = t.lesson_step_id
            WHERE s.lesson_id = $1
            ORDER BY t.id
            "#,
        )
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await?;

        let mut texts_by_step: HashMap<i64, Vec<String>> = HashMap::new();
        for text in texts {
            texts_by_step
                .entry(text.lesson_step_id)
                .or_default()
                .push(text.text);
        }

        let mut results_by_step: HashMap<i64, StepResult> = match user_id {
            Some(user_id) => self
                .get_step_results_with_timings(lesson_id, user_id)
                .await?
                .into_iter()
                .map(|r| (r.step_id, r))
                .collect(),
            None => HashMap::new(),
        };

        let steps = steps
            .into_iter()
            .map(|step| {
                let texts = texts_by_step.remove(&step.id).unwrap_or_default();
                let result = results_by_step.remove(&step.id);
                step.into_detail(texts, result)
            })
            .collect();

        Ok(Some(LessonDetail {
            id: lesson.id,
            name: lesson.name,
            description: lesson.description,
            language: lesson.language,
            steps,
        }))
    }

    async fn get_step_results_with_timings(
        &self,
        lesson_id: i64,
        user_id: i64,
    ) -> Result<Vec<StepResult>> {
        let rows = sqlx::query_as::<_, DbStepResult>(
            r#"
            SELECT r.id, r.user_id, r.lesson_step_id, r.percentage, r.status, r.wpm,
                   r.created_at, r.updated_at
            FROM lesson_step_results r
            JOIN lesson_steps s ON s.id = r.lesson_step_id
            WHERE s.lesson_id = $1 AND r.user_id = $2
            ORDER BY s.position, s.id
            "#,
        )
        .bind(lesson_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let timings = sqlx::query_as::<_, DbTiming>(
            r#"
            SELECT tm.lesson_step_result_id, tm.seconds, tm.created_at
            FROM lesson_step_timings tm
            JOIN lesson_step_results r ON r.id = tm.lesson_step_result_id
            JOIN lesson_steps s ON s.id = r.lesson_step_id
            WHERE s.lesson_id = $1 AND r.user_id = $2
            ORDER BY tm.id
            "#,
        )
        .bind(lesson_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut timings_by_result: HashMap<i64, Vec<TimingSample>> = HashMap::new();
        for timing in &timings {
            timings_by_result
                .entry(timing.lesson_step_result_id)
                .or_default()
                .push(timing.to_sample());
        }

        rows.iter()
            .map(|row| {
                let timings = timings_by_result.remove(&row.id).unwrap_or_default();
                row.to_core_result(timings)
                    .map_err(|e| ApiError::Internal(format!("step result {}: {}", row.id, e)))
            })
            .collect()
    }

    async fn upsert_step_result(
        &self,
        user_id: i64,
        step_id: i64,
        update: &StepResultUpdate,
    ) -> Result<StepResult> {
        let mut conn = self.pool.acquire().await?;
        let row = upsert_result_row(&mut conn, user_id, step_id, update).await?;
        load_result(&mut conn, row).await
    }

    async fn append_timing(&self, step_result_id: i64, seconds: i32) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        insert_timing(&mut conn, step_result_id, seconds).await
    }

    async fn record_attempt(
        &self,
        user_id: i64,
        step_id: i64,
        update: &StepResultUpdate,
    ) -> Result<StepResult> {
        let mut tx = self.pool.begin().await?;

        let row = upsert_result_row(&mut tx, user_id, step_id, update).await?;
        if let Some(seconds) = update.timing_sample() {
            insert_timing(&mut tx, row.id, seconds).await?;
        }
        let result = load_result(&mut tx, row).await?;

        tx.commit().await?;
        Ok(result)
    }

    async fn step_exists(&self, step_id: i64) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM lesson_steps WHERE id = $1)")
                .bind(step_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn lesson_ids(&self) -> Result<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM lessons ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }
}

// The (user_id, lesson_step_id) unique constraint makes this a single
// atomic write; COALESCE keeps fields the update leaves out.
async fn upsert_result_row(
    conn: &mut PgConnection,
    user_id: i64,
    step_id: i64,
    update: &StepResultUpdate,
) -> Result<DbStepResult> {
    let row = sqlx::query_as::<_, DbStepResult>(
        r#"
        INSERT INTO lesson_step_results (user_id, lesson_step_id, percentage, status, wpm)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, lesson_step_id) DO UPDATE SET
            percentage = COALESCE(EXCLUDED.percentage, lesson_step_results.percentage),
            status = COALESCE(EXCLUDED.status, lesson_step_results.status),
            wpm = COALESCE(EXCLUDED.wpm, lesson_step_results.wpm),
            updated_at = NOW()
        RETURNING id, user_id, lesson_step_id, percentage, status, wpm, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(step_id)
    .bind(update.percentage)
    .bind(update.status.map(|s| s.as_str()))
    .bind(update.wpm)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row)
}

async fn insert_timing(conn: &mut PgConnection, step_result_id: i64, seconds: i32) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO lesson_step_timings (lesson_step_result_id, seconds)
        VALUES ($1, $2)
        "#,
    )
    .bind(step_result_id)
    .bind(seconds)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Attach the stored timings to a result row.
async fn load_result(conn: &mut PgConnection, row: DbStepResult) -> Result<StepResult> {
    let timings = sqlx::query_as::<_, DbTiming>(
        r#"
        SELECT lesson_step_result_id, seconds, created_at
        FROM lesson_step_timings
        WHERE lesson_step_result_id = $1
        ORDER BY id
        "#,
    )
    .bind(row.id)
    .fetch_all(&mut *conn)
    .await?;

    row.to_core_result(timings.iter().map(DbTiming::to_sample).collect())
        .map_err(|e| ApiError::Internal(format!("step result {}: {}", row.id, e)))
}
