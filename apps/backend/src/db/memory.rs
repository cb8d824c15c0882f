//! In-memory progress store for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::ProgressStore;
use crate::error::{ApiError, Result};
use crate::models::*;

#[derive(Default)]
struct Inner {
    lessons: HashMap<i64, DbLesson>,
    steps: HashMap<i64, DbStep>,
    texts: HashMap<i64, Vec<String>>,
    results: HashMap<(i64, i64), StepResult>,
    next_result_id: i64,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|e| ApiError::Internal(e.to_string()))
    }

    pub fn add_lesson(&self, id: i64, name: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.lessons.insert(
            id,
            DbLesson {
                id,
                name: name.to_string(),
                description: None,
                language: None,
            },
        );
    }

    pub fn add_step(&self, lesson_id: i64, id: i64, position: i32, texts: &[&str]) {
        let mut inner = self.inner.lock().unwrap();
        inner.steps.insert(
            id,
            DbStep {
                id,
                lesson_id,
                position,
                name: format!("Step {}", id),
                description: None,
            },
        );
        inner
            .texts
            .insert(id, texts.iter().map(|t| t.to_string()).collect());
    }

    pub fn result_count(&self, user_id: i64, step_id: i64) -> usize {
        let inner = self.inner.lock().unwrap();
        inner
            .results
            .keys()
            .filter(|key| **key == (user_id, step_id))
            .count()
    }

    pub fn timing_count(&self, step_result_id: i64) -> usize {
        let inner = self.inner.lock().unwrap();
        inner
            .results
            .values()
            .find(|r| r.id == step_result_id)
            .map(|r| r.timings.len())
            .unwrap_or(0)
    }

    fn results_for(inner: &Inner, lesson_id: i64, user_id: i64) -> Vec<StepResult> {
        let mut steps: Vec<&DbStep> = inner
            .steps
            .values()
            .filter(|s| s.lesson_id == lesson_id)
            .collect();
        steps.sort_by_key(|s| (s.position, s.id));

        steps
            .into_iter()
            .filter_map(|s| inner.results.get(&(user_id, s.id)).cloned())
            .collect()
    }
}

#[async_trait]
impl ProgressStore for InMemoryStore {
    async fn get_lesson_with_steps(
        &self,
        lesson_id: i64,
        user_id: Option<i64>,
    ) -> Result<Option<LessonDetail>> {
        let inner = self.lock()?;
        let Some(lesson) = inner.lessons.get(&lesson_id).cloned() else {
            return Ok(None);
        };

        let mut steps: Vec<DbStep> = inner
            .steps
            .values()
            .filter(|s| s.lesson_id == lesson_id)
            .cloned()
            .collect();
        steps.sort_by_key(|s| (s.position, s.id));

        let steps = steps
            .into_iter()
            .map(|step| {
                let texts = inner.texts.get(&step.id).cloned().unwrap_or_default();
                let result = user_id.and_then(|u| inner.results.get(&(u, step.id)).cloned());
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
        let inner = self.lock()?;
        Ok(Self::results_for(&inner, lesson_id, user_id))
    }

    async fn upsert_step_result(
        &self,
        user_id: i64,
        step_id: i64,
        update: &StepResultUpdate,
    ) -> Result<StepResult> {
        let mut inner = self.lock()?;
        let next_id = inner.next_result_id + 1;
        let result = inner
            .results
            .entry((user_id, step_id))
            .or_insert_with(|| StepResult::new(next_id, user_id, step_id));
        result.apply(update);
        let result = result.clone();

        if result.id == next_id {
            inner.next_result_id = next_id;
        }
        Ok(result)
    }

    async fn append_timing(&self, step_result_id: i64, seconds: i32) -> Result<()> {
        let mut inner = self.lock()?;
        let result = inner
            .results
            .values_mut()
            .find(|r| r.id == step_result_id)
            .ok_or_else(|| {
                ApiError::NotFound(format!("Step result with id={} was not found", step_result_id))
            })?;
        result.timings.push(TimingSample {
            seconds,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn step_exists(&self, step_id: i64) -> Result<bool> {
        Ok(self.lock()?.steps.contains_key(&step_id))
    }

    async fn lesson_ids(&self) -> Result<Vec<i64>> {
        let mut ids: Vec<i64> = self.lock()?.lessons.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
