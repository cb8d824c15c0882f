//! Core types for the typing tutor.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Outcome of the latest attempt on a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Fail,
    NotChecked,
}

impl StepStatus {
    /// Get the status name as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Fail => "fail",
            Self::NotChecked => "notchecked",
        }
    }
}

impl FromStr for StepStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "success" => Ok(Self::Success),
            "fail" => Ok(Self::Fail),
            "notchecked" => Ok(Self::NotChecked),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// One timed attempt on a step, in whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingSample {
    pub seconds: i32,
    pub created_at: DateTime<Utc>,
}

/// A user's current recorded outcome for one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub id: i64,
    pub user_id: i64,
    pub step_id: i64,
    pub percentage: Option<i32>,
    pub status: Option<StepStatus>,
    pub wpm: Option<i32>,
    #[serde(default)]
    pub timings: Vec<TimingSample>,
}

impl StepResult {
    /// Create an empty result for a (user, step) pair.
    pub fn new(id: i64, user_id: i64, step_id: i64) -> Self {
        Self {
            id,
            user_id,
            step_id,
            percentage: None,
            status: None,
            wpm: None,
            timings: Vec::new(),
        }
    }

    /// Overwrite the fields present in `update`, leaving the others untouched.
    ///
    /// Timing samples are not touched here; see [`StepResultUpdate::timing_sample`].
    pub fn apply(&mut self, update: &StepResultUpdate) {
        if let Some(percentage) = update.percentage {
            self.percentage = Some(percentage);
        }
        if let Some(status) = update.status {
            self.status = Some(status);
        }
        if let Some(wpm) = update.wpm {
            self.wpm = Some(wpm);
        }
    }

    /// Sum and minimum of the recorded timings, or `None` without samples.
    pub fn timing_totals(&self) -> Option<(i64, i64)> {
        let best = self.timings.iter().map(|t| t.seconds as i64).min()?;
        let spent = self.timings.iter().map(|t| t.seconds as i64).sum();
        Some((spent, best))
    }
}

/// Partial update for a step result. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResultUpdate {
    pub percentage: Option<i32>,
    pub status: Option<StepStatus>,
    pub wpm: Option<i32>,
    /// Seconds spent on this attempt.
    pub timing: Option<i32>,
}

impl StepResultUpdate {
    /// Reject values no attempt can produce.
    pub fn validate(&self) -> Result<()> {
        if let Some(p) = self.percentage {
            if !(0..=100).contains(&p) {
                return Err(ValidationError::PercentageOutOfRange(p));
            }
        }
        if let Some(wpm) = self.wpm {
            if wpm < 0 {
                return Err(ValidationError::NegativeWpm(wpm));
            }
        }
        if let Some(timing) = self.timing {
            if timing < 0 {
                return Err(ValidationError::NegativeTiming(timing));
            }
        }
        Ok(())
    }

    /// Seconds to append as a new timing sample; only strictly positive values count.
    pub fn timing_sample(&self) -> Option<i32> {
        self.timing.filter(|t| *t > 0)
    }
}

/// A step with its practice texts and, when a user is known, their result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDetail {
    pub id: i64,
    pub lesson_id: i64,
    pub position: i32,
    pub name: String,
    pub description: Option<String>,
    pub texts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<StepResult>,
}

/// A lesson with its ordered steps loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonDetail {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub steps: Vec<StepDetail>,
}

/// Derived progress of one user across one lesson. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonResult {
    pub lesson_id: i64,
    pub user_id: i64,
    pub percentage: Option<i32>,
    pub status: Option<StepStatus>,
    pub average_wpm: Option<i32>,
    pub total_time_spent: Option<i64>,
    pub total_time_best: Option<i64>,
}

impl LessonResult {
    /// Result with identifying fields only; used when there is nothing to average.
    pub fn unset(lesson_id: i64, user_id: i64) -> Self {
        Self {
            lesson_id,
            user_id,
            percentage: None,
            status: None,
            average_wpm: None,
            total_time_spent: None,
            total_time_best: None,
        }
    }
}

/// Summary of a user's progress over every lesson.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonsStats {
    pub lessons_total: usize,
    pub lessons_started: usize,
    pub lessons_completed: usize,
    pub average_wpm: Option<i32>,
    pub total_time_spent: i64,
}
