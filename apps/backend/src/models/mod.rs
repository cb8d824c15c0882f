//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Re-export shared types from typing-core
pub use typing_core::types::{
    LessonDetail, LessonResult, LessonsStats, StepDetail, StepResult, StepResultUpdate,
    StepStatus, TimingSample,
};

// === Database Entity Types ===

/// Registered user. The password hash never leaves the backend.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// bcrypt hash string, salt included
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Lesson stored in PostgreSQL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DbLesson {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
}

/// Lesson step stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStep {
    pub id: i64,
    pub lesson_id: i64,
    pub position: i32,
    pub name: String,
    pub description: Option<String>,
}

impl DbStep {
    /// Convert to a core step with its texts and optional result attached
    pub fn into_detail(self, texts: Vec<String>, result: Option<StepResult>) -> StepDetail {
        StepDetail {
            id: self.id,
            lesson_id: self.lesson_id,
            position: self.position,
            name: self.name,
            description: self.description,
            texts,
            result,
        }
    }
}

/// Practice text of a step
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStepText {
    pub id: i64,
    pub lesson_step_id: i64,
    pub name: Option<String>,
    pub text: String,
}

/// Step result row (timings live in their own table)
#[derive(Debug, Clone, FromRow)]
pub struct DbStepResult {
    pub id: i64,
    pub user_id: i64,
    pub lesson_step_id: i64,
    pub percentage: Option<i32>,
    pub status: Option<String>,
    pub wpm: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbStepResult {
    /// Convert to the core result type
    pub fn to_core_result(&self, timings: Vec<TimingSample>) -> typing_core::Result<StepResult> {
        let status = match self.status.as_deref() {
            Some(s) => Some(s.parse::<StepStatus>()?),
            None => None,
        };

        Ok(StepResult {
            id: self.id,
            user_id: self.user_id,
            step_id: self.lesson_step_id,
            percentage: self.percentage,
            status,
            wpm: self.wpm,
            timings,
        })
    }
}

/// Timing sample row
#[derive(Debug, Clone, FromRow)]
pub struct DbTiming {
    pub lesson_step_result_id: i64,
    pub seconds: i32,
    pub created_at: DateTime<Utc>,
}

impl DbTiming {
    pub fn to_sample(&self) -> TimingSample {
        TimingSample {
            seconds: self.seconds,
            created_at: self.created_at,
        }
    }
}

// === Entity create/update payloads ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLessonRequest {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLessonRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateStepRequest {
    pub name: String,
    pub description: Option<String>,
    pub position: Option<i32>,
}

/// Step insert payload with the owning lesson resolved
#[derive(Debug, Clone)]
pub struct NewStep {
    pub lesson_id: i64,
    pub position: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStepRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub position: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTextRequest {
    pub name: Option<String>,
    pub text: String,
}

/// Text insert payload with the owning step resolved
#[derive(Debug, Clone)]
pub struct NewStepText {
    pub lesson_step_id: i64,
    pub name: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTextRequest {
    pub name: Option<String>,
    pub text: Option<String>,
}

// === API Request/Response Types ===

// Auth types
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub id: i64,
    pub username: String,
    pub token: String,
}

// User types
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserProfileResponse {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub lessons_stats: LessonsStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: i64,
}

// Lesson types
#[derive(Debug, Serialize, Deserialize)]
pub struct LessonListResponse {
    pub lessons: Vec<DbLesson>,
}

/// Lesson tree plus the caller's aggregate progress
#[derive(Debug, Serialize, Deserialize)]
pub struct LessonView {
    #[serde(flatten)]
    pub lesson: LessonDetail,
    pub result: Option<LessonResult>,
}

// Step result types
#[derive(Debug, Serialize, Deserialize)]
pub struct StepResultResponse {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: Option<&str>) -> DbStepResult {
        DbStepResult {
            id: 4,
            user_id: 1,
            lesson_step_id: 9,
            percentage: Some(75),
            status: status.map(str::to_string),
            wpm: Some(42),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn step_result_row_converts_to_core() {
        let result = row(Some("notchecked")).to_core_result(vec![]).unwrap();
        assert_eq!(result.step_id, 9);
        assert_eq!(result.status, Some(StepStatus::NotChecked));
        assert_eq!(result.wpm, Some(42));
    }

    #[test]
    fn step_result_row_without_status() {
        let result = row(None).to_core_result(vec![]).unwrap();
        assert_eq!(result.status, None);
    }

    #[test]
    fn step_result_row_with_unknown_status_fails() {
        assert!(row(Some("skipped")).to_core_result(vec![]).is_err());
    }

    #[test]
    fn lesson_view_flattens_lesson_fields() {
        let view = LessonView {
            lesson: LessonDetail {
                id: 3,
                name: "Numbers".to_string(),
                description: None,
                language: Some("en".to_string()),
                steps: vec![],
            },
            result: None,
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["name"], "Numbers");
        assert!(json["result"].is_null());
    }
}
