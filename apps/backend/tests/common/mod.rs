//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up test environment with database
//! - Helper functions for creating users, lessons and steps
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL env var).

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use axum::Router;

use typing_tutor_backend::config::Config;
use typing_tutor_backend::db::Database;
use typing_tutor_backend::models::{
    CreateLessonRequest, DbLesson, DbStep, DbStepText, NewStep, NewStepText,
};
use typing_tutor_backend::services::auth;
use typing_tutor_backend::{build_router, AppState};

/// Test context containing database connection and router.
///
/// Requires DATABASE_URL environment variable to be set.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url, 5)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let config = Config {
            database_url,
            // Cache disabled so each test sees its own writes
            lessons_cache_ttl_secs: 0,
            password_hash_cost: fixtures::PASSWORD_HASH_COST,
            ..Default::default()
        };
        let state = AppState::new(db, config);
        let db = state.db.clone();
        let app = build_router(state);

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test user with a unique name and return its ID and token.
    pub async fn create_test_user(&self) -> (i64, String) {
        let username = fixtures::unique_username("user");
        let hash = auth::hash_password(fixtures::PASSWORD, fixtures::PASSWORD_HASH_COST)
            .expect("Failed to hash test password");

        let user = self
            .db
            .create_user(&username, &hash)
            .await
            .expect("Failed to create test user");
        let token = auth::issue_token(&self.db, user.id, 1)
            .await
            .expect("Failed to issue test token");

        (user.id, token)
    }

    /// Create a lesson with `steps` steps, each carrying one practice text.
    pub async fn create_test_lesson(&self, steps: usize) -> (i64, Vec<i64>) {
        let lesson = self
            .db
            .add_one::<DbLesson>(&CreateLessonRequest {
                name: fixtures::unique_lesson_name("lesson"),
                description: Some("Integration test lesson".to_string()),
                language: Some("en".to_string()),
            })
            .await
            .expect("Failed to create test lesson");

        let mut step_ids = Vec::with_capacity(steps);
        for position in 0..steps {
            let step = self
                .db
                .add_one::<DbStep>(&NewStep {
                    lesson_id: lesson.id,
                    position: position as i32,
                    name: format!("Step {}", position + 1),
                    description: None,
                })
                .await
                .expect("Failed to create test step");

            self.db
                .add_one::<DbStepText>(&NewStepText {
                    lesson_step_id: step.id,
                    name: None,
                    text: fixtures::sample_text(position),
                })
                .await
                .expect("Failed to create test text");

            step_ids.push(step.id);
        }

        (lesson.id, step_ids)
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Clean up a test user. Tokens and results cascade.
    pub async fn cleanup_user(&self, user_id: i64) {
        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }

    /// Clean up a test lesson. Steps, texts, results and timings cascade.
    pub async fn cleanup_lesson(&self, lesson_id: i64) {
        let _ = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .execute(self.db.pool())
            .await;
    }
}
