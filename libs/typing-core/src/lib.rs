//! Core typing-tutor library shared by the backend and any other consumer.
//!
//! Provides:
//! - Lesson, step and step-result types
//! - Lesson progress aggregation (completion, WPM, time spent)
//! - Validation of partial step-result updates

pub mod error;
pub mod progress;
pub mod types;

pub use error::{Result, ValidationError};
pub use progress::{compute_lesson_result, summarize_lessons};
pub use types::{
    LessonDetail, LessonResult, LessonsStats, StepDetail, StepResult, StepResultUpdate,
    StepStatus, TimingSample,
};
