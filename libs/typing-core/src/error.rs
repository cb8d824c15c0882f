//! Error types for typing-core.

use thiserror::Error;

/// Result type alias using ValidationError.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Errors raised when a step-result update carries out-of-range values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("percentage must be between 0 and 100, got {0}")]
    PercentageOutOfRange(i32),

    #[error("wpm must not be negative, got {0}")]
    NegativeWpm(i32),

    #[error("timing must not be negative, got {0}")]
    NegativeTiming(i32),

    #[error("unknown step status: {0}")]
    UnknownStatus(String),
}
