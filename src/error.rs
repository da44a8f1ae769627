//! Error handling module
//!
//! Centralized error type aggregating every module's errors.

use crate::nacha::NachaError;
use crate::workflow::RepositoryError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Domain(#[from] crate::domain::DomainError),

    #[error(transparent)]
    Calendar(#[from] crate::calendar::CalendarError),

    #[error(transparent)]
    Nacha(#[from] crate::nacha::NachaError),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    // Infrastructure errors
    #[error(transparent)]
    Sequence(#[from] crate::nacha::SequenceError),

    #[error(transparent)]
    Repository(#[from] crate::workflow::RepositoryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    /// True when the request itself must change before it can succeed.
    pub fn is_client_error(&self) -> bool {
        match self {
            AppError::InvalidRequest(_)
            | AppError::Domain(_)
            | AppError::Calendar(_)
            | AppError::Json(_) => true,
            AppError::Nacha(e) => e.is_precondition_failure(),
            AppError::Repository(e) => matches!(e, RepositoryError::NotFound(_)),
            AppError::Sequence(_)
            | AppError::Io(_)
            | AppError::Config(_) => false,
        }
    }

    /// True when repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Sequence(e) | AppError::Nacha(NachaError::Sequence(e)) => e.is_retryable(),
            AppError::Repository(e) => e.is_retryable(),
            AppError::Io(_) => true,
            _ => false,
        }
    }

    /// Short machine-readable code, used in the CLI's error output.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::Domain(_) => "invalid_entry",
            AppError::Calendar(_) => "calendar_error",
            AppError::Nacha(NachaError::Sequence(_)) | AppError::Sequence(_) => "sequence_error",
            AppError::Nacha(_) => "generation_error",
            AppError::Json(_) => "invalid_json",
            AppError::Repository(RepositoryError::NotFound(_)) => "not_found",
            AppError::Repository(_) => "storage_error",
            AppError::Io(_) => "io_error",
            AppError::Config(_) => "config_error",
        }
    }
}
