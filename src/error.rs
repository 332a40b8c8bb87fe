// src/error.rs

//! Unified error handling for the roster exporter.

use std::fmt;

use thiserror::Error;

/// Result type alias for roster operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A paginated fetch failed, either after exhausting retries or on a
    /// non-retryable response. Course-scoped: the orchestrator leaves the
    /// course unprocessed and continues the run.
    #[error("fetch failed for {url} after {attempts} attempt(s): {message}")]
    Fetch {
        url: String,
        attempts: u32,
        message: String,
    },

    /// An enrollment record did not have the expected shape.
    #[error("malformed enrollment record in course {course_id}: {message}")]
    MalformedRecord { course_id: u64, message: String },

    /// The checkpoint file exists but cannot be parsed. Fatal at startup:
    /// the run must not proceed with an assumed-empty checkpoint.
    #[error("checkpoint file {path} is corrupt: {message}")]
    CheckpointCorrupt { path: String, message: String },

    /// The final export artifact could not be written.
    #[error("failed to write export to {path}: {message}")]
    Export { path: String, message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error with the url and attempt count it failed on.
    pub fn fetch(url: impl Into<String>, attempts: u32, message: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            attempts,
            message: message.to_string(),
        }
    }

    /// Create a malformed-record error scoped to a course.
    pub fn malformed(course_id: u64, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            course_id,
            message: message.into(),
        }
    }

    /// Create a corrupt-checkpoint error.
    pub fn checkpoint_corrupt(path: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::CheckpointCorrupt {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create an export-write error.
    pub fn export(path: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Export {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error is scoped to a single course rather than the run.
    pub fn is_course_scoped(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::MalformedRecord { .. })
    }
}
