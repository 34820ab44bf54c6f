//! Error types for TaskPulse
//!
//! This module defines all error types used throughout the crate. Uses
//! `thiserror` for ergonomic error handling with automatic `Display` and
//! `Error` trait implementations.

use thiserror::Error;

/// The primary error type for TaskPulse operations.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// A deadline-bounded call did not complete in time. Carries no partial
    /// result; the abandoned worker keeps running and its output is discarded.
    #[error("Execution timed out.")]
    Timeout,

    /// A liveness probe failed (connection loss, supervisor rejection, etc.)
    #[error("Heartbeat error: {0}")]
    Heartbeat(String),

    /// A dispatched worker task could not be joined (it panicked).
    #[error("Worker error: {0}")]
    Worker(String),

    /// A supervised unit of work failed. Callers with richer error types of
    /// their own can map into or out of this variant at the boundary.
    #[error("Task error: {0}")]
    Task(String),

    /// Configuration-related errors (invalid interval, unparseable values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized `Result` type for TaskPulse operations.
pub type Result<T> = std::result::Result<T, RunnerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display_is_stable() {
        // External engines match on this text to distinguish "never finished
        // in time" from "ran and failed".
        assert_eq!(RunnerError::Timeout.to_string(), "Execution timed out.");
    }

    #[test]
    fn test_error_display() {
        let err = RunnerError::Config("interval must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: interval must be positive"
        );
        let err = RunnerError::Heartbeat("probe refused".to_string());
        assert_eq!(err.to_string(), "Heartbeat error: probe refused");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RunnerError = io_err.into();
        assert!(matches!(err, RunnerError::Io(_)));
    }

    #[test]
    fn test_result_type() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }
}
