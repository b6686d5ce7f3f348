//! Errors in the library.
use thiserror::Error;

/// Errors raised by the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// Invalid value in a trainer configuration.
    #[error("Invalid trainer configuration: {0}")]
    TrainerConfigError(String),
}
