//! Errors in the environment crate.
use crate::ColumnType;
use thiserror::Error;

/// Errors raised by actions, action spaces and environments.
///
/// All of them are returned to the immediate caller; none is retried
/// internally.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EnvError {
    /// The action space already holds as many actions as its capacity.
    #[error("Action space is saturated (capacity {capacity}). You cannot add a new action")]
    CapacityExceeded {
        /// Capacity of the action space.
        capacity: usize,
    },

    /// An exhausted or unregistered action was applied.
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Distances or column states are used before they were initialized.
    #[error("Environment is not prepared: {0}")]
    NotPrepared(String),

    /// A configuration value violates its constraints.
    #[error("Parameter {param_name} has invalid value {param_value}")]
    InvalidParamValue {
        /// Name of the parameter.
        param_name: String,

        /// The offending value and the constraint it violates.
        param_value: String,
    },

    /// Lookup by name failed.
    #[error("{0} not found")]
    NotFound(String),

    /// The distance type is not one of the supported ones.
    #[error("Distance type '{0}' is invalid")]
    UnsupportedDistanceType(String),

    /// No action of the action space has a transformation left.
    #[error("All actions of the action space are exhausted")]
    ActionSpaceExhausted,

    /// An operation does not support the type of the column it targets.
    #[error("Column {column} of type {found:?} cannot be used here, expected {expected}")]
    ColumnType {
        /// Name of the column.
        column: String,

        /// Description of the accepted column types.
        expected: String,

        /// Actual type of the column.
        found: ColumnType,
    },

    /// The episode has ended and the environment must be reset.
    #[error("The episode has finished, reset the environment")]
    EpisodeFinished,
}

impl EnvError {
    pub(crate) fn invalid_param(name: &str, value: impl Into<String>) -> Self {
        Self::InvalidParamValue {
            param_name: name.to_string(),
            param_value: value.into(),
        }
    }
}
