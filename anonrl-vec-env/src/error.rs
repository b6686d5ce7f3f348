//! Errors in the vectorized environment.
use thiserror::Error;

/// Errors raised by [`VecEnv`](crate::VecEnv).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VecEnvError {
    /// The channels of a worker are closed, e.g., the worker panicked.
    #[error("Worker {0} is disconnected")]
    WorkerDisconnected(usize),

    /// A worker replied with a response not matching the command.
    #[error("Worker {rank} replied {found} to {command}")]
    UnexpectedResponse {
        /// Rank of the worker.
        rank: usize,

        /// Name of the command.
        command: String,

        /// Name of the response.
        found: String,
    },

    /// The number of actions differs from the number of workers.
    #[error("Got {found} actions for {n_workers} workers")]
    ActionLength {
        /// Number of workers.
        n_workers: usize,

        /// Number of actions.
        found: usize,
    },

    /// The configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The workers have been closed.
    #[error("The workers have been closed")]
    Closed,
}
