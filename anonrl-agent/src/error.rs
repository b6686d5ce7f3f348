//! Errors in the agent crate.
use thiserror::Error;

/// Errors raised by agents.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AgentError {
    /// The observation is not a state of the value table.
    #[error("State {state} is out of range, the table has {n_states} states")]
    StateOutOfRange {
        /// Observed state.
        state: usize,

        /// Number of states of the table.
        n_states: usize,
    },

    /// Loaded parameters do not fit the configuration of the agent.
    #[error("Parameters have shape {found:?}, expected {expected:?}")]
    ParamsShape {
        /// Shape required by the configuration.
        expected: Vec<usize>,

        /// Shape of the loaded parameters.
        found: Vec<usize>,
    },
}
