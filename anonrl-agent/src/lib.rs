#![warn(missing_docs)]
//! Agents learning anonymization policies.
//!
//! [`QLearning`] keeps a table of action values indexed by the distortion
//! bin of [`DistortionEnv`](anonrl_env::DistortionEnv).
//! [`SarsaSemiGradient`] approximates action values linearly over the tiles
//! produced by [`TiledEnv`](anonrl_env::TiledEnv).
//! Both explore with [`EpsilonGreedy`].
mod error;
mod explorer;
mod qlearning;
mod sarsa;

pub use error::AgentError;
pub use explorer::{argmax, EpsilonDecay, EpsilonGreedy, EpsilonGreedyConfig, QValues};
pub use qlearning::{QLearning, QLearningConfig, QTable};
pub use sarsa::{SarsaConfig, SarsaSemiGradient};
