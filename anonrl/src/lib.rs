//! Reinforcement learning for tabular data anonymization.
//!
//! The harness consists of the following crates:
//!
//! * [anonrl-core](anonrl_core) provides the traits shared by environments
//!   and agents, records, the episodic trainer and the evaluator.
//! * [anonrl-env](anonrl_env) has the dataset model, the anonymization
//!   actions and their action space, the distortion environment and the
//!   tile-coding wrapper.
//! * [anonrl-agent](anonrl_agent) includes epsilon-greedy exploration,
//!   tabular Q-learning and n-step semi-gradient SARSA.
//! * [anonrl-vec-env](anonrl_vec_env) runs environment replicas in worker
//!   threads in lock-step.
//!
//! This crate re-exports them and holds the examples training agents on the
//! mock-subjects dataset.
pub use anonrl_agent as agent;
pub use anonrl_core as core;
pub use anonrl_env as env;
pub use anonrl_vec_env as vec_env;

pub mod util;
