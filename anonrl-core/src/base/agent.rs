//! Agent.
use super::{Env, Policy};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// Represents a trainable policy on an environment.
///
/// Agents in this library learn on-line from the transitions of a whole
/// episode, so the unit of training is [`Agent::on_episode`] rather than an
/// optimization step on a replay buffer.
pub trait Agent<E: Env>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Runs one training episode on `env`, updating the agent on-line.
    ///
    /// The returned record typically holds the episode return and length.
    fn on_episode(&mut self, env: &mut E, episode_idx: usize) -> Result<Record>;

    /// Called by the trainer once an episode has finished, for example to
    /// decay the exploration rate.
    #[allow(unused_variables)]
    fn actions_after_episode(&mut self, episode_idx: usize) {}

    /// Save the parameters of the agent in the given directory.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Load the parameters of the agent from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
