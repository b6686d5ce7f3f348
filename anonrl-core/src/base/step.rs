//! Environment step.
use super::Env;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Additional information to `Obs` and `Act`.
pub trait Info: Clone + Debug {}

impl Info for () {}

/// Position of a [`Step`] within an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepType {
    /// The first step of an episode, emitted by [`Env::reset`].
    First,

    /// Any step that neither starts nor ends an episode.
    Mid,

    /// The last step of an episode.
    Last,
}

/// Represents an observation, reward, discount and step-type tuple emitted
/// by [`Env::reset`] and [`Env::step`], with some additional information.
pub struct Step<E: Env> {
    /// Observation.
    pub obs: E::Obs,

    /// Reward.
    pub reward: f32,

    /// Discount.
    pub discount: f32,

    /// Position of this step within the episode.
    pub step_type: StepType,

    /// Information defined by the environment.
    pub info: E::Info,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(
        obs: E::Obs,
        reward: f32,
        discount: f32,
        step_type: StepType,
        info: E::Info,
    ) -> Self {
        Step {
            obs,
            reward,
            discount,
            step_type,
            info,
        }
    }

    /// Constructs the first step of an episode, with reward 0 and discount 1.
    pub fn first(obs: E::Obs, info: E::Info) -> Self {
        Self::new(obs, 0.0, 1.0, StepType::First, info)
    }

    #[inline]
    /// Returns `true` if this step starts an episode.
    pub fn is_first(&self) -> bool {
        self.step_type == StepType::First
    }

    #[inline]
    /// Returns `true` if this step is in the middle of an episode.
    pub fn is_mid(&self) -> bool {
        self.step_type == StepType::Mid
    }

    #[inline]
    /// Returns `true` if this step ends an episode.
    pub fn is_last(&self) -> bool {
        self.step_type == StepType::Last
    }

    /// Replaces the observation, keeping reward, discount, step type and info.
    ///
    /// Used by environment wrappers that repackage the observation of the
    /// environment they wrap.
    pub fn map_obs<F: Env<Info = E::Info>>(self, obs: F::Obs) -> Step<F> {
        Step {
            obs,
            reward: self.reward,
            discount: self.discount,
            step_type: self.step_type,
            info: self.info,
        }
    }
}

impl<E: Env> Clone for Step<E> {
    fn clone(&self) -> Self {
        Self {
            obs: self.obs.clone(),
            reward: self.reward,
            discount: self.discount,
            step_type: self.step_type,
            info: self.info.clone(),
        }
    }
}

impl<E: Env> Debug for Step<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("obs", &self.obs)
            .field("reward", &self.reward)
            .field("discount", &self.discount)
            .field("step_type", &self.step_type)
            .field("info", &self.info)
            .finish()
    }
}
