//! Environment.
use super::{Act, Info, Obs, Step};
use crate::record::Record;
use anyhow::Result;

/// Represents an environment, typically an MDP.
///
/// An environment is not reentrant: [`Env::step`] and [`Env::reset`] take
/// `&mut self` and must be serialized by the caller.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Performes an environment step.
    ///
    /// The returned [`Step`] has [`StepType::Mid`] or [`StepType::Last`].
    ///
    /// [`StepType::Mid`]: super::StepType::Mid
    /// [`StepType::Last`]: super::StepType::Last
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized;

    /// Resets the environment and returns the first step of a new episode.
    ///
    /// The returned [`Step`] has [`StepType::First`], reward `0` and discount `1`.
    ///
    /// [`StepType::First`]: super::StepType::First
    fn reset(&mut self) -> Result<Step<Self>>
    where
        Self: Sized;
}
