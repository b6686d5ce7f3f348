//! Core functionalities.
mod agent;
mod env;
mod policy;
mod step;
pub use agent::Agent;
pub use env::Env;
pub use policy::{Configurable, Policy};
use std::fmt::Debug;
pub use step::{Info, Step, StepType};

/// An observation of an environment.
///
/// Environments in this library are not vectorized. A batch of observations
/// coming from several environment replicas is a `Vec` of them, see the
/// `anonrl-vec-env` crate.
pub trait Obs: Clone + Debug {}

/// An action of an environment.
pub trait Act: Clone + Debug {}

impl Obs for usize {}

impl Act for usize {}
