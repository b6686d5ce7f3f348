#![warn(missing_docs)]
//! Anonymization environments.
//!
//! An agent anonymizes a tabular [`Dataset`] by choosing, one step at a time,
//! a column-level [`Action`] from an [`ActionSpace`]: suppression,
//! generalization along a [`SerialHierarchy`], a numeric transformation, or
//! the identity. [`DistortionEnv`] applies the action, measures how far every
//! column now is from the original data and bins the total distortion into a
//! discrete state. [`TiledEnv`] wraps any environment implementing
//! [`ActionEnv`] and maps (scaled state, action) pairs to tile indices for
//! linear function approximation.
mod action;
mod action_space;
mod dataset;
mod distance;
mod distortion_env;
mod error;
mod hierarchy;
pub mod mock;
mod reward;
mod state;
mod tiled_env;

pub use action::{Action, ActionKind, ActionType, Generalize, Suppress, Transform, TransformMethod};
pub use action_space::ActionSpace;
pub use dataset::{Column, ColumnData, ColumnType, Dataset};
pub use distance::{DistanceType, TextDistanceCalculator};
pub use distortion_env::{Bins, BinningConfig, DistortionEnv, DistortionEnvConfig, EnvStatus};
pub use error::EnvError;
pub use hierarchy::SerialHierarchy;
pub use reward::{DistortionRewardManager, RewardConfig, RewardManager};
pub use state::State;
pub use tiled_env::{tiles, Iht, TiledEnv, TiledEnvConfig, TilingConfig};

use anonrl_core::Env;

/// An environment whose actions are indices into an [`ActionSpace`].
///
/// This is the seam between [`TiledEnv`] and the environment it wraps, so that
/// either side can be exercised with a stub implementing the same trait.
pub trait ActionEnv: Env<Act = usize> {
    /// Applies the action with index `act` to the dataset owned by the
    /// environment, without computing a transition.
    fn apply_action(&mut self, act: usize) -> Result<(), EnvError>;

    /// Returns the action with index `idx`.
    fn get_action(&self, idx: usize) -> Result<&Action, EnvError>;

    /// The action space of the environment.
    fn action_space(&self) -> &ActionSpace;

    /// Names of the dataset columns, in dataset order.
    fn column_names(&self) -> Vec<String>;

    /// The number of discrete states, i.e., distortion bins.
    fn n_states(&self) -> usize;

    /// Total distortion of the current dataset with respect to the original one.
    fn total_current_distortion(&self) -> Result<f64, EnvError>;
}
