//! Environment binning the distortion of a dataset into discrete states.
mod base;
mod binning;
mod config;
pub use base::{DistortionEnv, EnvStatus};
pub use binning::{BinningConfig, Bins};
pub use config::DistortionEnvConfig;
