//! Vectorized environment.
mod base;
mod config;
pub use base::VecEnv;
pub use config::VecEnvConfig;
