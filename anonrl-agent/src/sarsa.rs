//! Episodic n-step semi-gradient SARSA on tile-coded features.
mod base;
mod config;
pub use base::SarsaSemiGradient;
pub use config::SarsaConfig;
