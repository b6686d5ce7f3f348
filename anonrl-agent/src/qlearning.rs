//! Tabular Q-learning.
mod base;
mod config;
mod table;
pub use base::QLearning;
pub use config::QLearningConfig;
pub use table::QTable;
