//! Configuration of [`QLearning`](super::QLearning).
use crate::explorer::EpsilonGreedyConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`QLearning`](super::QLearning).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QLearningConfig {
    /// Number of states, i.e., distortion bins.
    pub n_states: usize,

    /// Number of actions.
    pub n_actions: usize,

    /// Maximum number of steps in an episode.
    pub n_itrs_per_episode: usize,

    /// Learning rate.
    pub alpha: f64,

    /// Discount factor.
    pub gamma: f64,

    /// Exploration.
    pub explorer: EpsilonGreedyConfig,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            n_states: 10,
            n_actions: 0,
            n_itrs_per_episode: 100,
            alpha: 0.1,
            gamma: 0.99,
            explorer: EpsilonGreedyConfig::default(),
        }
    }
}

impl QLearningConfig {
    /// Sets the size of the table.
    pub fn table_shape(mut self, n_states: usize, n_actions: usize) -> Self {
        self.n_states = n_states;
        self.n_actions = n_actions;
        self
    }

    /// Sets the maximum number of steps in an episode.
    pub fn n_itrs_per_episode(mut self, v: usize) -> Self {
        self.n_itrs_per_episode = v;
        self
    }

    /// Sets the learning rate.
    pub fn alpha(mut self, v: f64) -> Self {
        self.alpha = v;
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the exploration.
    pub fn explorer(mut self, v: EpsilonGreedyConfig) -> Self {
        self.explorer = v;
        self
    }

    /// Loads the configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves the configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::explorer::EpsilonDecay;
    use tempdir::TempDir;

    #[test]
    fn test_serde_qlearning_config() -> Result<()> {
        let config = QLearningConfig::default()
            .table_shape(10, 4)
            .alpha(0.2)
            .explorer(EpsilonGreedyConfig::default().decay(EpsilonDecay::InverseStep));

        let dir = TempDir::new("qlearning_config")?;
        let path = dir.path().join("qlearning_config.yaml");
        config.save(&path)?;
        let config_ = QLearningConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
