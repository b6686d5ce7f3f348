//! Configuration of [`SarsaSemiGradient`](super::SarsaSemiGradient).
use crate::explorer::EpsilonGreedyConfig;
use anonrl_env::TilingConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`SarsaSemiGradient`](super::SarsaSemiGradient).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarsaConfig {
    /// Number of rewards accumulated before bootstrapping.
    pub n: usize,

    /// Step size, divided by the number of tilings.
    pub alpha: f64,

    /// Discount factor.
    pub gamma: f64,

    /// Maximum number of steps in an episode.
    pub n_itrs_per_episode: usize,

    /// Number of actions.
    pub n_actions: usize,

    /// Tile coding of the state, the same as that of the environment.
    pub tiling: TilingConfig,

    /// Exploration.
    pub explorer: EpsilonGreedyConfig,
}

impl Default for SarsaConfig {
    fn default() -> Self {
        Self {
            n: 1,
            alpha: 0.1,
            gamma: 0.99,
            n_itrs_per_episode: 100,
            n_actions: 0,
            tiling: TilingConfig::default(),
            explorer: EpsilonGreedyConfig::default(),
        }
    }
}

impl SarsaConfig {
    /// Sets the number of steps before bootstrapping.
    pub fn n(mut self, v: usize) -> Self {
        self.n = v;
        self
    }

    /// Sets the step size.
    pub fn alpha(mut self, v: f64) -> Self {
        self.alpha = v;
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the maximum number of steps in an episode.
    pub fn n_itrs_per_episode(mut self, v: usize) -> Self {
        self.n_itrs_per_episode = v;
        self
    }

    /// Sets the number of actions.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.n_actions = v;
        self
    }

    /// Sets the tile coding.
    pub fn tiling(mut self, v: TilingConfig) -> Self {
        self.tiling = v;
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
