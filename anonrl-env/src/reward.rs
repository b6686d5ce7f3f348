//! Rewards of anonymization steps.
use crate::{Action, State};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Computes the reward of a transition.
///
/// Implementations are stateless per call.
pub trait RewardManager: Send {
    /// Reward of moving from `old` to `new` by applying `action`.
    fn compute(&self, old: &State, new: &State, action: &Action) -> f32;
}

/// Configuration of [`DistortionRewardManager`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Weight of the loss of utility, i.e., the increase of total distortion.
    pub utility_weight: f64,

    /// Weight of the disclosure risk, i.e., one minus the mean column distortion.
    pub risk_weight: f64,

    /// Mean column distortion above which the penalty is added.
    pub max_distortion: f64,

    /// Added to the reward when the mean column distortion exceeds `max_distortion`.
    pub max_distortion_penalty: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            utility_weight: 1.0,
            risk_weight: 0.1,
            max_distortion: 0.7,
            max_distortion_penalty: -1.0,
        }
    }
}

impl RewardConfig {
    /// Sets the utility weight.
    pub fn utility_weight(mut self, v: f64) -> Self {
        self.utility_weight = v;
        self
    }

    /// Sets the risk weight.
    pub fn risk_weight(mut self, v: f64) -> Self {
        self.risk_weight = v;
        self
    }

    /// Sets the distortion threshold and its penalty.
    pub fn max_distortion(mut self, threshold: f64, penalty: f64) -> Self {
        self.max_distortion = threshold;
        self.max_distortion_penalty = penalty;
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

/// Trades the utility lost by a step against the disclosure risk left.
#[derive(Debug, Clone, Default)]
pub struct DistortionRewardManager {
    config: RewardConfig,
}

impl DistortionRewardManager {
    /// Constructs a reward manager.
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }
}

impl RewardManager for DistortionRewardManager {
    fn compute(&self, old: &State, new: &State, _action: &Action) -> f32 {
        let c = &self.config;
        let mean = new.mean_column_distortion();
        let mut reward = -c.utility_weight * (new.total_distortion - old.total_distortion)
            - c.risk_weight * (1.0 - mean);
        if mean > c.max_distortion {
            reward += c.max_distortion_penalty;
        }
        reward as f32
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    fn state(distortions: Vec<f64>) -> State {
        State {
            total_distortion: distortions.iter().sum(),
            column_names: (0..distortions.len()).map(|i| i.to_string()).collect(),
            column_distortions: distortions,
            ..State::default()
        }
    }

    #[test]
    fn test_reward() {
        let manager = DistortionRewardManager::new(RewardConfig::default());
        let action = Action::identity("0");
        let old = state(vec![0.0, 0.0]);

        let r = manager.compute(&old, &state(vec![0.5, 0.0]), &action);
        assert!((r - (-0.5 - 0.1 * 0.75)).abs() < 1e-6);

        // Mean distortion 0.9 is above the threshold.
        let r = manager.compute(&old, &state(vec![0.9, 0.9]), &action);
        assert!((r - (-1.8 - 0.1 * 0.1 - 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_config_save_load() -> Result<()> {
        let dir = TempDir::new("reward_config")?;
        let path = dir.path().join("reward_config.yaml");
        let config = RewardConfig::default().risk_weight(0.5).max_distortion(0.8, -2.0);
        config.save(&path)?;
        assert_eq!(RewardConfig::load(&path)?, config);
        Ok(())
    }
}
