//! Configuration of [`DistortionEnv`](super::DistortionEnv).
use super::BinningConfig;
use crate::{Action, Dataset, DistanceType, RewardConfig};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`DistortionEnv`](super::DistortionEnv).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistortionEnvConfig {
    /// The original dataset.
    pub dataset: Dataset,

    /// Actions, in index order.
    pub actions: Vec<Action>,

    /// Capacity of the action space. Defaults to the number of actions.
    pub n_actions: Option<usize>,

    /// Discount factor of non-terminal steps.
    pub gamma: f32,

    /// Column the agent starts from.
    pub start_column: Option<String>,

    /// Discretization of the total distortion.
    pub binning: BinningConfig,

    /// Maximum number of steps in an episode.
    pub max_steps: Option<usize>,

    /// Distance of text columns.
    ///
    /// If given, the environment is ready when built. Otherwise
    /// [`initialize_text_distances`](super::DistortionEnv::initialize_text_distances)
    /// and [`prepare_column_states`](super::DistortionEnv::prepare_column_states)
    /// must be called first.
    pub distance_type: Option<DistanceType>,

    /// Configuration of the default reward manager.
    pub reward: RewardConfig,

    /// Shuffles the actions when the environment is built.
    pub shuffle_actions: bool,
}

impl Default for DistortionEnvConfig {
    fn default() -> Self {
        Self {
            dataset: Dataset::new(),
            actions: vec![],
            n_actions: None,
            gamma: 0.99,
            start_column: None,
            binning: BinningConfig::default(),
            max_steps: None,
            distance_type: None,
            reward: RewardConfig::default(),
            shuffle_actions: false,
        }
    }
}

impl DistortionEnvConfig {
    /// Sets the dataset.
    pub fn dataset(mut self, v: Dataset) -> Self {
        self.dataset = v;
        self
    }

    /// Sets the actions.
    pub fn actions(mut self, v: Vec<Action>) -> Self {
        self.actions = v;
        self
    }

    /// Sets the capacity of the action space.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.n_actions = Some(v);
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, v: f32) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the start column.
    pub fn start_column(mut self, v: impl Into<String>) -> Self {
        self.start_column = Some(v.into());
        self
    }

    /// Sets the binning.
    pub fn binning(mut self, v: BinningConfig) -> Self {
        self.binning = v;
        self
    }

    /// Sets the maximum number of steps in an episode.
    pub fn max_steps(mut self, v: Option<usize>) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the distance of text columns.
    pub fn distance_type(mut self, v: DistanceType) -> Self {
        self.distance_type = Some(v);
        self
    }

    /// Sets the reward configuration.
    pub fn reward(mut self, v: RewardConfig) -> Self {
        self.reward = v;
        self
    }

    /// Shuffles the actions when the environment is built.
    pub fn shuffle_actions(mut self, v: bool) -> Self {
        self.shuffle_actions = v;
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
    use crate::{mock, ColumnData};
    use tempdir::TempDir;

    #[test]
    fn test_save_load() -> Result<()> {
        let dir = TempDir::new("distortion_env_config")?;
        let path = dir.path().join("env_config.yaml");
        let config = DistortionEnvConfig::default()
            .dataset(mock::mock_subjects())
            .actions(vec![mock::gender_suppression(), Action::identity("salary")])
            .start_column("gender")
            .distance_type(DistanceType::Hamming)
            .max_steps(Some(5));
        config.save(&path)?;
        assert_eq!(DistortionEnvConfig::load(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_load_rejects_ragged_dataset() -> Result<()> {
        let dir = TempDir::new("distortion_env_config")?;
        let path = dir.path().join("env_config.yaml");
        let dataset = Dataset::from_columns_unchecked(vec![
            ("a", ColumnData::Integer(vec![1])),
            ("b", ColumnData::Integer(vec![1, 2, 3])),
        ]);
        DistortionEnvConfig::default().dataset(dataset).save(&path)?;
        assert!(DistortionEnvConfig::load(&path).is_err());
        Ok(())
    }
}
