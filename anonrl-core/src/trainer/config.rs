//! Configuration of [`Trainer`](super::Trainer).
use crate::error::CoreError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The number of training episodes.
    pub n_episodes: usize,

    /// Interval of evaluation in episodes.
    pub eval_interval: usize,

    /// Interval of flushing records in episodes.
    pub flush_record_interval: usize,

    /// Interval of logging training progress in episodes.
    pub output_msg_frequency: usize,

    /// Where to save the trained agent.
    pub model_dir: Option<String>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            n_episodes: 0,
            eval_interval: usize::MAX,
            flush_record_interval: usize::MAX,
            output_msg_frequency: usize::MAX,
            model_dir: None,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of training episodes.
    pub fn n_episodes(mut self, v: usize) -> Self {
        self.n_episodes = v;
        self
    }

    /// Sets the interval of evaluation in episodes.
    pub fn eval_interval(mut self, v: usize) -> Self {
        self.eval_interval = v;
        self
    }

    /// Sets the interval of flushing records in episodes.
    pub fn flush_record_interval(mut self, v: usize) -> Self {
        self.flush_record_interval = v;
        self
    }

    /// Sets the interval of progress messages in episodes.
    pub fn output_msg_frequency(mut self, v: usize) -> Self {
        self.output_msg_frequency = v;
        self
    }

    /// Sets the directory where the agent is saved.
    pub fn model_dir(mut self, model_dir: impl Into<String>) -> Self {
        self.model_dir = Some(model_dir.into());
        self
    }

    /// Checks that every interval is positive.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, v) in [
            ("eval_interval", self.eval_interval),
            ("flush_record_interval", self.flush_record_interval),
            ("output_msg_frequency", self.output_msg_frequency),
        ] {
            if v == 0 {
                return Err(CoreError::TrainerConfigError(format!(
                    "{} should be > 0",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_trainer_config() -> Result<()> {
        let config = TrainerConfig::default()
            .n_episodes(10)
            .eval_interval(5)
            .output_msg_frequency(2)
            .model_dir("some/directory");

        let dir = TempDir::new("trainer_config")?;
        let path = dir.path().join("trainer_config.yaml");

        config.save(&path)?;
        let config_ = TrainerConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let config = TrainerConfig::default().n_episodes(1).eval_interval(0);
        assert!(matches!(
            config.validate(),
            Err(CoreError::TrainerConfigError(_))
        ));
    }
}
