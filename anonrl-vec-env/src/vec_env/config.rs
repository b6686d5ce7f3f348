//! Configuration of [`VecEnv`](super::VecEnv).
use crate::VecEnvError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`VecEnv`](super::VecEnv).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VecEnvConfig {
    /// Number of workers.
    pub n_workers: usize,

    /// Seed of the worker of rank 0. The worker of rank `i` uses `seed + i`.
    pub seed: i64,
}

impl Default for VecEnvConfig {
    fn default() -> Self {
        Self {
            n_workers: 2,
            seed: 0,
        }
    }
}

impl VecEnvConfig {
    /// Sets the number of workers.
    pub fn n_workers(mut self, v: usize) -> Self {
        self.n_workers = v;
        self
    }

    /// Sets the base seed.
    pub fn seed(mut self, v: i64) -> Self {
        self.seed = v;
        self
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<(), VecEnvError> {
        match self.n_workers {
            0 => Err(VecEnvError::InvalidConfig(
                "n_workers should be > 0".to_string(),
            )),
            _ => Ok(()),
        }
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
    use tempdir::TempDir;

    #[test]
    fn test_serde_vec_env_config() -> Result<()> {
        let config = VecEnvConfig::default().n_workers(4).seed(42);
        let dir = TempDir::new("vec_env_config")?;
        let path = dir.path().join("vec_env_config.yaml");
        config.save(&path)?;
        let config_ = VecEnvConfig::load(&path)?;
        assert_eq!(config, config_);
        assert!(VecEnvConfig::default().n_workers(0).validate().is_err());
        Ok(())
    }
}
