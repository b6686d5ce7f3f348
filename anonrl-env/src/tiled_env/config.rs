//! Configuration of [`TiledEnv`](super::TiledEnv).
use crate::{EnvError, State};
use anyhow::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Parameters of the tile coding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilingConfig {
    /// Number of offset grids.
    pub num_tilings: usize,

    /// Size of the index hash table.
    pub max_size: usize,

    /// Number of tiles along each dimension of a grid.
    pub tiling_dim: usize,

    /// Scale of each state component taking part in the tiling.
    ///
    /// A component is `bin_idx`, `total_distortion` or the name of a column.
    pub column_scales: BTreeMap<String, f64>,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            num_tilings: 8,
            max_size: 4096,
            tiling_dim: 8,
            column_scales: BTreeMap::new(),
        }
    }
}

impl TilingConfig {
    /// Sets the number of tilings.
    pub fn num_tilings(mut self, v: usize) -> Self {
        self.num_tilings = v;
        self
    }

    /// Sets the size of the index hash table.
    pub fn max_size(mut self, v: usize) -> Self {
        self.max_size = v;
        self
    }

    /// Sets the number of tiles along each dimension.
    pub fn tiling_dim(mut self, v: usize) -> Self {
        self.tiling_dim = v;
        self
    }

    /// Sets the scale of a state component.
    pub fn column_scale(mut self, name: impl Into<String>, scale: f64) -> Self {
        self.column_scales.insert(name.into(), scale);
        self
    }

    /// Scaled values of the configured state components, ordered by name.
    pub fn scale(&self, state: &State) -> Result<Vec<f64>, EnvError> {
        self.column_scales
            .iter()
            .map(|(name, scale)| {
                state
                    .component(name)
                    .map(|v| v * scale)
                    .ok_or_else(|| EnvError::NotFound(format!("State component {}", name)))
            })
            .collect()
    }

    /// Checks the sizing of the table.
    ///
    /// `max_size` must be positive and hold every tile of every tiling,
    /// and at least one component must be scaled.
    pub fn validate(&self) -> Result<(), EnvError> {
        if self.max_size == 0 {
            return Err(EnvError::invalid_param("max_size", "0 should be > 0"));
        }
        let n_tiles = self.num_tilings * self.tiling_dim * self.tiling_dim;
        if self.max_size < n_tiles {
            return Err(EnvError::invalid_param(
                "max_size",
                format!(
                    "{} should be >= num_tilings * tiling_dim * tiling_dim = {}",
                    self.max_size, n_tiles
                ),
            ));
        }
        if self.column_scales.is_empty() {
            return Err(EnvError::invalid_param(
                "column_scales",
                "0 should not be empty",
            ));
        }
        Ok(())
    }
}

/// Configuration of [`TiledEnv`](super::TiledEnv).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiledEnvConfig<C> {
    /// Configuration of the wrapped environment.
    pub env_config: C,

    /// Parameters of the tile coding.
    pub tiling: TilingConfig,
}

impl<C> TiledEnvConfig<C> {
    /// Constructs a configuration.
    pub fn new(env_config: C, tiling: TilingConfig) -> Self {
        Self { env_config, tiling }
    }
}

impl<C: Serialize + DeserializeOwned> TiledEnvConfig<C> {
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

    #[test]
    fn test_validate() {
        let config = TilingConfig::default().column_scale("total_distortion", 8.0);
        assert!(config.validate().is_ok());

        let err = config.clone().max_size(0).validate().unwrap_err();
        assert!(matches!(err, EnvError::InvalidParamValue { param_name, .. } if param_name == "max_size"));

        // 8 * 8 * 8 = 512 tiles.
        assert!(config.clone().max_size(511).validate().is_err());
        assert!(config.clone().max_size(512).validate().is_ok());

        let err = TilingConfig::default().validate().unwrap_err();
        assert!(matches!(err, EnvError::InvalidParamValue { param_name, .. } if param_name == "column_scales"));
    }
}
