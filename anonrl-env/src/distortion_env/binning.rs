//! Discretization of distortion values.
use crate::EnvError;
use serde::{Deserialize, Serialize};

/// How distortion values are mapped to bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BinningConfig {
    /// `n_bins` bins of equal width spanning `[0, upper]`.
    ///
    /// When `upper` is `None`, it is the number of columns of the dataset,
    /// the largest possible total distortion.
    FixedWidth {
        /// Number of bins.
        n_bins: usize,

        /// Upper end of the last bin.
        upper: Option<f64>,
    },

    /// Pre-computed bin edges, in ascending order.
    Boundaries(Vec<f64>),
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self::FixedWidth {
            n_bins: 10,
            upper: None,
        }
    }
}

impl BinningConfig {
    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        match self {
            Self::FixedWidth { n_bins, .. } => *n_bins,
            Self::Boundaries(edges) => edges.len().saturating_sub(1),
        }
    }
}

/// Bin edges.
///
/// Values below the first edge fall in the first bin and values above the
/// last edge in the last one, so every value has a bin in `[0, n_bins)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bins {
    edges: Vec<f64>,
}

impl Bins {
    /// Creates the edges described by `config`.
    pub fn new(config: &BinningConfig, default_upper: f64) -> Result<Self, EnvError> {
        let edges = match config {
            BinningConfig::FixedWidth { n_bins, upper } => {
                let upper = upper.unwrap_or(default_upper);
                if *n_bins == 0 {
                    return Err(EnvError::invalid_param("n_bins", "0 should be > 0"));
                }
                if !(upper > 0.0) {
                    return Err(EnvError::invalid_param(
                        "upper",
                        format!("{} should be > 0", upper),
                    ));
                }
                let width = upper / *n_bins as f64;
                (0..=*n_bins).map(|i| i as f64 * width).collect()
            }
            BinningConfig::Boundaries(edges) => {
                if edges.len() < 2 {
                    return Err(EnvError::invalid_param(
                        "boundaries",
                        format!("{} edges, should be >= 2", edges.len()),
                    ));
                }
                if edges.windows(2).any(|w| !(w[0] < w[1])) {
                    return Err(EnvError::invalid_param(
                        "boundaries",
                        format!("{:?} should be strictly ascending", edges),
                    ));
                }
                edges.clone()
            }
        };
        Ok(Self { edges })
    }

    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Bin edges.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Index of the bin `value` falls into.
    ///
    /// Monotonic non-decreasing in `value`.
    pub fn index(&self, value: f64) -> usize {
        let interior = &self.edges[1..self.edges.len() - 1];
        interior.partition_point(|e| *e <= value)
    }
}
