//! State observed by agents.
use anonrl_core::{Info, Obs};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Snapshot of the distortion of a dataset.
///
/// A state is recomputed from the dataset on every transition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Bin of the total distortion, in `[0, n_states)`.
    pub bin_idx: usize,

    /// Sum of the column distortions.
    pub total_distortion: f64,

    /// Names of the dataset columns.
    pub column_names: Vec<String>,

    /// Distortion of each column, in the order of `column_names`.
    pub column_distortions: Vec<f64>,

    /// Columns on which a non-identity action was applied during the episode.
    pub visited_columns: BTreeSet<String>,
}

impl Info for State {}

impl Obs for State {}

impl State {
    /// Value of a named component.
    ///
    /// The components are `bin_idx`, `total_distortion` and the distortion
    /// of every column under the name of the column.
    pub fn component(&self, name: &str) -> Option<f64> {
        match name {
            "bin_idx" => Some(self.bin_idx as f64),
            "total_distortion" => Some(self.total_distortion),
            _ => self
                .column_names
                .iter()
                .position(|c| c == name)
                .and_then(|i| self.column_distortions.get(i).copied()),
        }
    }

    /// Iterator over the column names and their distortions.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.column_names
            .iter()
            .map(|s| s.as_str())
            .zip(self.column_distortions.iter().copied())
    }

    /// Mean of the column distortions, `0` without columns.
    pub fn mean_column_distortion(&self) -> f64 {
        match self.column_distortions.len() {
            0 => 0.0,
            n => self.column_distortions.iter().sum::<f64>() / n as f64,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_components() {
        let state = State {
            bin_idx: 2,
            total_distortion: 0.75,
            column_names: vec!["gender".into(), "salary".into()],
            column_distortions: vec![0.5, 0.25],
            visited_columns: BTreeSet::new(),
        };
        assert_eq!(state.component("bin_idx"), Some(2.0));
        assert_eq!(state.component("salary"), Some(0.25));
        assert_eq!(state.component("dob"), None);
        assert_eq!(state.mean_column_distortion(), 0.375);
        assert_eq!(state.iter().count(), 2);
    }
}
