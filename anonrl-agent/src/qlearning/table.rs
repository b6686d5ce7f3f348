//! Table of action values.
use crate::{explorer::QValues, AgentError};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Action values of `n_states` discrete states, row-major by state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QTableRepr")]
pub struct QTable {
    n_states: usize,
    n_actions: usize,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct QTableRepr {
    n_states: usize,
    n_actions: usize,
    values: Vec<f64>,
}

impl TryFrom<QTableRepr> for QTable {
    type Error = AgentError;

    fn try_from(repr: QTableRepr) -> Result<Self, Self::Error> {
        if repr.values.len() != repr.n_states * repr.n_actions {
            return Err(AgentError::ParamsShape {
                expected: vec![repr.n_states * repr.n_actions],
                found: vec![repr.values.len()],
            });
        }
        Ok(Self {
            n_states: repr.n_states,
            n_actions: repr.n_actions,
            values: repr.values,
        })
    }
}

impl QTable {
    /// Constructs a table of zeros.
    pub fn new(n_states: usize, n_actions: usize) -> Self {
        Self {
            n_states,
            n_actions,
            values: vec![0.0; n_states * n_actions],
        }
    }

    /// Number of states.
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Number of actions.
    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    fn check(&self, state: usize) -> Result<(), AgentError> {
        match state < self.n_states {
            true => Ok(()),
            false => Err(AgentError::StateOutOfRange {
                state,
                n_states: self.n_states,
            }),
        }
    }

    /// Value of the pair.
    pub fn get(&self, state: usize, action: usize) -> Result<f64, AgentError> {
        self.check(state)?;
        Ok(self.values[state * self.n_actions + action])
    }

    /// Sets the value of the pair.
    pub fn set(&mut self, state: usize, action: usize, v: f64) -> Result<(), AgentError> {
        self.check(state)?;
        self.values[state * self.n_actions + action] = v;
        Ok(())
    }

    /// Values of the actions in `state`.
    pub fn row(&self, state: usize) -> Result<&[f64], AgentError> {
        self.check(state)?;
        let start = state * self.n_actions;
        Ok(&self.values[start..start + self.n_actions])
    }

    /// Largest action value in `state`.
    pub fn max(&self, state: usize) -> Result<f64, AgentError> {
        Ok(self
            .row(state)?
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max))
    }
}

impl QValues<usize> for QTable {
    fn q_values(&self, state: &usize) -> Vec<f64> {
        self.row(*state).map(|r| r.to_vec()).unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_table() {
        let mut table = QTable::new(2, 3);
        table.set(1, 2, 0.5).unwrap();
        assert_eq!(table.row(1).unwrap(), &[0.0, 0.0, 0.5]);
        assert_eq!(table.max(1).unwrap(), 0.5);
        assert_eq!(table.q_values(&0), vec![0.0; 3]);
        assert_eq!(
            table.get(2, 0),
            Err(AgentError::StateOutOfRange {
                state: 2,
                n_states: 2
            })
        );
        assert!(table.q_values(&5).is_empty());
    }

    #[test]
    fn test_deserialize_checks_values() {
        let table: QTable = serde_yaml::from_str("n_states: 2\nn_actions: 1\nvalues: [0.5, 1.0]\n").unwrap();
        assert_eq!(table.max(1).unwrap(), 1.0);
        assert!(serde_yaml::from_str::<QTable>("n_states: 2\nn_actions: 3\nvalues: [0.0]\n").is_err());
    }
}
