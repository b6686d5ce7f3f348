//! Environment binning the distortion of a dataset into discrete states.
use super::{Bins, DistortionEnvConfig};
use crate::{
    Action, ActionEnv, ActionSpace, ActionType, ColumnData, Dataset, DistanceType,
    DistortionRewardManager, EnvError, RewardManager, State, TextDistanceCalculator,
};
use anonrl_core::{
    record::{Record, RecordValue},
    Env, Step, StepType,
};
use anyhow::Result;
use log::{debug, trace};
use ndarray::Array2;
use std::collections::BTreeSet;

/// Lifecycle of a [`DistortionEnv`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvStatus {
    /// Text distances or column states are not prepared yet.
    Uninitialized,

    /// Steps can be taken.
    Ready,

    /// The episode has ended; the environment must be reset.
    Terminal,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Environment whose observation is the bin of the total distortion of a
/// dataset.
///
/// The environment owns the original dataset, a working copy of it and the
/// action space. An action index passed to [`Env::step`] is applied to the
/// working copy, then the distortion of every column with respect to the
/// original is recomputed:
///
/// * text columns: mean over rows of the normalized text distance,
/// * numeric columns: mean over rows of `|original - current| / range`,
///   clipped to `1`; with a zero range any change counts as `1`.
///
/// The total distortion is the sum of the column distortions and is binned
/// with [`Bins`]. The episode ends when every action is exhausted or after
/// `max_steps` steps.
///
/// ```mermaid
/// stateDiagram-v2
///     [*] --> Uninitialized
///     Uninitialized --> Ready: initialize_text_distances + prepare_column_states
///     Ready --> Ready: step (MID)
///     Ready --> Terminal: step (LAST)
///     Terminal --> Ready: reset
///     Ready --> Ready: reset
/// ```
///
/// Calling [`Env::step`], [`Env::reset`] or [`ActionEnv::apply_action`]
/// in the `Uninitialized` state fails with [`EnvError::NotPrepared`].
pub struct DistortionEnv {
    start_ds: Dataset,
    data_set: Dataset,
    action_space: ActionSpace,
    gamma: f32,
    start_column: Option<String>,
    config: DistortionEnvConfig,
    calculator: Option<TextDistanceCalculator>,
    bins: Option<Bins>,
    visited: BTreeSet<String>,
    reward_manager: Box<dyn RewardManager>,
    state: State,
    n_steps: usize,
    status: EnvStatus,
}

impl DistortionEnv {
    /// Constructs the environment.
    ///
    /// The actions are added to an action space seeded with `seed`. If the
    /// configuration gives a distance type, the environment is prepared.
    pub fn new(config: &DistortionEnvConfig, seed: u64) -> Result<Self, EnvError> {
        let ds = config.dataset.clone();
        if let Some(column) = &config.start_column {
            if !ds.has_column(column) {
                return Err(EnvError::NotFound(format!("Start column {}", column)));
            }
        }
        let n = config.n_actions.unwrap_or(config.actions.len());
        let mut action_space = ActionSpace::with_seed(n, seed);
        action_space.add_many(config.actions.iter().cloned())?;
        if config.shuffle_actions {
            action_space.shuffle();
        }

        let state = State {
            column_names: ds.columns(),
            column_distortions: vec![0.0; ds.n_columns()],
            ..State::default()
        };
        let mut env = Self {
            start_ds: ds.clone(),
            data_set: ds,
            action_space,
            gamma: config.gamma,
            start_column: config.start_column.clone(),
            config: config.clone(),
            calculator: None,
            bins: None,
            visited: BTreeSet::new(),
            reward_manager: Box::new(DistortionRewardManager::new(config.reward.clone())),
            state,
            n_steps: 0,
            status: EnvStatus::Uninitialized,
        };

        if let Some(distance_type) = config.distance_type {
            env.initialize_text_distances(distance_type);
            env.prepare_column_states()?;
        }
        debug!(
            "Built DistortionEnv with {} columns and {} actions",
            env.start_ds.n_columns(),
            env.action_space.len()
        );
        Ok(env)
    }

    /// Replaces the reward manager.
    pub fn with_reward_manager(mut self, reward_manager: Box<dyn RewardManager>) -> Self {
        self.reward_manager = reward_manager;
        self
    }

    /// Lifecycle status.
    pub fn status(&self) -> EnvStatus {
        self.status
    }

    /// Discount factor.
    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Column the agent starts from.
    pub fn start_column(&self) -> Option<&str> {
        self.start_column.as_deref()
    }

    /// Mutable action space.
    pub fn action_space_mut(&mut self) -> &mut ActionSpace {
        &mut self.action_space
    }

    /// The original dataset.
    pub fn start_dataset(&self) -> &Dataset {
        &self.start_ds
    }

    /// The dataset with the actions of the episode applied.
    pub fn current_dataset(&self) -> &Dataset {
        &self.data_set
    }

    /// State after the last transition.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Number of steps since the last reset.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Selects the distance of text columns.
    pub fn initialize_text_distances(&mut self, distance_type: DistanceType) {
        self.calculator = Some(TextDistanceCalculator::new(distance_type));
        self.initialize_distances();
    }

    /// Sets every column distortion to zero, assuming no distortion initially.
    pub fn initialize_distances(&mut self) {
        self.state.column_distortions = vec![0.0; self.start_ds.n_columns()];
        self.state.total_distortion = 0.0;
    }

    /// Computes the column distortions and creates the bins.
    ///
    /// Fails with [`EnvError::NotPrepared`] if text distances were not
    /// initialized.
    pub fn prepare_column_states(&mut self) -> Result<(), EnvError> {
        if self.calculator.is_none() {
            return Err(EnvError::NotPrepared(
                "text distances must be initialized before column states".to_string(),
            ));
        }
        self.create_bins()?;
        self.state = self.compute_state()?;
        if self.status == EnvStatus::Uninitialized {
            self.status = EnvStatus::Ready;
        }
        Ok(())
    }

    /// Creates the bins from the binning configuration.
    pub fn create_bins(&mut self) -> Result<(), EnvError> {
        let bins = Bins::new(&self.config.binning, self.start_ds.n_columns() as f64)?;
        self.bins = Some(bins);
        Ok(())
    }

    /// Bin the given distortion value falls into.
    pub fn get_aggregated_state(&self, value: f64) -> Result<usize, EnvError> {
        self.bins
            .as_ref()
            .map(|b| b.index(value))
            .ok_or_else(|| EnvError::NotPrepared("bins are not created".to_string()))
    }

    /// Forgets the visited columns.
    pub fn initialize_column_counts(&mut self) {
        self.visited.clear();
    }

    /// Returns `true` if every column targeted by an action was visited.
    pub fn all_columns_visited(&self) -> bool {
        self.action_space
            .iter()
            .all(|a| self.visited.contains(a.column_name()))
    }

    /// Distortion of the named column with respect to the original dataset.
    pub fn column_distortion(&self, name: &str) -> Result<f64, EnvError> {
        let (orig, cur) = match (self.start_ds.column(name), self.data_set.column(name)) {
            (Some(orig), Some(cur)) => (orig, cur),
            _ => return Err(EnvError::NotFound(format!("Column {}", name))),
        };
        let n = orig.len();
        if n == 0 {
            return Ok(0.0);
        }

        let total: f64 = match (orig, cur) {
            (ColumnData::Text(orig), ColumnData::Text(cur)) => {
                let calc = self.text_calculator()?;
                orig.iter()
                    .zip(cur.iter())
                    .map(|(o, c)| calc.normalized(o, c).min(1.0))
                    .sum()
            }
            (orig, cur) => match (orig.as_f64(), cur.as_f64()) {
                (Some(o), Some(c)) => numeric_distances(&o, &c).iter().sum(),
                _ => {
                    return Err(EnvError::ColumnType {
                        column: name.to_string(),
                        expected: format!("{:?}", orig.column_type()),
                        found: cur.column_type(),
                    })
                }
            },
        };
        Ok((total / n as f64).min(1.0))
    }

    /// Exports the current dataset as an array of shape `(n_rows, n_columns)`.
    ///
    /// Numeric values are copied; a text value is replaced with its
    /// normalized distance to the original value.
    pub fn get_ds_as_tensor(&self) -> Result<Array2<f64>, EnvError> {
        let calc = self.text_calculator()?;
        let mut arr = Array2::<f64>::zeros((self.start_ds.n_rows(), self.start_ds.n_columns()));
        for (j, column) in self.start_ds.iter().enumerate() {
            let cur = self
                .data_set
                .column(column.name())
                .ok_or_else(|| EnvError::NotFound(format!("Column {}", column.name())))?;
            match (column.data(), cur) {
                (ColumnData::Text(orig), ColumnData::Text(cur)) => {
                    for (i, (o, c)) in orig.iter().zip(cur.iter()).enumerate() {
                        arr[[i, j]] = calc.normalized(o, c);
                    }
                }
                (_, cur) => {
                    for (i, v) in cur.as_f64().unwrap_or_default().into_iter().enumerate() {
                        arr[[i, j]] = v;
                    }
                }
            }
        }
        Ok(arr)
    }

    fn text_calculator(&self) -> Result<&TextDistanceCalculator, EnvError> {
        self.calculator
            .as_ref()
            .ok_or_else(|| EnvError::NotPrepared("text distances are not initialized".to_string()))
    }

    fn ensure_prepared(&self) -> Result<(), EnvError> {
        match self.status {
            EnvStatus::Uninitialized => Err(EnvError::NotPrepared(
                "call initialize_text_distances and prepare_column_states first".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn compute_state(&self) -> Result<State, EnvError> {
        let column_names = self.start_ds.columns();
        let column_distortions = column_names
            .iter()
            .map(|c| self.column_distortion(c))
            .collect::<Result<Vec<_>, _>>()?;
        let total_distortion = column_distortions.iter().sum();
        Ok(State {
            bin_idx: self.get_aggregated_state(total_distortion)?,
            total_distortion,
            column_names,
            column_distortions,
            visited_columns: self.visited.clone(),
        })
    }
}

fn numeric_distances(orig: &[f64], cur: &[f64]) -> Vec<f64> {
    let min = orig.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = orig.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    orig.iter()
        .zip(cur.iter())
        .map(|(o, c)| {
            let d = (o - c).abs();
            if range > 0.0 {
                (d / range).min(1.0)
            } else if d > 0.0 {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}

impl Env for DistortionEnv {
    type Config = DistortionEnvConfig;
    type Obs = usize;
    type Act = usize;
    type Info = State;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        Ok(Self::new(config, seed as u64)?)
    }

    fn step(&mut self, act: &usize) -> Result<(Step<Self>, Record)> {
        trace!("DistortionEnv::step()");
        self.ensure_prepared()?;
        if self.status == EnvStatus::Terminal {
            return Err(EnvError::EpisodeFinished.into());
        }

        let old = self.state.clone();
        self.apply_action(*act)?;
        self.n_steps += 1;
        let new = self.compute_state()?;
        let action = self.get_action(*act)?;
        let reward = self.reward_manager.compute(&old, &new, action);
        let column = action.column_name().to_string();

        let (step_type, discount) = if self.action_space.is_exhausted() {
            (StepType::Last, 0.0)
        } else if self.config.max_steps.map_or(false, |m| self.n_steps >= m) {
            (StepType::Last, self.gamma)
        } else {
            (StepType::Mid, self.gamma)
        };
        if step_type == StepType::Last {
            self.status = EnvStatus::Terminal;
            debug!(
                "Episode ended after {} steps, total distortion {:.4}",
                self.n_steps, new.total_distortion
            );
        }

        let record = Record::from_slice(&[
            ("reward", RecordValue::Scalar(reward)),
            (
                "total_distortion",
                RecordValue::Scalar(new.total_distortion as f32),
            ),
            ("bin_idx", RecordValue::Scalar(new.bin_idx as f32)),
            ("column", RecordValue::String(column)),
        ]);
        self.state = new.clone();
        let step = Step::new(new.bin_idx, reward, discount, step_type, new);
        Ok((step, record))
    }

    fn reset(&mut self) -> Result<Step<Self>> {
        trace!("DistortionEnv::reset()");
        self.ensure_prepared()?;
        self.data_set = self.start_ds.clone();
        self.action_space.reset();
        self.initialize_column_counts();
        self.initialize_distances();
        self.n_steps = 0;
        self.state = self.compute_state()?;
        self.status = EnvStatus::Ready;
        Ok(Step::first(self.state.bin_idx, self.state.clone()))
    }
}

impl ActionEnv for DistortionEnv {
    fn apply_action(&mut self, act: usize) -> Result<(), EnvError> {
        self.ensure_prepared()?;
        let action = self.action_space.get_mut(act).ok_or_else(|| {
            EnvError::InvalidAction(format!("action {} is not in the action space", act))
        })?;
        action.apply(&mut self.data_set)?;
        if action.action_type() != ActionType::Identity {
            self.visited.insert(action.column_name().to_string());
        }
        Ok(())
    }

    fn get_action(&self, idx: usize) -> Result<&Action, EnvError> {
        self.action_space.get(idx).ok_or_else(|| {
            EnvError::InvalidAction(format!("action {} is not in the action space", idx))
        })
    }

    fn action_space(&self) -> &ActionSpace {
        &self.action_space
    }

    fn column_names(&self) -> Vec<String> {
        self.start_ds.columns()
    }

    fn n_states(&self) -> usize {
        self.bins
            .as_ref()
            .map_or_else(|| self.config.binning.n_bins(), |b| b.n_bins())
    }

    fn total_current_distortion(&self) -> Result<f64, EnvError> {
        self.start_ds
            .columns()
            .iter()
            .map(|c| self.column_distortion(c))
            .sum()
    }
}
