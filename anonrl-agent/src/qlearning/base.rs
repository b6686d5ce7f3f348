//! Tabular Q-learning agent.
use super::{QLearningConfig, QTable};
use crate::{
    explorer::{argmax, EpsilonGreedy},
    AgentError,
};
use anonrl_core::{
    record::{Record, RecordValue},
    Agent, Configurable, Policy,
};
use anonrl_env::ActionEnv;
use anyhow::{bail, Result};
use log::{debug, trace};
use std::{
    fs::{self, File},
    io::{BufReader, Write},
    marker::PhantomData,
    path::Path,
};

/// Off-policy TD control on a table indexed by the distortion bin.
///
/// Actions are selected epsilon-greedily in training mode and greedily in
/// evaluation mode. When the selected action is exhausted, a random
/// non-exhausted one is taken instead.
pub struct QLearning<E> {
    table: QTable,
    explorer: EpsilonGreedy,
    alpha: f64,
    gamma: f64,
    n_itrs_per_episode: usize,
    train: bool,
    phantom: PhantomData<E>,
}

impl<E> QLearning<E>
where
    E: ActionEnv<Obs = usize>,
{
    /// The action values.
    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// The explorer.
    pub fn explorer_mut(&mut self) -> &mut EpsilonGreedy {
        &mut self.explorer
    }

    // Selected action, replaced by a non-exhausted one if exhausted.
    // `None` when every action is exhausted.
    fn select(&mut self, env: &E, state: usize) -> Result<Option<usize>> {
        let act = self.sample(&state);
        if !env.get_action(act)?.is_exhausted() {
            return Ok(Some(act));
        }
        let candidates: Vec<usize> = env
            .action_space()
            .get_non_exhausted_actions()
            .iter()
            .map(|a| a.idx())
            .collect();
        trace!("Action {} is exhausted, resampling", act);
        Ok(self.explorer.choose(&candidates))
    }

    fn update(&mut self, state: usize, act: usize, reward: f32, next: usize, discount: f32) -> Result<f64> {
        let q = self.table.get(state, act)?;
        let bootstrap = match discount > 0.0 {
            true => self.gamma * self.table.max(next)?,
            false => 0.0,
        };
        let td_error = reward as f64 + bootstrap - q;
        self.table.set(state, act, q + self.alpha * td_error)?;
        Ok(td_error)
    }
}

impl<E> Policy<E> for QLearning<E>
where
    E: ActionEnv<Obs = usize>,
{
    fn sample(&mut self, obs: &usize) -> usize {
        match self.train {
            true => self.explorer.select(&self.table, obs),
            false => argmax(self.table.row(*obs).unwrap_or(&[])),
        }
    }
}

impl<E> Configurable for QLearning<E>
where
    E: ActionEnv<Obs = usize>,
{
    type Config = QLearningConfig;

    fn build(config: Self::Config) -> Self {
        Self {
            table: QTable::new(config.n_states, config.n_actions),
            explorer: EpsilonGreedy::new(&config.explorer),
            alpha: config.alpha,
            gamma: config.gamma,
            n_itrs_per_episode: config.n_itrs_per_episode,
            train: true,
            phantom: PhantomData,
        }
    }
}

impl<E> Agent<E> for QLearning<E>
where
    E: ActionEnv<Obs = usize>,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn on_episode(&mut self, env: &mut E, episode_idx: usize) -> Result<Record> {
        if env.action_space().len() != self.table.n_actions() {
            bail!(
                "The environment has {} actions, the table {}",
                env.action_space().len(),
                self.table.n_actions()
            );
        }

        let mut state = env.reset()?.obs;
        let mut episode_return = 0f32;
        let mut sum_td_error = 0f64;
        let mut n_steps = 0;

        for _ in 0..self.n_itrs_per_episode {
            let act = match self.select(env, state)? {
                Some(act) => act,
                None => break,
            };
            let (step, _) = env.step(&act)?;
            let td_error = self.update(state, act, step.reward, step.obs, step.discount)?;

            episode_return += step.reward;
            sum_td_error += td_error.abs();
            n_steps += 1;
            state = step.obs;
            if step.is_last() {
                break;
            }
        }
        debug!(
            "Episode {}: {} steps, return {}",
            episode_idx, n_steps, episode_return
        );

        Ok(Record::from_slice(&[
            ("episode_return", RecordValue::Scalar(episode_return)),
            ("episode_length", RecordValue::Scalar(n_steps as f32)),
            (
                "mean_abs_td_error",
                RecordValue::Scalar((sum_td_error / n_steps.max(1) as f64) as f32),
            ),
            ("eps", RecordValue::Scalar(self.explorer.eps() as f32)),
        ]))
    }

    fn actions_after_episode(&mut self, episode_idx: usize) {
        self.explorer.actions_after_episode(episode_idx);
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        let mut file = File::create(path.join("qtable.yaml"))?;
        file.write_all(serde_yaml::to_string(&self.table)?.as_bytes())?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path.join("qtable.yaml"))?;
        let table: QTable = serde_yaml::from_reader(BufReader::new(file))?;
        if (table.n_states(), table.n_actions()) != (self.table.n_states(), self.table.n_actions()) {
            return Err(AgentError::ParamsShape {
                expected: vec![self.table.n_states(), self.table.n_actions()],
                found: vec![table.n_states(), table.n_actions()],
            }
            .into());
        }
        self.table = table;
        Ok(())
    }
}
