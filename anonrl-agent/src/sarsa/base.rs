//! Semi-gradient SARSA agent.
use super::SarsaConfig;
use crate::{
    explorer::{argmax, EpsilonGreedy},
    AgentError,
};
use anonrl_core::{
    record::{Record, RecordValue},
    Agent, Configurable, Env, Policy,
};
use anonrl_env::{tiles, ActionEnv, Iht, State, TiledEnv, TilingConfig};
use anyhow::{bail, Result};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufReader, Write},
    marker::PhantomData,
    path::Path,
};

#[derive(Serialize, Deserialize)]
struct SarsaParams {
    weights: Vec<f64>,
    iht_size: usize,
    iht: Vec<(Vec<i64>, usize)>,
}

/// Episodic n-step semi-gradient SARSA with a linear action-value function.
///
/// The value of a (state, action) pair is the sum of the weights of the
/// tiles activated by the pair. During training the tiles come from the
/// index hash table of the [`TiledEnv`]; a copy of that table is taken after
/// every episode so that [`Policy::sample`] can featurize states without the
/// environment, e.g., in evaluation.
pub struct SarsaSemiGradient<E> {
    weights: Vec<f64>,
    iht: Iht,
    tiling: TilingConfig,
    n: usize,
    alpha: f64,
    gamma: f64,
    n_itrs_per_episode: usize,
    n_actions: usize,
    explorer: EpsilonGreedy,
    train: bool,
    phantom: PhantomData<E>,
}

impl<E> SarsaSemiGradient<E>
where
    E: ActionEnv<Obs = usize, Info = State>,
{
    /// Weights of the tiles.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// The copy of the index hash table used by [`Policy::sample`].
    pub fn iht(&self) -> &Iht {
        &self.iht
    }

    /// The explorer.
    pub fn explorer_mut(&mut self) -> &mut EpsilonGreedy {
        &mut self.explorer
    }

    fn q(&self, features: &[usize]) -> f64 {
        features.iter().map(|ix| self.weights[*ix]).sum()
    }

    // Action selected epsilon-greedily and its features, the action being
    // replaced by a non-exhausted one if exhausted.
    fn select(
        &mut self,
        env: &mut TiledEnv<E>,
        state: &State,
    ) -> Result<Option<(usize, Vec<usize>)>> {
        let mut features = (0..self.n_actions)
            .map(|a| env.featurize_state_action(state, a))
            .collect::<Result<Vec<_>, _>>()?;
        let values: Vec<f64> = features.iter().map(|x| self.q(x)).collect();
        let mut act = self.explorer.select_from_values(&values);

        if env.get_action(act)?.is_exhausted() {
            let candidates: Vec<usize> = env
                .action_space()
                .get_non_exhausted_actions()
                .iter()
                .map(|a| a.idx())
                .collect();
            trace!("Action {} is exhausted, resampling", act);
            act = match self.explorer.choose(&candidates) {
                Some(act) => act,
                None => return Ok(None),
            };
        }
        Ok(Some((act, features.swap_remove(act))))
    }

    fn update(&mut self, features: &[usize], target: f64) -> f64 {
        let td_error = target - self.q(features);
        let step_size = self.alpha / self.tiling.num_tilings as f64;
        for ix in features {
            self.weights[*ix] += step_size * td_error;
        }
        td_error
    }

    // Discounted sum of the rewards R_{tau+1}..=R_{upper}.
    fn n_step_return(&self, rewards: &[f32], tau: usize, upper: usize) -> f64 {
        (tau + 1..=upper)
            .map(|i| self.gamma.powi((i - tau - 1) as i32) * rewards[i - 1] as f64)
            .sum()
    }
}

impl<E> Policy<TiledEnv<E>> for SarsaSemiGradient<E>
where
    E: ActionEnv<Obs = usize, Info = State>,
{
    fn sample(&mut self, obs: &State) -> usize {
        let scaled = match self.tiling.scale(obs) {
            Ok(scaled) => scaled,
            Err(e) => {
                warn!("Failed to scale the state, taking a random action: {}", e);
                let all: Vec<usize> = (0..self.n_actions).collect();
                return self.explorer.choose(&all).unwrap_or(0);
            }
        };
        let values: Vec<f64> = (0..self.n_actions)
            .map(|a| {
                let x = tiles(
                    &mut self.iht,
                    self.tiling.num_tilings,
                    &scaled,
                    &[a as i64],
                );
                self.q(&x)
            })
            .collect();
        match self.train {
            true => self.explorer.select_from_values(&values),
            false => argmax(&values),
        }
    }
}

impl<E> Configurable for SarsaSemiGradient<E>
where
    E: ActionEnv<Obs = usize, Info = State>,
{
    type Config = SarsaConfig;

    fn build(config: Self::Config) -> Self {
        Self {
            weights: vec![0.0; config.tiling.max_size],
            iht: Iht::new(config.tiling.max_size),
            tiling: config.tiling,
            n: config.n,
            alpha: config.alpha,
            gamma: config.gamma,
            n_itrs_per_episode: config.n_itrs_per_episode,
            n_actions: config.n_actions,
            explorer: EpsilonGreedy::new(&config.explorer),
            train: true,
            phantom: PhantomData,
        }
    }
}

impl<E> Agent<TiledEnv<E>> for SarsaSemiGradient<E>
where
    E: ActionEnv<Obs = usize, Info = State>,
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

    fn on_episode(&mut self, env: &mut TiledEnv<E>, episode_idx: usize) -> Result<Record> {
        if self.n == 0 {
            bail!("n should be > 0");
        }
        if env.n_actions() != self.n_actions {
            bail!(
                "The environment has {} actions, the agent {}",
                env.n_actions(),
                self.n_actions
            );
        }
        if env.max_size() != self.weights.len() {
            bail!(
                "The environment has {} tiles, the agent {}",
                env.max_size(),
                self.weights.len()
            );
        }

        let state = env.reset()?.obs;
        let mut features = vec![];
        let mut rewards = vec![];
        let mut sum_td_error = 0f64;
        let mut n_updates = 0;

        let mut act = match self.select(env, &state)? {
            Some((act, x)) => {
                features.push(x);
                act
            }
            None => {
                warn!("Every action is exhausted at the start of episode {}", episode_idx);
                return Ok(Record::from_scalar("episode_return", 0.0));
            }
        };

        // Time of the terminal step once it is known.
        let mut t_end = usize::MAX;
        let mut t = 0;
        loop {
            if t < t_end {
                let (step, _) = env.step(&act)?;
                rewards.push(step.reward);
                if step.is_last() || t + 1 >= self.n_itrs_per_episode {
                    t_end = t + 1;
                } else {
                    match self.select(env, &step.obs)? {
                        Some((a, x)) => {
                            act = a;
                            features.push(x);
                        }
                        None => t_end = t + 1,
                    }
                }
            }

            if t + 1 >= self.n {
                let tau = t + 1 - self.n;
                let mut target = self.n_step_return(&rewards, tau, (tau + self.n).min(t_end));
                if tau + self.n < t_end {
                    target += self.gamma.powi(self.n as i32) * self.q(&features[tau + self.n]);
                }
                let td_error = self.update(&features[tau], target);
                sum_td_error += td_error.abs();
                n_updates += 1;
                if tau + 1 == t_end {
                    break;
                }
            }
            t += 1;
        }
        self.iht = env.iht().clone();

        let episode_return: f32 = rewards.iter().sum();
        debug!(
            "Episode {}: {} steps, return {}",
            episode_idx,
            rewards.len(),
            episode_return
        );

        Ok(Record::from_slice(&[
            ("episode_return", RecordValue::Scalar(episode_return)),
            ("episode_length", RecordValue::Scalar(rewards.len() as f32)),
            (
                "mean_abs_td_error",
                RecordValue::Scalar((sum_td_error / n_updates.max(1) as f64) as f32),
            ),
            ("eps", RecordValue::Scalar(self.explorer.eps() as f32)),
            ("n_tiles", RecordValue::Scalar(self.iht.count() as f32)),
        ]))
    }

    fn actions_after_episode(&mut self, episode_idx: usize) {
        self.explorer.actions_after_episode(episode_idx);
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        let params = SarsaParams {
            weights: self.weights.clone(),
            iht_size: self.iht.size(),
            iht: self.iht.entries(),
        };
        let mut file = File::create(path.join("sarsa.yaml"))?;
        file.write_all(serde_yaml::to_string(&params)?.as_bytes())?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path.join("sarsa.yaml"))?;
        let params: SarsaParams = serde_yaml::from_reader(BufReader::new(file))?;
        if params.weights.len() != self.weights.len() {
            return Err(AgentError::ParamsShape {
                expected: vec![self.weights.len()],
                found: vec![params.weights.len()],
            }
            .into());
        }
        let max_index = params.iht.iter().map(|(_, i)| i + 1).max().unwrap_or(0);
        let iht_size = params.iht_size.max(max_index);
        if iht_size != self.weights.len() {
            return Err(AgentError::ParamsShape {
                expected: vec![self.weights.len()],
                found: vec![iht_size],
            }
            .into());
        }
        self.weights = params.weights;
        self.iht = Iht::from_entries(params.iht_size, params.iht);
        Ok(())
    }
}
