//! Default implementation of the [`Evaluator`] trait.
use super::Evaluator;
use crate::{record::Record, Agent, Env};
use anyhow::Result;
use log::warn;

/// Runs a fixed number of episodes and reports the average return.
///
/// A step that fails ends its episode instead of the evaluation: the typical
/// cause is a greedy policy choosing an action whose transformations are
/// exhausted, which ends an anonymization episode in practice.
pub struct DefaultEvaluator<E: Env> {
    n_episodes: usize,
    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    fn evaluate<A: Agent<E>>(&mut self, agent: &mut A) -> Result<Record> {
        let mut r_total = 0f32;

        for ix in 0..self.n_episodes {
            let mut prev_obs = self.env.reset()?.obs;

            loop {
                let act = agent.sample(&prev_obs);
                let step = match self.env.step(&act) {
                    Ok((step, _)) => step,
                    Err(e) => {
                        warn!("Evaluation episode {} ended early: {}", ix, e);
                        break;
                    }
                };
                r_total += step.reward;
                if step.is_last() {
                    break;
                }
                prev_obs = step.obs;
            }
        }

        Ok(Record::from_scalar(
            "episode_return",
            r_total / self.n_episodes as f32,
        ))
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`] running `n_episodes` episodes
    /// on an environment built from `config` with the given `seed`.
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        Ok(Self {
            n_episodes,
            env: E::build(config, seed)?,
        })
    }
}
