//! This module is used for tests.
use crate::{
    record::{Record, RecordValue},
    Agent, Env, Info, Policy, Step, StepType,
};
use anyhow::{bail, Result};
use std::path::Path;

/// Configuration of [`CountdownEnv`].
#[derive(Clone, Debug)]
pub struct CountdownEnvConfig {
    /// Number of steps in an episode.
    pub length: usize,
}

/// Information of [`CountdownEnv`].
#[derive(Clone, Debug, PartialEq)]
pub struct CountdownInfo {
    /// Seed the environment was built with.
    pub seed: i64,
}

impl Info for CountdownInfo {}

/// Environment whose observation counts down to zero, one unit of reward per step.
///
/// Stepping a finished episode fails until the environment is reset.
pub struct CountdownEnv {
    length: usize,
    remaining: usize,
    seed: i64,
}

impl Env for CountdownEnv {
    type Config = CountdownEnvConfig;
    type Obs = usize;
    type Act = usize;
    type Info = CountdownInfo;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        Ok(Self {
            length: config.length,
            remaining: config.length,
            seed,
        })
    }

    fn step(&mut self, _a: &usize) -> Result<(Step<Self>, Record)> {
        if self.remaining == 0 {
            bail!("CountdownEnv: episode already finished");
        }
        self.remaining -= 1;
        let step_type = match self.remaining {
            0 => StepType::Last,
            _ => StepType::Mid,
        };
        let info = CountdownInfo { seed: self.seed };
        let record = Record::from_scalar("remaining", self.remaining as f32);
        Ok((Step::new(self.remaining, 1.0, 1.0, step_type, info), record))
    }

    fn reset(&mut self) -> Result<Step<Self>> {
        self.remaining = self.length;
        Ok(Step::first(self.remaining, CountdownInfo { seed: self.seed }))
    }
}

/// Agent that always takes action `0` and counts its calls.
#[derive(Default)]
pub struct CountdownAgent {
    train: bool,

    /// Number of calls of [`Agent::on_episode`].
    pub n_episodes: usize,

    /// Number of calls of [`Agent::actions_after_episode`].
    pub n_after_episode: usize,
}

impl Policy<CountdownEnv> for CountdownAgent {
    fn sample(&mut self, _obs: &usize) -> usize {
        0
    }
}

impl Agent<CountdownEnv> for CountdownAgent {
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn on_episode(&mut self, env: &mut CountdownEnv, _episode_idx: usize) -> Result<Record> {
        let mut obs = env.reset()?.obs;
        let mut episode_return = 0f32;
        loop {
            let act = self.sample(&obs);
            let (step, _) = env.step(&act)?;
            episode_return += step.reward;
            if step.is_last() {
                break;
            }
            obs = step.obs;
        }
        self.n_episodes += 1;
        Ok(Record::from_slice(&[(
            "episode_return",
            RecordValue::Scalar(episode_return),
        )]))
    }

    fn actions_after_episode(&mut self, _episode_idx: usize) {
        self.n_after_episode += 1;
    }

    fn save_params(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn load_params(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_countdown_episode() -> Result<()> {
        let mut env = CountdownEnv::build(&CountdownEnvConfig { length: 2 }, 7)?;
        let first = env.reset()?;
        assert!(first.is_first());
        assert_eq!(first.reward, 0.0);
        assert_eq!(first.discount, 1.0);

        let (step, _) = env.step(&0)?;
        assert!(step.is_mid());
        let (step, _) = env.step(&0)?;
        assert!(step.is_last());
        assert_eq!(step.info.seed, 7);
        assert!(env.step(&0).is_err());
        Ok(())
    }
}
