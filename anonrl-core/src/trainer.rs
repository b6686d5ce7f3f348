//! Train [`Agent`].
mod config;
use crate::{
    record::{AggregateRecorder, RecordValue},
    Agent, Env, Evaluator,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::info;
use std::path::Path;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the episodic training loop.
///
/// # Training loop
///
/// 0. Given an agent implementing [`Agent`], an environment implementing
///    [`Env`], a recorder implementing [`AggregateRecorder`] and an
///    evaluator implementing [`Evaluator`].
/// 1. For `episode` in `0..n_episodes`:
///     1. Run the episode with [`Agent::on_episode`]. The agent resets the
///        environment, interacts with it until a [`StepType::Last`] step and
///        updates itself on-line.
///     2. Call [`Agent::actions_after_episode`], e.g. to decay epsilon.
///     3. Store the episode record, tagged with `"episode"`.
///     4. If `(episode + 1) % eval_interval == 0`, evaluate the agent in
///        evaluation mode. If the evaluation result is the best so far and
///        `model_dir` is given, the agent is saved in `(model_dir)/best`.
///     5. If `(episode + 1) % flush_record_interval == 0`, flush the recorder.
/// 2. Flush the recorder and, if `model_dir` is given, save the agent in
///    `(model_dir)/final`.
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Env::Act|B[Env]
///     B -->|"Step&lt;E: Env&gt;"|A
///     A -->|Record|C[AggregateRecorder]
/// ```
///
/// [`StepType::Last`]: crate::StepType::Last
pub struct Trainer {
    n_episodes: usize,
    eval_interval: usize,
    flush_record_interval: usize,
    output_msg_frequency: usize,
    model_dir: Option<String>,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            n_episodes: config.n_episodes,
            eval_interval: config.eval_interval,
            flush_record_interval: config.flush_record_interval,
            output_msg_frequency: config.output_msg_frequency,
            model_dir: config.model_dir,
        })
    }

    fn save_agent<E: Env, A: Agent<E>>(agent: &A, model_dir: &str, name: &str) {
        let path = Path::new(model_dir).join(name);
        match agent.save_params(&path) {
            Ok(()) => info!("Saved the agent in {:?}.", &path),
            Err(e) => info!("Failed to save the agent in {:?}: {}", &path, e),
        }
    }

    /// Train the agent.
    pub fn train<E, A, D>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        recorder: &mut dyn AggregateRecorder,
        evaluator: &mut D,
    ) -> Result<()>
    where
        E: Env,
        A: Agent<E>,
        D: Evaluator<E>,
    {
        let mut max_eval_reward = f32::MIN;
        agent.train();

        for episode in 0..self.n_episodes {
            let mut record = agent.on_episode(env, episode)?;
            agent.actions_after_episode(episode);
            record.insert("episode", RecordValue::Scalar(episode as f32));

            if (episode + 1) % self.output_msg_frequency == 0 {
                match record.get_scalar("episode_return") {
                    Ok(r) => info!("Episode {}: return = {:.4}", episode, r),
                    Err(_) => info!("Episode {} finished", episode),
                }
            }
            recorder.store(record);

            if (episode + 1) % self.eval_interval == 0 {
                agent.eval();
                let eval_record = evaluator.evaluate(agent)?;
                agent.train();

                let eval_reward = eval_record.get_scalar("episode_return")?;
                info!("Evaluation after episode {}: {:.4}", episode, eval_reward);
                if eval_reward > max_eval_reward {
                    max_eval_reward = eval_reward;
                    if let Some(model_dir) = &self.model_dir {
                        Self::save_agent::<E, A>(agent, model_dir, "best");
                    }
                }
                recorder.store(eval_record);
            }

            if (episode + 1) % self.flush_record_interval == 0 {
                recorder.flush(episode as i64);
            }
        }

        recorder.flush(self.n_episodes as i64);
        if let Some(model_dir) = &self.model_dir {
            Self::save_agent::<E, A>(agent, model_dir, "final");
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        dummy::{CountdownAgent, CountdownEnv, CountdownEnvConfig},
        record::BufferedRecorder,
        DefaultEvaluator,
    };

    #[test]
    fn test_train_runs_every_episode() -> Result<()> {
        let env_config = CountdownEnvConfig { length: 3 };
        let mut env = CountdownEnv::build(&env_config, 0)?;
        let mut agent = CountdownAgent::default();
        let mut evaluator = DefaultEvaluator::<CountdownEnv>::new(&env_config, 1, 2)?;
        let mut recorder = BufferedRecorder::new();

        let config = TrainerConfig::default()
            .n_episodes(4)
            .eval_interval(2)
            .flush_record_interval(2);
        let mut trainer = Trainer::build(config)?;
        trainer.train(&mut env, &mut agent, &mut recorder, &mut evaluator)?;

        assert_eq!(agent.n_episodes, 4);
        assert_eq!(agent.n_after_episode, 4);
        assert!(agent.is_train());

        // Two periodic flushes plus the final one, which has nothing left to aggregate
        assert_eq!(recorder.len(), 2);
        let first = recorder.iter().next().unwrap();
        assert_eq!(first.get_scalar("episode_return_mean").unwrap(), 3.0);
        Ok(())
    }
}
