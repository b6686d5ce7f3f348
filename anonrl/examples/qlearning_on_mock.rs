use anonrl::util::{mock_env_config, N_BINS};
use anonrl_agent::{EpsilonDecay, EpsilonGreedyConfig, QLearning, QLearningConfig};
use anonrl_core::{
    record::BufferedRecorder, Agent, Configurable, DefaultEvaluator, Env as _, Evaluator as _,
    Trainer, TrainerConfig,
};
use anonrl_env::{ActionEnv, DistanceType, DistortionEnv};
use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::Path;

type Env = DistortionEnv;
type Agent_ = QLearning<Env>;

const MODEL_DIR: &str = "./model/qlearning_on_mock";
const MAX_STEPS: usize = 12;
const N_EPISODES_PER_EVAL: usize = 5;

/// Train/eval a Q-learning agent anonymizing the mock-subjects dataset
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Train the agent, not evaluate
    #[arg(short, long, default_value_t = false)]
    train: bool,

    /// Evaluate the agent, not train
    #[arg(short, long, default_value_t = false)]
    eval: bool,

    /// Number of training episodes
    #[arg(short, long, default_value_t = 500)]
    n_episodes: usize,

    /// Distance between text values, "cosine" or "hamming"
    #[arg(short, long, default_value = "cosine")]
    distance: String,
}

fn agent_config(n_actions: usize) -> QLearningConfig {
    QLearningConfig::default()
        .table_shape(N_BINS, n_actions)
        .n_itrs_per_episode(MAX_STEPS)
        .alpha(0.1)
        .gamma(0.99)
        .explorer(
            EpsilonGreedyConfig::default()
                .decay(EpsilonDecay::Exponential)
                .bounds(0.05, 1.0)
                .decay_factor(0.01),
        )
}

fn train(distance_type: DistanceType, n_episodes: usize, model_dir: &str) -> Result<()> {
    let env_config = mock_env_config(distance_type, MAX_STEPS);
    let mut env = Env::build(&env_config, 0)?;
    let mut agent = Agent_::build(agent_config(env.action_space().len()));
    let mut evaluator = DefaultEvaluator::<Env>::new(&env_config, 1, N_EPISODES_PER_EVAL)?;
    let mut recorder = BufferedRecorder::new();
    let mut trainer = Trainer::build(
        TrainerConfig::default()
            .n_episodes(n_episodes)
            .eval_interval((n_episodes / 10).max(1))
            .flush_record_interval((n_episodes / 10).max(1))
            .output_msg_frequency((n_episodes / 10).max(1))
            .model_dir(model_dir),
    )?;

    trainer.train(&mut env, &mut agent, &mut recorder, &mut evaluator)?;

    if let Some(record) = recorder.iter().last() {
        info!(
            "Mean return of the last episodes: {:?}",
            record.get_scalar("episode_return_mean").ok()
        );
    }
    Ok(())
}

fn eval(distance_type: DistanceType, model_dir: &str) -> Result<()> {
    let env_config = mock_env_config(distance_type, MAX_STEPS);
    let n_actions = Env::build(&env_config, 0)?.action_space().len();
    let mut agent = {
        let mut agent = Agent_::build(agent_config(n_actions));
        agent.load_params(Path::new(model_dir))?;
        agent.eval();
        agent
    };

    let record = DefaultEvaluator::<Env>::new(&env_config, 0, N_EPISODES_PER_EVAL)?
        .evaluate(&mut agent)?;
    info!("Evaluation: {:?}", record.get_scalar("episode_return")?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let distance_type: DistanceType = args.distance.parse()?;

    if args.train {
        train(distance_type, args.n_episodes, MODEL_DIR)?;
    } else if args.eval {
        eval(distance_type, &(MODEL_DIR.to_owned() + "/best"))?;
    } else {
        train(distance_type, args.n_episodes, MODEL_DIR)?;
        eval(distance_type, &(MODEL_DIR.to_owned() + "/best"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{eval, train};
    use anonrl_env::DistanceType;
    use anyhow::Result;
    use tempdir::TempDir;

    #[test]
    fn test_qlearning_on_mock() -> Result<()> {
        let tmp_dir = TempDir::new("qlearning_on_mock")?;
        let model_dir = match tmp_dir.as_ref().to_str() {
            Some(s) => s,
            None => panic!("Failed to get string of temporary directory"),
        };
        train(DistanceType::Hamming, 20, model_dir)?;
        eval(DistanceType::Hamming, &(model_dir.to_owned() + "/final"))?;
        Ok(())
    }
}
