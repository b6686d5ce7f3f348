use anonrl_agent::{AgentError, EpsilonGreedyConfig, SarsaConfig, SarsaSemiGradient};
use anonrl_core::{Agent, Configurable, Env, Policy};
use anonrl_env::{
    mock, Action, BinningConfig, DistanceType, DistortionEnv, DistortionEnvConfig, State,
    TiledEnv, TiledEnvConfig, TilingConfig,
};
use anyhow::Result;
use std::fs;
use tempdir::TempDir;
use test_log::test;

type Sarsa = SarsaSemiGradient<DistortionEnv>;

fn tiling() -> TilingConfig {
    TilingConfig::default()
        .num_tilings(4)
        .tiling_dim(4)
        .max_size(512)
        .column_scale("total_distortion", 2.0)
        .column_scale("gender", 4.0)
        .column_scale("ethnicity", 4.0)
}

fn env_config(max_steps: Option<usize>) -> TiledEnvConfig<DistortionEnvConfig> {
    let env_config = DistortionEnvConfig::default()
        .dataset(mock::mock_subjects())
        .actions(vec![
            mock::gender_suppression(),
            mock::ethnicity_generalization(),
            Action::identity("salary"),
        ])
        .start_column("gender")
        .binning(BinningConfig::FixedWidth {
            n_bins: 10,
            upper: Some(2.0),
        })
        .max_steps(max_steps)
        .distance_type(DistanceType::Hamming);
    TiledEnvConfig::new(env_config, tiling())
}

fn agent_config(n: usize) -> SarsaConfig {
    SarsaConfig::default()
        .n(n)
        .n_actions(3)
        .n_itrs_per_episode(6)
        .tiling(tiling())
        .explorer(EpsilonGreedyConfig::default().eps(0.5).seed(3))
}

#[test]
fn test_n_step_episodes() -> Result<()> {
    for n in [1, 2, 8] {
        let mut env = TiledEnv::<DistortionEnv>::build(&env_config(Some(4)), 0)?;
        let mut agent = Sarsa::build(agent_config(n));

        for episode in 0..3 {
            let record = agent.on_episode(&mut env, episode)?;
            let length = record.get_scalar("episode_length")?;
            assert!(length >= 2.0 && length <= 4.0);
            agent.actions_after_episode(episode);
        }
        assert!(agent.weights().iter().any(|w| *w != 0.0));
        assert_eq!(agent.iht().count(), env.iht().count());
    }
    Ok(())
}

#[test]
fn test_episode_is_capped() -> Result<()> {
    let mut env = TiledEnv::<DistortionEnv>::build(&env_config(None), 0)?;
    let mut config = agent_config(2);
    config.explorer = EpsilonGreedyConfig::default().eps(0.0);
    let mut agent = Sarsa::build(config);

    // The identity action is never exhausted, so only the step cap ends it.
    let record = agent.on_episode(&mut env, 0)?;
    assert!(record.get_scalar("episode_length")? <= 6.0);
    Ok(())
}

#[test]
fn test_tiling_must_match_env() -> Result<()> {
    let mut env = TiledEnv::<DistortionEnv>::build(&env_config(Some(4)), 0)?;
    let mut config = agent_config(1);
    config.tiling = tiling().max_size(1024);
    let mut agent = Sarsa::build(config);
    assert!(agent.on_episode(&mut env, 0).is_err());

    let mut agent = Sarsa::build(agent_config(0));
    assert!(agent.on_episode(&mut env, 0).is_err());
    Ok(())
}

#[test]
fn test_save_and_load_params() -> Result<()> {
    let mut env = TiledEnv::<DistortionEnv>::build(&env_config(Some(4)), 0)?;
    let mut agent = Sarsa::build(agent_config(2));
    agent.on_episode(&mut env, 0)?;

    let dir = TempDir::new("sarsa")?;
    agent.save_params(dir.path())?;
    let mut loaded = Sarsa::build(agent_config(2));
    loaded.load_params(dir.path())?;
    assert_eq!(loaded.weights(), agent.weights());
    assert_eq!(loaded.iht().entries(), agent.iht().entries());

    agent.eval();
    loaded.eval();
    let state = env.reset()?.obs;
    let a1 = Policy::<TiledEnv<DistortionEnv>>::sample(&mut agent, &state);
    let a2 = Policy::<TiledEnv<DistortionEnv>>::sample(&mut loaded, &state);
    assert_eq!(a1, a2);
    assert!(a1 < 3);

    // A state missing the scaled components falls back to a random action.
    let a3 = Policy::<TiledEnv<DistortionEnv>>::sample(&mut agent, &State::default());
    assert!(a3 < 3);
    Ok(())
}

#[test]
fn test_load_params_checks_tile_indices() -> Result<()> {
    let dir = TempDir::new("sarsa")?;
    let weights = format!("{:?}", vec![0.0f64; 512]);
    let mut agent = Sarsa::build(agent_config(1));

    fs::write(
        dir.path().join("sarsa.yaml"),
        format!("weights: {}\niht_size: 1024\niht: []\n", weights),
    )?;
    let err = agent.load_params(dir.path()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<AgentError>(),
        Some(&AgentError::ParamsShape {
            expected: vec![512],
            found: vec![1024],
        })
    );

    fs::write(
        dir.path().join("sarsa.yaml"),
        format!("weights: {}\niht_size: 512\niht:\n  - - [0, 1]\n    - 700\n", weights),
    )?;
    let err = agent.load_params(dir.path()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<AgentError>(),
        Some(&AgentError::ParamsShape {
            expected: vec![512],
            found: vec![701],
        })
    );
    assert!(agent.weights().iter().all(|w| *w == 0.0));
    Ok(())
}
