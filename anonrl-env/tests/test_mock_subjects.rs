use anonrl_core::Env;
use anonrl_env::{
    mock, Action, ActionEnv, ActionSpace, BinningConfig, DistanceType, DistortionEnv,
    DistortionEnvConfig, EnvError, TiledEnv, TiledEnvConfig, TilingConfig,
};
use anyhow::Result;

fn env_config() -> DistortionEnvConfig {
    DistortionEnvConfig::default()
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
}

#[test]
fn test_suppress_collapses_gender() -> Result<()> {
    let mut env = DistortionEnv::new(&env_config().distance_type(DistanceType::Cosine), 0)?;
    env.apply_action(0)?;
    let values = env.current_dataset().get_column_unique_values("gender")?;
    assert_eq!(values, vec!["*"]);
    assert!(env.get_action(0)?.is_exhausted());
    Ok(())
}

#[test]
fn test_generalize_ethnicity_into_five_buckets() -> Result<()> {
    let mut env = DistortionEnv::new(&env_config().distance_type(DistanceType::Cosine), 0)?;
    let idx = env.action_space().get_action_by_column_name("ethnicity")?.idx();
    env.apply_action(idx)?;
    let mut values = env.current_dataset().get_column_unique_values("ethnicity")?;
    values.sort();
    assert_eq!(values, vec!["Asian", "Black", "Mixed", "Not stated", "White"]);
    Ok(())
}

#[test]
fn test_prepare_column_states() -> Result<()> {
    let mut env = DistortionEnv::new(&env_config(), 0)?;
    assert!(matches!(
        env.prepare_column_states(),
        Err(EnvError::NotPrepared(_))
    ));
    assert!(env.step(&0).is_err());

    env.initialize_text_distances(DistanceType::Cosine);
    env.prepare_column_states()?;
    let tensor = env.get_ds_as_tensor()?;
    assert_eq!(tensor.nrows(), env.start_dataset().n_rows());
    assert_eq!(tensor.ncols(), env.start_dataset().n_columns());
    Ok(())
}

#[test]
fn test_reset_is_idempotent() -> Result<()> {
    let mut env = DistortionEnv::new(&env_config().distance_type(DistanceType::Hamming), 0)?;
    env.reset()?;
    env.step(&0)?;
    env.step(&1)?;
    assert!(env.total_current_distortion()? > 0.0);

    let s1 = env.reset()?;
    let s2 = env.reset()?;
    assert_eq!(s1.obs, s2.obs);
    assert_eq!(s1.info, s2.info);
    assert_eq!(s2.info.total_distortion, 0.0);
    assert!(env.action_space().iter().all(|a| !a.is_exhausted()));
    assert_eq!(env.current_dataset(), env.start_dataset());
    Ok(())
}

#[test]
fn test_action_space_capacity() {
    let mut space = ActionSpace::new(2);
    space.add(mock::gender_suppression()).unwrap();
    space.add(mock::ethnicity_generalization()).unwrap();
    assert!(matches!(
        space.add(Action::identity("salary")),
        Err(EnvError::CapacityExceeded { capacity: 2 })
    ));
    assert_eq!(space.len(), 2);
    assert_eq!(space[0].column_name(), "gender");
    assert_eq!(space[1].idx(), 1);
}

#[test]
fn test_tiled_env_on_mock_subjects() -> Result<()> {
    let tiling = TilingConfig::default()
        .num_tilings(4)
        .tiling_dim(4)
        .max_size(256)
        .column_scale("gender", 4.0)
        .column_scale("ethnicity", 4.0);
    let config = TiledEnvConfig::new(env_config().distance_type(DistanceType::Cosine), tiling);
    let mut env = TiledEnv::<DistortionEnv>::build(&config, 0)?;
    assert_eq!(env.n_actions(), 3);
    assert_eq!(env.n_states(), 10);

    let state = env.reset()?.obs;
    assert_eq!(state.bin_idx, 0);
    assert_eq!(state.column_names, mock::mock_subjects().columns());
    let f1 = env.featurize_state_action(&state, 0)?;
    assert_eq!(f1, env.featurize_state_action(&state, 0)?);

    let (step, _) = env.step(&0)?;
    assert_eq!(step.obs.bin_idx, env.env().state().bin_idx);
    assert!(step.obs.total_distortion > 0.0);
    let f2 = env.featurize_state_action(&step.obs, 0)?;
    assert_ne!(f1, f2);
    Ok(())
}

#[test]
fn test_tiled_env_rejects_empty_scales() {
    let config = TiledEnvConfig::new(
        env_config().distance_type(DistanceType::Cosine),
        TilingConfig::default(),
    );
    assert!(TiledEnv::<DistortionEnv>::build(&config, 0).is_err());
}
