//! Environment wrapper featurizing (state, action) pairs with tile coding.
use super::{tiles, Iht, TiledEnvConfig, TilingConfig};
use crate::{Action, ActionEnv, ActionSpace, EnvError, State};
use anonrl_core::{record::Record, Env, Step};
use anyhow::Result;
use log::trace;

/// Wraps an [`ActionEnv`] whose observation is a bin index.
///
/// Observations are repackaged into a [`State`] carrying the bin index, the
/// total distortion and the column names, and (state, action) pairs are
/// mapped to tile indices with [`TiledEnv::featurize_state_action`].
/// Every other operation is delegated to the wrapped environment.
pub struct TiledEnv<E> {
    env: E,
    iht: Iht,
    tiling: TilingConfig,
}

impl<E> TiledEnv<E>
where
    E: ActionEnv<Obs = usize, Info = State>,
{
    /// Wraps an already built environment.
    ///
    /// Fails with [`EnvError::InvalidParamValue`] if the tiling parameters are
    /// inconsistent.
    pub fn new(env: E, tiling: &TilingConfig) -> Result<Self, EnvError> {
        tiling.validate()?;
        Ok(Self {
            env,
            iht: Iht::new(tiling.max_size),
            tiling: tiling.clone(),
        })
    }

    /// The wrapped environment.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// The mutable wrapped environment.
    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// The index hash table.
    pub fn iht(&self) -> &Iht {
        &self.iht
    }

    /// Parameters of the tile coding.
    pub fn tiling(&self) -> &TilingConfig {
        &self.tiling
    }

    /// Size of the index hash table, i.e., the number of features.
    pub fn max_size(&self) -> usize {
        self.tiling.max_size
    }

    /// Number of actions.
    pub fn n_actions(&self) -> usize {
        self.env.action_space().len()
    }

    /// Scaled values of the configured state components, ordered by name.
    pub fn get_scaled_state(&self, state: &State) -> Result<Vec<f64>, EnvError> {
        self.tiling.scale(state)
    }

    /// Indices of the tiles activated by the pair, one per tiling.
    ///
    /// Identical inputs give identical indices for a given table. Distinct
    /// inputs share indices when they are close or, once the table is full,
    /// through hash collisions.
    pub fn featurize_state_action(
        &mut self,
        state: &State,
        action: usize,
    ) -> Result<Vec<usize>, EnvError> {
        let scaled = self.get_scaled_state(state)?;
        Ok(tiles(
            &mut self.iht,
            self.tiling.num_tilings,
            &scaled,
            &[action as i64],
        ))
    }

    fn to_state(obs: usize, info: &State) -> State {
        State {
            bin_idx: obs,
            ..info.clone()
        }
    }
}

impl<E> Env for TiledEnv<E>
where
    E: ActionEnv<Obs = usize, Info = State>,
{
    type Config = TiledEnvConfig<E::Config>;
    type Obs = State;
    type Act = usize;
    type Info = State;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        config.tiling.validate()?;
        let env = E::build(&config.env_config, seed)?;
        Ok(Self::new(env, &config.tiling)?)
    }

    fn step(&mut self, act: &usize) -> Result<(Step<Self>, Record)> {
        trace!("TiledEnv::step()");
        let (step, record) = self.env.step(act)?;
        let state = Self::to_state(step.obs, &step.info);
        Ok((step.map_obs::<Self>(state), record))
    }

    fn reset(&mut self) -> Result<Step<Self>> {
        trace!("TiledEnv::reset()");
        let step = self.env.reset()?;
        let state = Self::to_state(step.obs, &step.info);
        Ok(step.map_obs::<Self>(state))
    }
}

impl<E> ActionEnv for TiledEnv<E>
where
    E: ActionEnv<Obs = usize, Info = State>,
{
    fn apply_action(&mut self, act: usize) -> Result<(), EnvError> {
        self.env.apply_action(act)
    }

    fn get_action(&self, idx: usize) -> Result<&Action, EnvError> {
        self.env.get_action(idx)
    }

    fn action_space(&self) -> &ActionSpace {
        self.env.action_space()
    }

    fn column_names(&self) -> Vec<String> {
        self.env.column_names()
    }

    fn n_states(&self) -> usize {
        self.env.n_states()
    }

    fn total_current_distortion(&self) -> Result<f64, EnvError> {
        self.env.total_current_distortion()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anonrl_core::StepType;

    /// Environment whose distortion grows by `0.25` per step.
    struct StubEnv {
        action_space: ActionSpace,
        n_steps: usize,
    }

    impl StubEnv {
        fn state(&self) -> State {
            State {
                bin_idx: self.n_steps,
                total_distortion: 0.25 * self.n_steps as f64,
                column_names: vec!["gender".into()],
                column_distortions: vec![0.25 * self.n_steps as f64],
                ..State::default()
            }
        }
    }

    impl Env for StubEnv {
        type Config = usize;
        type Obs = usize;
        type Act = usize;
        type Info = State;

        fn build(n_actions: &usize, _seed: i64) -> Result<Self> {
            let mut action_space = ActionSpace::new(*n_actions);
            for _ in 0..*n_actions {
                action_space.add(Action::identity("gender"))?;
            }
            Ok(Self {
                action_space,
                n_steps: 0,
            })
        }

        fn step(&mut self, act: &usize) -> Result<(Step<Self>, Record)> {
            self.apply_action(*act)?;
            self.n_steps += 1;
            let step = Step::new(self.n_steps, -1.0, 1.0, StepType::Mid, self.state());
            Ok((step, Record::empty()))
        }

        fn reset(&mut self) -> Result<Step<Self>> {
            self.n_steps = 0;
            Ok(Step::first(0, self.state()))
        }
    }

    impl ActionEnv for StubEnv {
        fn apply_action(&mut self, act: usize) -> Result<(), EnvError> {
            self.get_action(act).map(|_| ())
        }

        fn get_action(&self, idx: usize) -> Result<&Action, EnvError> {
            self.action_space
                .get(idx)
                .ok_or_else(|| EnvError::InvalidAction(idx.to_string()))
        }

        fn action_space(&self) -> &ActionSpace {
            &self.action_space
        }

        fn column_names(&self) -> Vec<String> {
            vec!["gender".into()]
        }

        fn n_states(&self) -> usize {
            10
        }

        fn total_current_distortion(&self) -> Result<f64, EnvError> {
            Ok(0.25 * self.n_steps as f64)
        }
    }

    fn tiling() -> TilingConfig {
        TilingConfig::default()
            .num_tilings(4)
            .tiling_dim(4)
            .max_size(64)
            .column_scale("total_distortion", 4.0)
            .column_scale("gender", 4.0)
    }

    #[test]
    fn test_build_validates_tiling() {
        let config = TiledEnvConfig::new(2, tiling().max_size(63));
        assert!(TiledEnv::<StubEnv>::build(&config, 0).is_err());

        let mut tiling = tiling();
        tiling.column_scales.clear();
        let config = TiledEnvConfig::new(2, tiling);
        let err = TiledEnv::<StubEnv>::build(&config, 0).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<EnvError>(),
            Some(EnvError::InvalidParamValue { .. })
        ));
    }

    #[test]
    fn test_step_repackages_state() -> Result<()> {
        let mut env = TiledEnv::<StubEnv>::build(&TiledEnvConfig::new(2, tiling()), 0)?;
        let first = env.reset()?;
        assert!(first.is_first());
        assert_eq!(first.obs.bin_idx, 0);

        let (step, _) = env.step(&1)?;
        assert_eq!(step.obs.bin_idx, 1);
        assert_eq!(step.obs.total_distortion, 0.25);
        assert_eq!(step.obs.column_names, vec!["gender"]);
        assert_eq!(env.get_scaled_state(&step.obs)?, vec![1.0, 1.0]);
        assert_eq!(env.n_actions(), 2);
        assert!(env.step(&2).is_err());
        Ok(())
    }

    #[test]
    fn test_featurize_is_deterministic() -> Result<()> {
        let mut env = TiledEnv::<StubEnv>::build(&TiledEnvConfig::new(2, tiling()), 0)?;
        let state = env.reset()?.obs;
        let f1 = env.featurize_state_action(&state, 0)?;
        let f2 = env.featurize_state_action(&state, 0)?;
        assert_eq!(f1.len(), 4);
        assert_eq!(f1, f2);
        let f3 = env.featurize_state_action(&state, 1)?;
        assert_ne!(f1, f3);
        assert!(f1.iter().chain(f3.iter()).all(|ix| *ix < env.max_size()));

        let missing = State::default();
        assert!(matches!(
            env.featurize_state_action(&missing, 0),
            Err(EnvError::NotFound(_))
        ));
        Ok(())
    }
}
