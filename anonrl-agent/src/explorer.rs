//! Epsilon-greedy action selection.
use log::{trace, warn};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Action values of a state.
pub trait QValues<S> {
    /// Value of every action in the state `state`, in action index order.
    fn q_values(&self, state: &S) -> Vec<f64>;
}

/// How epsilon decreases after every episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpsilonDecay {
    /// Epsilon is kept.
    None,

    /// `min_eps + (max_eps - min_eps) * exp(-decay_factor * episode)`.
    Exponential,

    /// `1 / episode`, the first episode counting as `1`.
    InverseStep,

    /// Epsilon decreases by `decay_factor`.
    ConstantRate,

    /// A function set with [`EpsilonGreedy::user_defined_decay`].
    UserDefined,
}

/// Configuration of [`EpsilonGreedy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpsilonGreedyConfig {
    /// Initial probability of a random action.
    pub eps: f64,

    /// Decay schedule.
    pub decay: EpsilonDecay,

    /// Upper end of the exponential decay.
    pub max_eps: f64,

    /// Lower bound of epsilon for every schedule.
    pub min_eps: f64,

    /// Rate of the exponential and constant-rate schedules.
    pub decay_factor: f64,

    /// Seed of the random source.
    pub seed: u64,
}

impl Default for EpsilonGreedyConfig {
    fn default() -> Self {
        Self {
            eps: 1.0,
            decay: EpsilonDecay::None,
            max_eps: 1.0,
            min_eps: 0.001,
            decay_factor: 0.01,
            seed: 42,
        }
    }
}

impl EpsilonGreedyConfig {
    /// Sets the initial epsilon.
    pub fn eps(mut self, v: f64) -> Self {
        self.eps = v;
        self
    }

    /// Sets the decay schedule.
    pub fn decay(mut self, v: EpsilonDecay) -> Self {
        self.decay = v;
        self
    }

    /// Sets the bounds of epsilon.
    pub fn bounds(mut self, min_eps: f64, max_eps: f64) -> Self {
        self.min_eps = min_eps;
        self.max_eps = max_eps;
        self
    }

    /// Sets the decay rate.
    pub fn decay_factor(mut self, v: f64) -> Self {
        self.decay_factor = v;
        self
    }

    /// Sets the seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }
}

type DecayFn = Box<dyn Fn(f64, usize) -> f64 + Send>;

/// Picks a uniformly random action with probability epsilon, the action of
/// largest value otherwise.
pub struct EpsilonGreedy {
    eps: f64,
    decay: EpsilonDecay,
    max_eps: f64,
    min_eps: f64,
    decay_factor: f64,
    user_defined: Option<DecayFn>,
    rng: StdRng,
}

impl fmt::Debug for EpsilonGreedy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EpsilonGreedy")
            .field("eps", &self.eps)
            .field("decay", &self.decay)
            .finish()
    }
}

impl EpsilonGreedy {
    /// Constructs the explorer.
    pub fn new(config: &EpsilonGreedyConfig) -> Self {
        Self {
            eps: config.eps,
            decay: config.decay,
            max_eps: config.max_eps,
            min_eps: config.min_eps,
            decay_factor: config.decay_factor,
            user_defined: None,
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Sets the function computing the next epsilon from the current one and
    /// the episode index, and selects [`EpsilonDecay::UserDefined`].
    pub fn user_defined_decay(mut self, f: impl Fn(f64, usize) -> f64 + Send + 'static) -> Self {
        self.user_defined = Some(Box::new(f));
        self.decay = EpsilonDecay::UserDefined;
        self
    }

    /// Current epsilon.
    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// Selects an action in `state` given the action values `q`.
    pub fn select<S, Q: QValues<S> + ?Sized>(&mut self, q: &Q, state: &S) -> usize {
        let values = q.q_values(state);
        self.select_from_values(&values)
    }

    /// Selects an action given the value of every action.
    pub fn select_from_values(&mut self, values: &[f64]) -> usize {
        if values.is_empty() {
            return 0;
        }
        if self.rng.gen::<f64>() > self.eps {
            argmax(values)
        } else {
            self.rng.gen_range(0..values.len())
        }
    }

    /// Picks one of `candidates` uniformly, `None` if there is none.
    pub fn choose(&mut self, candidates: &[usize]) -> Option<usize> {
        candidates.choose(&mut self.rng).copied()
    }

    /// Applies the decay schedule after the episode `episode_idx`.
    pub fn actions_after_episode(&mut self, episode_idx: usize) {
        self.eps = match self.decay {
            EpsilonDecay::None => return,
            EpsilonDecay::Exponential => {
                self.min_eps
                    + (self.max_eps - self.min_eps)
                        * (-self.decay_factor * episode_idx as f64).exp()
            }
            EpsilonDecay::InverseStep => 1.0 / episode_idx.max(1) as f64,
            EpsilonDecay::ConstantRate => self.eps - self.decay_factor,
            EpsilonDecay::UserDefined => match &self.user_defined {
                Some(f) => f(self.eps, episode_idx),
                None => {
                    warn!("No user defined decay is set, epsilon is kept");
                    self.eps
                }
            },
        };
        if self.eps < self.min_eps {
            self.eps = self.min_eps;
        }
        trace!("eps = {} after episode {}", self.eps, episode_idx);
    }
}

/// Index of the first largest value.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
