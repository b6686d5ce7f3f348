#![warn(missing_docs)]
//! Core traits and infrastructure for the anonymization RL harness.
//!
//! This crate is independent of any particular dataset or learning rule.
//! It defines how an environment ([`Env`]), an observation ([`Obs`]), an
//! action ([`Act`]) and a policy ([`Policy`]) interact, the [`Step`] object
//! emitted at every transition, and the episodic [`Trainer`] that drives an
//! [`Agent`] through an environment while writing [`record::Record`]s.
pub mod dummy;
pub mod error;
pub mod record;

mod base;
pub use base::{Act, Agent, Configurable, Env, Info, Obs, Policy, Step, StepType};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod trainer;
pub use trainer::{Trainer, TrainerConfig};
