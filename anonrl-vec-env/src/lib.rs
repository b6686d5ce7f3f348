#![warn(missing_docs)]
//! Lock-step vectorized environments.
//!
//! A [`VecEnv`] runs independent replicas of an [`Env`](anonrl_core::Env)
//! in worker threads. Each worker owns its environment, built from a shared
//! configuration and its own seed, and talks to the driver only through a
//! pair of channels carrying [`Command`]s and [`Response`]s.
mod error;
mod messages;
mod vec_env;
mod worker;

pub use error::VecEnvError;
pub use messages::{Command, Response, WorkerStatus};
pub use vec_env::{VecEnv, VecEnvConfig};
