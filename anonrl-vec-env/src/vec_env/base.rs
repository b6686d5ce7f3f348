//! Driver of the workers.
use super::VecEnvConfig;
use crate::{worker, Command, Response, VecEnvError, WorkerStatus};
use anonrl_core::{record::Record, Env, Step};
use anyhow::Result;
use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, info, warn};
use std::thread::{self, JoinHandle};

struct Worker<E: Env> {
    sender: Sender<Command<E::Act>>,
    receiver: Receiver<Response<E>>,
    thread: Option<JoinHandle<()>>,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Runs `n_workers` replicas of an environment in lock-step.
///
/// Every call broadcasts a [`Command`] to all workers and then blocks until
/// each of them has replied, collecting the [`Response`]s in rank order.
/// Within a worker, responses come in the order of the commands. There is no
/// timeout: a stalled worker blocks the driver.
///
/// ```mermaid
/// sequenceDiagram
///     participant D as VecEnv
///     participant W0 as Worker 0
///     participant W1 as Worker 1
///     D->>W0: Command::Step(a0)
///     D->>W1: Command::Step(a1)
///     W0-->>D: Response::Step
///     W1-->>D: Response::Step
///     D->>W0: Command::Close
///     D->>W1: Command::Close
/// ```
///
/// Dropping a [`VecEnv`] closes it.
pub struct VecEnv<E: Env> {
    workers: Vec<Worker<E>>,
    closed: bool,
}

impl<E> VecEnv<E>
where
    E: Env + 'static,
    E::Config: Send + 'static,
    E::Act: Send + 'static,
    E::Obs: Send + 'static,
    E::Info: Send + 'static,
{
    /// Spawns the workers and waits until every environment is built.
    ///
    /// The worker of rank `i` builds its environment with seed
    /// `config.seed + i`. If any of them fails, all workers are closed and
    /// the first error is returned.
    pub fn build(config: &VecEnvConfig, env_config: &E::Config) -> Result<Self> {
        config.validate()?;
        let workers = (0..config.n_workers)
            .map(|rank| {
                let (command_sender, command_receiver) = bounded(1);
                let (response_sender, response_receiver) = bounded(1);
                let env_config = env_config.clone();
                let seed = config.seed + rank as i64;
                let thread = thread::spawn(move || {
                    worker::run::<E>(rank, env_config, seed, command_receiver, response_sender)
                });
                Worker {
                    sender: command_sender,
                    receiver: response_receiver,
                    thread: Some(thread),
                }
            })
            .collect();
        let mut vec_env = Self {
            workers,
            closed: false,
        };

        let ready = vec_env.collect("Build").and_then(|responses| {
            Self::expect_all(responses, "Build", |r| match r {
                Response::Ready => Ok(()),
                r => Err(r),
            })
        });
        if let Err(e) = ready {
            if let Err(close_err) = vec_env.close() {
                warn!("{}", close_err);
            }
            return Err(e);
        }
        info!("Started {} workers", config.n_workers);
        Ok(vec_env)
    }

    /// Number of workers.
    pub fn n_workers(&self) -> usize {
        self.workers.len()
    }

    /// Returns `true` if the workers have been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Resets the environment of every worker.
    pub fn reset(&mut self) -> Result<Vec<Step<E>>> {
        self.broadcast(|_| Command::Reset)?;
        let responses = self.collect("Reset")?;
        Self::expect_all(responses, "Reset", |r| match r {
            Response::Reset(step) => Ok(step),
            r => Err(r),
        })
    }

    /// Steps the environment of every worker, `acts[i]` going to the worker
    /// of rank `i`.
    pub fn step(&mut self, acts: &[E::Act]) -> Result<Vec<(Step<E>, Record)>> {
        if acts.len() != self.workers.len() {
            return Err(VecEnvError::ActionLength {
                n_workers: self.workers.len(),
                found: acts.len(),
            }
            .into());
        }
        self.broadcast(|rank| Command::Step(acts[rank].clone()))?;
        let responses = self.collect("Step")?;
        Self::expect_all(responses, "Step", |r| match r {
            Response::Step(step, record) => Ok((step, record)),
            r => Err(r),
        })
    }

    /// Progress of the episode of every worker.
    pub fn status(&mut self) -> Result<Vec<WorkerStatus>> {
        self.broadcast(|_| Command::Status)?;
        let responses = self.collect("Status")?;
        Self::expect_all(responses, "Status", |r| match r {
            Response::Status(status) => Ok(status),
            r => Err(r),
        })
    }

    /// Terminates the workers and waits for their threads.
    ///
    /// Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let mut n_panicked = 0;
        for (rank, worker) in self.workers.iter_mut().enumerate() {
            // A worker whose channel is closed has already terminated.
            let _ = worker.sender.send(Command::Close);
            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    warn!("Worker {} panicked", rank);
                    n_panicked += 1;
                }
            }
        }
        debug!("Closed {} workers", self.workers.len());
        match n_panicked {
            0 => Ok(()),
            _ => Err(anyhow::anyhow!("{} workers panicked", n_panicked)),
        }
    }

    fn broadcast(&self, command: impl Fn(usize) -> Command<E::Act>) -> Result<()> {
        if self.closed {
            return Err(VecEnvError::Closed.into());
        }
        for (rank, worker) in self.workers.iter().enumerate() {
            worker
                .sender
                .send(command(rank))
                .map_err(|_| VecEnvError::WorkerDisconnected(rank))?;
        }
        Ok(())
    }

    // Waits for one response from every worker, in rank order.
    fn collect(&self, command: &str) -> Result<Vec<Response<E>>> {
        let mut responses = Vec::with_capacity(self.workers.len());
        for (rank, worker) in self.workers.iter().enumerate() {
            let response = worker
                .receiver
                .recv()
                .map_err(|_| VecEnvError::WorkerDisconnected(rank))?;
            debug!("Worker {} replied {} to {}", rank, response.name(), command);
            responses.push(response);
        }
        Ok(responses)
    }

    // Unpacks the responses, failing with the first failure of a worker.
    fn expect_all<T>(
        responses: Vec<Response<E>>,
        command: &str,
        f: impl Fn(Response<E>) -> Result<T, Response<E>>,
    ) -> Result<Vec<T>> {
        let mut values = Vec::with_capacity(responses.len());
        for (rank, response) in responses.into_iter().enumerate() {
            match f(response) {
                Ok(v) => values.push(v),
                Err(Response::Failed(e)) => {
                    return Err(e.context(format!("Worker {} failed on {}", rank, command)))
                }
                Err(r) => {
                    return Err(VecEnvError::UnexpectedResponse {
                        rank,
                        command: command.to_string(),
                        found: r.name().to_string(),
                    }
                    .into())
                }
            }
        }
        Ok(values)
    }
}

impl<E: Env> Drop for VecEnv<E> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        for worker in self.workers.iter_mut() {
            let _ = worker.sender.send(Command::Close);
            if let Some(thread) = worker.thread.take() {
                let _ = thread.join();
            }
        }
    }
}
