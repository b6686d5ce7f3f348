//! Worker loop.
use crate::{Command, Response, WorkerStatus};
use anonrl_core::Env;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, trace};

/// Builds an environment and serves commands until `Close` or until the
/// driver hangs up.
pub(crate) fn run<E: Env>(
    rank: usize,
    env_config: E::Config,
    seed: i64,
    receiver: Receiver<Command<E::Act>>,
    sender: Sender<Response<E>>,
) {
    let mut env = match E::build(&env_config, seed) {
        Ok(env) => env,
        Err(e) => {
            let _ = sender.send(Response::Failed(e));
            return;
        }
    };
    if sender.send(Response::Ready).is_err() {
        return;
    }
    debug!("Worker {} started with seed {}", rank, seed);

    let mut n_steps = 0;
    let mut is_done = false;
    for command in receiver.iter() {
        trace!("Worker {} received {}", rank, command.name());
        let response = match command {
            Command::Reset => env.reset().map(|step| {
                n_steps = 0;
                is_done = false;
                Response::Reset(step)
            }),
            Command::Step(act) => env.step(&act).map(|(step, record)| {
                n_steps += 1;
                is_done = step.is_last();
                Response::Step(step, record)
            }),
            Command::Status => Ok(Response::Status(WorkerStatus {
                rank,
                n_steps,
                is_done,
            })),
            Command::Close => break,
        };
        if sender
            .send(response.unwrap_or_else(Response::Failed))
            .is_err()
        {
            break;
        }
    }
    debug!("Worker {} terminated", rank);
}
