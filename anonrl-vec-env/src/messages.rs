//! Messages between the driver and the workers.
use anonrl_core::{record::Record, Env, Step};

/// Messages that workers receive.
#[derive(Debug, Clone)]
pub enum Command<A> {
    /// Call [`Env::reset`].
    Reset,

    /// Call [`Env::step`] with the action.
    Step(A),

    /// Report a [`WorkerStatus`].
    Status,

    /// Drop the environment and terminate.
    Close,
}

impl<A> Command<A> {
    /// Name of the command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reset => "Reset",
            Self::Step(_) => "Step",
            Self::Status => "Status",
            Self::Close => "Close",
        }
    }
}

/// Progress of the episode of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStatus {
    /// Rank of the worker.
    pub rank: usize,

    /// Number of steps since the last reset.
    pub n_steps: usize,

    /// Whether the last step ended the episode.
    pub is_done: bool,
}

/// Messages that workers send back, one per [`Command`] except `Close`.
pub enum Response<E: Env> {
    /// The environment has been built.
    Ready,

    /// Result of [`Env::reset`].
    Reset(Step<E>),

    /// Result of [`Env::step`].
    Step(Step<E>, Record),

    /// Reply to [`Command::Status`].
    Status(WorkerStatus),

    /// The command failed, or the environment could not be built.
    Failed(anyhow::Error),
}

impl<E: Env> Response<E> {
    /// Name of the response.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Reset(_) => "Reset",
            Self::Step(..) => "Step",
            Self::Status(_) => "Status",
            Self::Failed(_) => "Failed",
        }
    }
}
