use std::io;
use thiserror::Error;

/// Failures of the workload harness and the linearizability tester. The set
/// operations themselves cannot fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid workload configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to spawn worker thread")]
    Spawn(#[from] io::Error),

    #[error("worker thread {thread} panicked")]
    WorkerPanicked { thread: usize },

    #[error("set handle still shared after all workers joined")]
    SetStillShared,

    #[error("failed to build thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
