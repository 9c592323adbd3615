use std::io;
use thiserror::Error;

pub mod executor;
pub mod jobs;
pub mod signal;

pub use executor::ProcessExecutor;
pub use jobs::JobMonitor;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("{program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{path}: {source}")]
    Redirect {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("fork failed: {0}")]
    Fork(#[source] io::Error),

    #[error("wait failed: {0}")]
    Wait(#[source] io::Error),

    #[error("signal error: {0}")]
    Signal(#[source] io::Error),
}
