use crate::process::ProcessError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("cannot open {path}: {source}")]
    InputFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Process(#[from] ProcessError),
}
