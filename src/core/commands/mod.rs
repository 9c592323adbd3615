use std::io;
use thiserror::Error;

mod cd;
mod exit;

pub use cd::CdCommand;
pub use exit::{parse_exit_code, ExitCommand};

use crate::core::state::ShellState;

/// Commands that run inside the shell process instead of a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cd,
    Exit,
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "cd" => Some(Builtin::Cd),
            "exit" => Some(Builtin::Exit),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Cd => "cd",
            Builtin::Exit => "exit",
        }
    }
}

/// What the shell loop should do after a built-in ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinOutcome {
    Continue,
    Exit(i32),
}

#[derive(Error, Debug)]
pub enum BuiltinError {
    #[error("{0}: too many arguments")]
    TooManyArguments(&'static str),

    #[error("exit: {0}: numeric argument required")]
    NotNumeric(String),

    #[error("cd: HOME not set")]
    HomeNotSet,

    #[error("cd: {path}: {source}")]
    ChangeDir {
        path: String,
        #[source]
        source: io::Error,
    },
}

pub trait Command {
    fn execute(&self, args: &[String], state: &ShellState) -> Result<BuiltinOutcome, BuiltinError>;
}

/// Run `builtin` with the words that followed its name.
pub fn run(
    builtin: Builtin,
    args: &[String],
    state: &ShellState,
) -> Result<BuiltinOutcome, BuiltinError> {
    log::debug!("builtin {} {:?}", builtin.name(), args);
    match builtin {
        Builtin::Cd => CdCommand::new().execute(args, state),
        Builtin::Exit => ExitCommand::new().execute(args, state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_detection() {
        assert_eq!(Builtin::lookup("cd"), Some(Builtin::Cd));
        assert_eq!(Builtin::lookup("exit"), Some(Builtin::Exit));
        assert_eq!(Builtin::lookup("export"), None);
        assert_eq!(Builtin::lookup(""), None);
    }

    #[test]
    fn test_run_dispatches_exit() {
        let mut state = ShellState::new(false);
        state.set_exit_status(9);
        assert_eq!(
            run(Builtin::Exit, &[], &state).unwrap(),
            BuiltinOutcome::Exit(9)
        );
    }

    #[test]
    fn test_error_display() {
        let errors = vec![
            BuiltinError::TooManyArguments("cd"),
            BuiltinError::NotNumeric("abc".to_string()),
            BuiltinError::HomeNotSet,
            BuiltinError::ChangeDir {
                path: "/nope".to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "not found"),
            },
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }
}
