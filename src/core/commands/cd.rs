use super::{BuiltinError, BuiltinOutcome, Command};
use crate::core::state::ShellState;
use std::env;
use std::path::PathBuf;

#[derive(Clone, Default)]
pub struct CdCommand;

impl CdCommand {
    pub fn new() -> Self {
        Self
    }

    /// `$HOME`, or the platform home directory when it is unset.
    fn home_dir() -> Result<PathBuf, BuiltinError> {
        env::var_os("HOME")
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .ok_or(BuiltinError::HomeNotSet)
    }
}

impl Command for CdCommand {
    fn execute(
        &self,
        args: &[String],
        _state: &ShellState,
    ) -> Result<BuiltinOutcome, BuiltinError> {
        let target = match args {
            [] => Self::home_dir()?,
            [path] => PathBuf::from(path),
            _ => return Err(BuiltinError::TooManyArguments("cd")),
        };

        env::set_current_dir(&target).map_err(|source| BuiltinError::ChangeDir {
            path: target.display().to_string(),
            source,
        })?;
        log::debug!("changed directory to {}", target.display());
        Ok(BuiltinOutcome::Continue)
    }
}
