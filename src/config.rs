use crate::flags::{BuiltinErrorPolicy, Flags};
use std::env;
use std::path::PathBuf;

pub const LOG_ENV: &str = "MINISH_LOG";
pub const PROMPT_ENV: &str = "PS1";

/// Settings resolved from the command line and the environment.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub script: Option<PathBuf>,
    pub builtin_errors: BuiltinErrorPolicy,
    pub max_words: usize,
}

impl ShellConfig {
    pub fn from_flags(flags: &Flags) -> Self {
        Self {
            script: flags.script.clone(),
            builtin_errors: flags.builtin_errors,
            max_words: usize::from(flags.max_words),
        }
    }

    /// Commands come from the terminal (or a pipe) rather than a script file.
    pub fn interactive(&self) -> bool {
        self.script.is_none()
    }

    /// `PS1` if set, otherwise `# ` for root and `$ ` for everyone else.
    pub fn prompt(&self) -> String {
        env::var(PROMPT_ENV).unwrap_or_else(|_| {
            // SAFETY: geteuid has no preconditions and cannot fail.
            if unsafe { libc::geteuid() } == 0 {
                "# ".to_string()
            } else {
                "$ ".to_string()
            }
        })
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::from_flags(&Flags::default())
    }
}

/// Logging stays silent unless `MINISH_LOG` asks for it, since stderr
/// also carries prompts and job reports.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, "off"))
        .format_timestamp(None)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_disables_interactive() {
        let flags = Flags {
            script: Some(PathBuf::from("commands.txt")),
            ..Flags::default()
        };
        let config = ShellConfig::from_flags(&flags);
        assert!(!config.interactive());
        assert_eq!(config.max_words, 512);
    }

    #[test]
    fn test_default_is_interactive() {
        assert!(ShellConfig::default().interactive());
    }
}
