use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// What the shell does when `cd` or `exit` is misused or `cd` fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BuiltinErrorPolicy {
    /// Terminate the shell with status 1.
    #[default]
    Fatal,
    /// Print the error and keep reading input.
    Report,
}

/// minish - a small job-controlling command interpreter
#[derive(Parser, Debug, Clone)]
#[command(name = "minish", version, about)]
pub struct Flags {
    /// Read commands from this file instead of standard input
    pub script: Option<PathBuf>,

    /// How built-in usage errors and directory-change failures are handled
    #[arg(long, value_enum, default_value_t = BuiltinErrorPolicy::Fatal)]
    pub builtin_errors: BuiltinErrorPolicy,

    /// Maximum number of words kept from a single input line
    #[arg(long, default_value_t = 512, value_parser = clap::value_parser!(u16).range(1..))]
    pub max_words: u16,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            script: None,
            builtin_errors: BuiltinErrorPolicy::Fatal,
            max_words: 512,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_is_interactive() {
        let flags = Flags::try_parse_from(["minish"]).unwrap();
        assert!(flags.script.is_none());
        assert_eq!(flags.builtin_errors, BuiltinErrorPolicy::Fatal);
        assert_eq!(flags.max_words, 512);
    }

    #[test]
    fn test_script_argument() {
        let flags = Flags::try_parse_from(["minish", "run.sh"]).unwrap();
        assert_eq!(flags.script, Some(PathBuf::from("run.sh")));
    }

    #[test]
    fn test_too_many_arguments_rejected() {
        assert!(Flags::try_parse_from(["minish", "a.sh", "b.sh"]).is_err());
    }

    #[test]
    fn test_report_policy() {
        let flags = Flags::try_parse_from(["minish", "--builtin-errors", "report"]).unwrap();
        assert_eq!(flags.builtin_errors, BuiltinErrorPolicy::Report);
    }

    #[test]
    fn test_zero_max_words_rejected() {
        assert!(Flags::try_parse_from(["minish", "--max-words", "0"]).is_err());
    }
}
