use super::{BuiltinError, BuiltinOutcome, Command};
use crate::core::state::ShellState;

#[derive(Clone, Default)]
pub struct ExitCommand;

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ExitCommand {
    fn execute(&self, args: &[String], state: &ShellState) -> Result<BuiltinOutcome, BuiltinError> {
        match args {
            [] => Ok(BuiltinOutcome::Exit(state.exit_status())),
            [code] => parse_exit_code(code)
                .map(BuiltinOutcome::Exit)
                .ok_or_else(|| BuiltinError::NotNumeric(code.clone())),
            _ => Err(BuiltinError::TooManyArguments("exit")),
        }
    }
}

/// Parse an integer the way C's `strtol(s, NULL, 0)` reads it: optional
/// sign, `0x` for hex, a leading `0` for octal, decimal otherwise. Unlike
/// `strtol`, trailing garbage is rejected.
pub fn parse_exit_code(text: &str) -> Option<i32> {
    let text = text.trim_start();
    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        (16, hex)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };

    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }

    let value = i64::from_str_radix(digits, radix).ok()?;
    let value = if negative { -value } else { value };
    // the kernel only keeps the low byte anyway
    Some(value as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_bare_exit_uses_last_status() {
        let mut state = ShellState::new(false);
        let cmd = ExitCommand::new();
        assert_eq!(cmd.execute(&[], &state).unwrap(), BuiltinOutcome::Exit(0));
        state.set_exit_status(130);
        assert_eq!(cmd.execute(&[], &state).unwrap(), BuiltinOutcome::Exit(130));
    }

    #[test]
    fn test_exit_with_code() {
        let state = ShellState::new(false);
        let outcome = ExitCommand::new().execute(&args(&["3"]), &state).unwrap();
        assert_eq!(outcome, BuiltinOutcome::Exit(3));
    }

    #[test]
    fn test_exit_rejects_extra_arguments() {
        let state = ShellState::new(false);
        let result = ExitCommand::new().execute(&args(&["a", "b"]), &state);
        assert!(matches!(result, Err(BuiltinError::TooManyArguments("exit"))));
    }

    #[test]
    fn test_exit_rejects_non_numeric() {
        let state = ShellState::new(false);
        let result = ExitCommand::new().execute(&args(&["abc"]), &state);
        assert!(matches!(result, Err(BuiltinError::NotNumeric(ref s)) if s == "abc"));
    }

    #[test]
    fn test_parse_exit_code_bases() {
        assert_eq!(parse_exit_code("0"), Some(0));
        assert_eq!(parse_exit_code("42"), Some(42));
        assert_eq!(parse_exit_code("0x1f"), Some(31));
        assert_eq!(parse_exit_code("0X10"), Some(16));
        assert_eq!(parse_exit_code("010"), Some(8));
        assert_eq!(parse_exit_code("-1"), Some(-1));
        assert_eq!(parse_exit_code("+7"), Some(7));
    }

    #[test]
    fn test_parse_exit_code_rejects_garbage() {
        assert_eq!(parse_exit_code(""), None);
        assert_eq!(parse_exit_code("-"), None);
        assert_eq!(parse_exit_code("0x"), None);
        assert_eq!(parse_exit_code("08"), None);
        assert_eq!(parse_exit_code("3abc"), None);
        assert_eq!(parse_exit_code("--3"), None);
    }
}
