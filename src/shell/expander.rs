use crate::core::state::ShellState;
use std::env;

/// A recognised `$` sequence inside a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder<'a> {
    /// `$$`
    ShellPid,
    /// `$?`
    ExitStatus,
    /// `$!`
    BackgroundPid,
    /// `${NAME}`
    Variable(&'a str),
}

/// Scan state for one word: how far the input has been consumed and the
/// text produced so far.
struct Expansion<'a> {
    input: &'a str,
    cursor: usize,
    output: String,
}

impl<'a> Expansion<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            cursor: 0,
            output: String::with_capacity(input.len()),
        }
    }

    /// Copy literal text up to the next placeholder into the output and
    /// step over the placeholder. Returns `None` once the input is used up.
    fn next_placeholder(&mut self) -> Option<Placeholder<'a>> {
        let input: &'a str = self.input;
        let rest = &input[self.cursor..];
        let mut search = 0;

        while let Some(offset) = rest[search..].find('$') {
            let at = search + offset;
            let after = &rest[at + 1..];
            let found = match after.chars().next() {
                Some('$') => Some((Placeholder::ShellPid, 2)),
                Some('?') => Some((Placeholder::ExitStatus, 2)),
                Some('!') => Some((Placeholder::BackgroundPid, 2)),
                Some('{') => after[1..]
                    .find('}')
                    .map(|close| (Placeholder::Variable(&after[1..1 + close]), close + 3)),
                _ => None,
            };

            if let Some((placeholder, len)) = found {
                self.output.push_str(&rest[..at]);
                self.cursor += at + len;
                return Some(placeholder);
            }
            search = at + 1;
        }

        self.output.push_str(rest);
        self.cursor = input.len();
        None
    }
}

fn lookup_env(name: &str) -> Option<String> {
    if name.is_empty() || name.contains(['=', '\0']) {
        return None;
    }
    env::var_os(name).map(|value| value.to_string_lossy().into_owned())
}

/// Replace `$$`, `$?`, `$!` and `${NAME}` in `token`, reading variables from
/// the process environment.
pub fn expand(token: &str, state: &ShellState) -> String {
    expand_with(token, state, lookup_env)
}

/// Like [`expand`], with variable lookup supplied by the caller. Substituted
/// text is never scanned again.
pub fn expand_with<F>(token: &str, state: &ShellState, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut expansion = Expansion::new(token);

    while let Some(placeholder) = expansion.next_placeholder() {
        match placeholder {
            Placeholder::ShellPid => expansion.output.push_str(&state.shell_pid().to_string()),
            Placeholder::ExitStatus => {
                expansion.output.push_str(&state.exit_status().to_string())
            }
            Placeholder::BackgroundPid => {
                if let Some(pid) = state.last_background_pid() {
                    expansion.output.push_str(&pid.to_string());
                }
            }
            Placeholder::Variable(name) => {
                if let Some(value) = lookup(name) {
                    expansion.output.push_str(&value);
                }
            }
        }
    }

    expansion.output
}
