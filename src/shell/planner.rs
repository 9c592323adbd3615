use crate::core::commands::Builtin;
use crate::shell::tokenizer::Token;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    /// `<`: read-only, bound to stdin
    Read,
    /// `>`: create or truncate, bound to stdout
    Truncate,
    /// `>>`: create or append, bound to stdout
    Append,
}

impl RedirectMode {
    fn from_operator(token: &str) -> Option<Self> {
        match token {
            "<" => Some(RedirectMode::Read),
            ">" => Some(RedirectMode::Truncate),
            ">>" => Some(RedirectMode::Append),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RedirectMode::Read => "<",
            RedirectMode::Truncate => ">",
            RedirectMode::Append => ">>",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub mode: RedirectMode,
    pub path: String,
}

/// Everything needed to run one input line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPlan {
    /// Set when the first word names a built-in. `argv` then holds the raw
    /// words and no redirection or `&` handling takes place.
    pub builtin: Option<Builtin>,
    pub argv: Vec<String>,
    /// In the order they appeared; later entries win for the same stream.
    pub redirections: Vec<Redirection>,
    pub background: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("syntax error: expected a file name after `{0}`")]
    MissingRedirectTarget(&'static str),

    #[error("syntax error: missing command")]
    MissingCommand,
}

/// Classify the expanded words of one line. Returns `Ok(None)` for a line
/// with no words.
pub fn plan(tokens: Vec<Token>) -> Result<Option<CommandPlan>, PlanError> {
    let Some(first) = tokens.first() else {
        return Ok(None);
    };

    if let Some(builtin) = Builtin::lookup(first) {
        return Ok(Some(CommandPlan {
            builtin: Some(builtin),
            argv: tokens,
            ..CommandPlan::default()
        }));
    }

    let mut plan = CommandPlan::default();
    let mut words = tokens.into_iter();

    while let Some(word) = words.next() {
        if let Some(mode) = RedirectMode::from_operator(&word) {
            let path = words
                .next()
                .ok_or(PlanError::MissingRedirectTarget(mode.as_str()))?;
            plan.redirections.push(Redirection { mode, path });
        } else if word == "&" {
            plan.background = true;
        } else {
            plan.argv.push(word);
        }
    }

    if plan.argv.is_empty() {
        return Err(PlanError::MissingCommand);
    }

    log::debug!("planned {:?}", plan);
    Ok(Some(plan))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<Token> {
        line.split_whitespace().map(String::from).collect()
    }

    fn plan_of(line: &str) -> CommandPlan {
        plan(tokens(line)).unwrap().unwrap()
    }

    #[test]
    fn test_empty_line_has_no_plan() {
        assert_eq!(plan(Vec::new()), Ok(None));
    }

    #[test]
    fn test_plain_command() {
        let plan = plan_of("ls -la /tmp");
        assert_eq!(plan.builtin, None);
        assert_eq!(plan.argv, vec!["ls", "-la", "/tmp"]);
        assert!(plan.redirections.is_empty());
        assert!(!plan.background);
    }

    #[test]
    fn test_redirections_in_order() {
        let plan = plan_of("sort < in.txt > out.txt >> log.txt -r");
        assert_eq!(plan.argv, vec!["sort", "-r"]);
        assert_eq!(
            plan.redirections,
            vec![
                Redirection {
                    mode: RedirectMode::Read,
                    path: "in.txt".into()
                },
                Redirection {
                    mode: RedirectMode::Truncate,
                    path: "out.txt".into()
                },
                Redirection {
                    mode: RedirectMode::Append,
                    path: "log.txt".into()
                },
            ]
        );
    }

    #[test]
    fn test_background_anywhere() {
        assert!(plan_of("sleep 1 &").background);
        let plan = plan_of("sleep & 1");
        assert!(plan.background);
        assert_eq!(plan.argv, vec!["sleep", "1"]);
    }

    #[test]
    fn test_operator_as_target_is_consumed() {
        let plan = plan_of("echo > &");
        assert!(!plan.background);
        assert_eq!(plan.redirections[0].path, "&");
    }

    #[test]
    fn test_missing_redirect_target() {
        assert_eq!(
            plan(tokens("cat <")),
            Err(PlanError::MissingRedirectTarget("<"))
        );
        assert_eq!(
            plan(tokens("echo hi >>")),
            Err(PlanError::MissingRedirectTarget(">>"))
        );
    }

    #[test]
    fn test_missing_command() {
        assert_eq!(plan(tokens("> out.txt")), Err(PlanError::MissingCommand));
        assert_eq!(plan(tokens("&")), Err(PlanError::MissingCommand));
    }

    #[test]
    fn test_builtins_keep_raw_words() {
        let plan = plan_of("cd /tmp > x");
        assert_eq!(plan.builtin, Some(Builtin::Cd));
        assert_eq!(plan.argv, vec!["cd", "/tmp", ">", "x"]);

        assert_eq!(plan_of("exit 3").builtin, Some(Builtin::Exit));
    }

    #[test]
    fn test_builtin_only_in_first_position() {
        let plan = plan_of("echo exit");
        assert_eq!(plan.builtin, None);
        assert_eq!(plan.argv, vec!["echo", "exit"]);
    }
}
