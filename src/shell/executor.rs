use std::io;

use super::{expander, planner, tokenizer};
use crate::core::commands::{self, Builtin, BuiltinOutcome};
use crate::flags::BuiltinErrorPolicy;

/// What the shell loop does after a line has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    Exit(i32),
}

pub trait CommandHandler {
    fn execute_command(&mut self, line: &str) -> LineOutcome;
}

impl CommandHandler for super::Shell {
    fn execute_command(&mut self, line: &str) -> LineOutcome {
        let tokens: Vec<String> = tokenizer::tokenize(line, self.config.max_words)
            .iter()
            .map(|token| expander::expand(token, &self.state))
            .collect();

        let plan = match planner::plan(tokens) {
            Ok(Some(plan)) => plan,
            Ok(None) => return LineOutcome::Continue,
            Err(e) => {
                eprintln!("minish: {}", e);
                return LineOutcome::Continue;
            }
        };

        if let Some(builtin) = plan.builtin {
            return self.run_builtin(builtin, &plan.argv[1..]);
        }

        if let Err(e) = self
            .executor
            .spawn_process(&plan, &mut self.state, &mut io::stderr())
        {
            eprintln!("minish: {}", e);
            if !plan.background {
                self.state.set_exit_status(1);
            }
        }
        LineOutcome::Continue
    }
}

impl super::Shell {
    fn run_builtin(&mut self, builtin: Builtin, args: &[String]) -> LineOutcome {
        match commands::run(builtin, args, &self.state) {
            Ok(BuiltinOutcome::Continue) => LineOutcome::Continue,
            Ok(BuiltinOutcome::Exit(code)) => LineOutcome::Exit(code),
            Err(e) => {
                eprintln!("minish: {}", e);
                match self.config.builtin_errors {
                    BuiltinErrorPolicy::Fatal => LineOutcome::Exit(1),
                    BuiltinErrorPolicy::Report => {
                        self.state.set_exit_status(1);
                        LineOutcome::Continue
                    }
                }
            }
        }
    }
}
