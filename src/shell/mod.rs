use std::io;

mod executor;
pub mod expander;
pub mod planner;
pub mod tokenizer;

use crate::{
    config::ShellConfig,
    core::state::ShellState,
    error::ShellError,
    input::{LineSource, ReadOutcome},
    process::{signal, JobMonitor, ProcessExecutor},
};

pub use executor::{CommandHandler, LineOutcome};

pub struct Shell {
    pub(crate) config: ShellConfig,
    pub(crate) input: LineSource,
    pub(crate) state: ShellState,
    pub(crate) executor: ProcessExecutor,
    pub(crate) monitor: JobMonitor,
}

impl Shell {
    pub fn new(config: ShellConfig) -> Result<Self, ShellError> {
        let input = LineSource::open(&config)?;

        let mut state = ShellState::new(config.interactive());
        if state.interactive() {
            state.set_saved_signals(signal::setup_signal_handlers()?);
        }

        Ok(Shell {
            config,
            input,
            state,
            executor: ProcessExecutor::new(),
            monitor: JobMonitor::new(),
        })
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    /// Read and run lines until input ends or `exit` runs. Returns the
    /// status the process should exit with.
    pub fn run(&mut self) -> i32 {
        loop {
            self.report_jobs();

            let prompt = if self.state.interactive() {
                self.config.prompt()
            } else {
                String::new()
            };

            match self.input.read_line(&prompt) {
                Ok(ReadOutcome::Line(line)) => {
                    if let LineOutcome::Exit(code) = self.execute_command(&line) {
                        return code;
                    }
                }
                Ok(ReadOutcome::Interrupted) => {
                    eprintln!();
                }
                Ok(ReadOutcome::Eof) => break,
                Err(e) => {
                    log::warn!("read failed: {}", e);
                    eprintln!("minish: {}", e);
                    // a script that cannot be read any further is finished
                    if !self.state.interactive() {
                        break;
                    }
                }
            }
        }

        self.monitor.shutdown(&self.state);
        self.state.exit_status()
    }

    fn report_jobs(&mut self) {
        if let Err(e) = self.monitor.poll(&mut self.state, &mut io::stderr()) {
            log::warn!("failed to report job status: {}", e);
        }
    }
}
