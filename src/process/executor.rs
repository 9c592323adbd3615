use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, Stdio};

use super::jobs::{self, JobReport};
use super::ProcessError;
use crate::core::state::{JobState, ShellState};
use crate::shell::planner::{CommandPlan, RedirectMode, Redirection};
use libc::WUNTRACED;

const CREATE_MODE: u32 = 0o777;

/// Starts external commands and waits for foreground ones.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Run `plan` in a child process. Foreground commands are waited for and
    /// their status recorded; background ones are tracked and left running.
    /// Job transitions are reported on `out`.
    pub fn spawn_process<W: Write>(
        &self,
        plan: &CommandPlan,
        state: &mut ShellState,
        out: &mut W,
    ) -> Result<(), ProcessError> {
        let Some((program, args)) = plan.argv.split_first() else {
            return Ok(());
        };

        let child = match start(program, args, plan, state) {
            Ok(child) => child,
            Err(e) if plan.background => {
                // a failed background start still yields a job, exiting 1
                let _ = writeln!(out, "minish: {}", e);
                let pid = fork_failed_job()?;
                state.track(pid);
                log::info!("process {} running in the background", pid);
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        let pid = child.id();
        log::debug!("started {} as {}", program, pid);

        if plan.background {
            state.track(pid);
            log::info!("process {} running in the background", pid);
            return Ok(());
        }

        self.wait_foreground(pid, state, out)
    }

    fn wait_foreground<W: Write>(
        &self,
        pid: u32,
        state: &mut ShellState,
        out: &mut W,
    ) -> Result<(), ProcessError> {
        let raw_pid = libc::pid_t::try_from(pid).map_err(|_| {
            ProcessError::Wait(io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))
        })?;

        loop {
            let waited = jobs::wait_pid(raw_pid, WUNTRACED).map_err(ProcessError::Wait)?;
            let Some((_, status)) = waited else {
                continue;
            };

            match jobs::job_state(status) {
                Some(JobState::Exited(code)) => {
                    state.set_exit_status(code);
                    return Ok(());
                }
                Some(JobState::Signaled(sig)) => {
                    state.set_exit_status(sig + 128);
                    return Ok(());
                }
                Some(JobState::Stopped) => {
                    jobs::resume(pid);
                    let report = JobReport {
                        pid,
                        state: JobState::Stopped,
                    };
                    let _ = writeln!(out, "{}", report);
                    log::info!("{}", report);
                    state.track(pid);
                    return Ok(());
                }
                Some(JobState::Running) | None => {}
            }
        }
    }
}

fn start(
    program: &str,
    args: &[String],
    plan: &CommandPlan,
    state: &ShellState,
) -> Result<Child, ProcessError> {
    let mut command = Command::new(program);
    command.args(args);
    apply_redirections(&mut command, &plan.redirections)?;

    if let Some(saved) = state.saved_signals().copied() {
        // SAFETY: restore only calls sigaction, which is async-signal-safe.
        unsafe {
            command.pre_exec(move || saved.restore());
        }
    }

    command.spawn().map_err(|source| ProcessError::Spawn {
        program: program.to_string(),
        source,
    })
}

/// Fork a child that exits with status 1 straight away.
fn fork_failed_job() -> Result<u32, ProcessError> {
    // SAFETY: the child only calls _exit, which is async-signal-safe.
    match unsafe { libc::fork() } {
        -1 => Err(ProcessError::Fork(io::Error::last_os_error())),
        0 => unsafe { libc::_exit(1) },
        pid => Ok(pid.unsigned_abs()),
    }
}

fn open_target(redirection: &Redirection) -> io::Result<File> {
    let mut options = OpenOptions::new();
    match redirection.mode {
        RedirectMode::Read => {
            options.read(true);
        }
        RedirectMode::Truncate => {
            options.write(true).create(true).truncate(true).mode(CREATE_MODE);
        }
        RedirectMode::Append => {
            options.append(true).create(true).mode(CREATE_MODE);
        }
    }
    options.open(&redirection.path)
}

/// Open every target in order and bind the last one per stream. Earlier
/// targets are still opened, so `> a > b` creates both files.
fn apply_redirections(
    command: &mut Command,
    redirections: &[Redirection],
) -> Result<(), ProcessError> {
    let mut stdin = None;
    let mut stdout = None;

    for redirection in redirections {
        let file = open_target(redirection).map_err(|source| ProcessError::Redirect {
            path: redirection.path.clone(),
            source,
        })?;
        match redirection.mode {
            RedirectMode::Read => stdin = Some(file),
            RedirectMode::Truncate | RedirectMode::Append => stdout = Some(file),
        }
    }

    if let Some(file) = stdin {
        command.stdin(Stdio::from(file));
    }
    if let Some(file) = stdout {
        command.stdout(Stdio::from(file));
    }
    Ok(())
}
