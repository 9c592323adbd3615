use crate::core::state::{JobState, ShellState};
use crate::process::signal;
use libc::{c_int, SIGCONT, SIGINT, WNOHANG, WUNTRACED};
use std::fmt;
use std::io::{self, Write};
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

/// A state change observed for a child, rendered as the line the shell
/// prints on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobReport {
    pub pid: u32,
    pub state: JobState,
}

impl fmt::Display for JobReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            JobState::Exited(code) => {
                write!(f, "Child process {} done. Exit status {}.", self.pid, code)
            }
            JobState::Signaled(sig) => {
                write!(f, "Child process {} done. Signaled {}.", self.pid, sig)
            }
            JobState::Stopped => write!(f, "Child process {} stopped. Continuing.", self.pid),
            JobState::Running => write!(f, "Child process {} running.", self.pid),
        }
    }
}

/// Map a raw wait status onto a job state. `None` for "continued".
pub fn job_state(status: ExitStatus) -> Option<JobState> {
    if let Some(code) = status.code() {
        Some(JobState::Exited(code))
    } else if let Some(sig) = status.signal() {
        Some(JobState::Signaled(sig))
    } else if status.stopped_signal().is_some() {
        Some(JobState::Stopped)
    } else {
        None
    }
}

/// `waitpid` that retries on EINTR. `Ok(None)` means nothing changed
/// (only possible with `WNOHANG`).
pub(crate) fn wait_pid(pid: libc::pid_t, options: c_int) -> io::Result<Option<(u32, ExitStatus)>> {
    let mut status: c_int = 0;
    loop {
        // SAFETY: status is a valid, writable c_int.
        let ret = unsafe { libc::waitpid(pid, &mut status, options) };
        match ret {
            -1 => {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }
            0 => return Ok(None),
            child => return Ok(Some((child.unsigned_abs(), ExitStatus::from_raw(status)))),
        }
    }
}

/// Resume a stopped child. Failure only means it is already gone.
pub(crate) fn resume(pid: u32) {
    if let Err(e) = signal::send(pid, SIGCONT) {
        log::warn!("failed to continue process {}: {}", pid, e);
    }
}

/// Discovers background state changes between prompts.
#[derive(Debug, Clone, Default)]
pub struct JobMonitor;

impl JobMonitor {
    pub fn new() -> Self {
        Self
    }

    /// Check every child without blocking and report what changed.
    ///
    /// Finished children are reported and dropped from tracking; stopped
    /// ones are continued and stay tracked. The pass ends at the first stop
    /// so a child that keeps stopping cannot hold up the prompt.
    pub fn poll<W: Write>(&self, state: &mut ShellState, out: &mut W) -> io::Result<()> {
        loop {
            let (pid, status) = match wait_pid(-1, WNOHANG | WUNTRACED) {
                Ok(Some(change)) => change,
                Ok(None) => break,
                Err(e) if e.raw_os_error() == Some(libc::ECHILD) => break,
                Err(e) => {
                    log::warn!("polling children failed: {}", e);
                    break;
                }
            };
            let Some(job) = job_state(status) else {
                continue;
            };

            let report = JobReport { pid, state: job };
            writeln!(out, "{}", report)?;
            log::info!("{}", report);

            if job == JobState::Stopped {
                resume(pid);
                state.update_job(pid, JobState::Running);
                break;
            }
            state.update_job(pid, job);
        }

        Ok(())
    }

    /// Interrupt every job still tracked. Called once input runs out.
    pub fn shutdown(&self, state: &ShellState) {
        for job in state.jobs() {
            log::debug!("interrupting background process {}", job.pid);
            if let Err(e) = signal::send(job.pid, SIGINT) {
                log::warn!("failed to interrupt process {}: {}", job.pid, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn test_report_lines() {
        let line = |state| JobReport { pid: 77, state }.to_string();
        assert_eq!(line(JobState::Exited(2)), "Child process 77 done. Exit status 2.");
        assert_eq!(line(JobState::Signaled(15)), "Child process 77 done. Signaled 15.");
        assert_eq!(line(JobState::Stopped), "Child process 77 stopped. Continuing.");
    }

    #[test]
    fn test_job_state_decoding() {
        // raw wait statuses as the kernel encodes them
        assert_eq!(job_state(ExitStatus::from_raw(3 << 8)), Some(JobState::Exited(3)));
        assert_eq!(job_state(ExitStatus::from_raw(9)), Some(JobState::Signaled(9)));
        assert_eq!(
            job_state(ExitStatus::from_raw((libc::SIGTSTP << 8) | 0x7f)),
            Some(JobState::Stopped)
        );
        assert_eq!(job_state(ExitStatus::from_raw(0xffff)), None);
    }

    // Polls until the given child shows up. Other tests may reap their own
    // children concurrently, so only waitpid on the exact pid is used.
    fn wait_for_exit(pid: u32) -> JobState {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some((_, status)) = wait_pid(pid as libc::pid_t, WNOHANG | WUNTRACED).unwrap() {
                return job_state(status).unwrap();
            }
            assert!(Instant::now() < deadline, "child {} never changed state", pid);
            thread::sleep(Duration::from_millis(20));
        }
    }

    #[test]
    fn test_signal_delivery() {
        let child = Command::new("sleep").arg("30").spawn().unwrap();
        let pid = child.id();
        signal::send(pid, libc::SIGTERM).unwrap();
        assert_eq!(wait_for_exit(pid), JobState::Signaled(libc::SIGTERM));
    }

    #[test]
    fn test_exit_code_observed() {
        let child = Command::new("sh").args(["-c", "exit 4"]).spawn().unwrap();
        assert_eq!(wait_for_exit(child.id()), JobState::Exited(4));
    }

    #[test]
    fn test_shutdown_with_no_jobs_is_quiet() {
        let state = ShellState::new(false);
        JobMonitor::new().shutdown(&state);
    }
}
