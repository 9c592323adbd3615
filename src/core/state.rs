use crate::process::signal::SavedDispositions;

/// Last observed state of a background (or backgrounded) child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Running,
    Stopped,
    Exited(i32),
    Signaled(i32),
}

impl JobState {
    /// Exited and signaled jobs are no longer tracked.
    pub fn is_finished(self) -> bool {
        matches!(self, JobState::Exited(_) | JobState::Signaled(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedJob {
    pub pid: u32,
    pub state: JobState,
}

/// Interpreter-wide state, owned by the shell loop and passed by reference
/// to the expander, built-ins and launcher.
#[derive(Debug)]
pub struct ShellState {
    exit_status: i32,
    shell_pid: u32,
    last_background_pid: Option<u32>,
    interactive: bool,
    jobs: Vec<TrackedJob>,
    saved_signals: Option<SavedDispositions>,
}

impl ShellState {
    pub fn new(interactive: bool) -> Self {
        Self {
            exit_status: 0,
            shell_pid: std::process::id(),
            last_background_pid: None,
            interactive,
            jobs: Vec::new(),
            saved_signals: None,
        }
    }

    pub fn exit_status(&self) -> i32 {
        self.exit_status
    }

    pub fn set_exit_status(&mut self, status: i32) {
        self.exit_status = status;
    }

    pub fn shell_pid(&self) -> u32 {
        self.shell_pid
    }

    pub fn last_background_pid(&self) -> Option<u32> {
        self.last_background_pid
    }

    pub fn interactive(&self) -> bool {
        self.interactive
    }

    /// Dispositions the shell inherited, restored in every child.
    pub fn saved_signals(&self) -> Option<&SavedDispositions> {
        self.saved_signals.as_ref()
    }

    pub fn set_saved_signals(&mut self, saved: SavedDispositions) {
        self.saved_signals = Some(saved);
    }

    /// Record `pid` as the most recent background job.
    pub fn track(&mut self, pid: u32) {
        self.last_background_pid = Some(pid);
        match self.jobs.iter_mut().find(|job| job.pid == pid) {
            Some(job) => job.state = JobState::Running,
            None => self.jobs.push(TrackedJob {
                pid,
                state: JobState::Running,
            }),
        }
    }

    /// Apply an observed transition; finished jobs are dropped.
    pub fn update_job(&mut self, pid: u32, state: JobState) {
        if state.is_finished() {
            self.jobs.retain(|job| job.pid != pid);
        } else if let Some(job) = self.jobs.iter_mut().find(|job| job.pid == pid) {
            job.state = state;
        }
    }

    pub fn jobs(&self) -> &[TrackedJob] {
        &self.jobs
    }

    pub fn is_tracked(&self, pid: u32) -> bool {
        self.jobs.iter().any(|job| job.pid == pid)
    }
}
