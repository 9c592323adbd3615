use crate::process::ProcessError;
use libc::{c_int, sighandler_t, SIGINT, SIGTSTP, SIG_IGN};
use std::{fmt, io, mem, ptr};

extern "C" fn handle_sigint(_: c_int) {
    // Nothing to do: delivery alone interrupts the blocked read.
}

/// Dispositions for SIGINT and SIGTSTP as they were when the shell started.
#[derive(Clone, Copy)]
pub struct SavedDispositions {
    interrupt: libc::sigaction,
    terminal_stop: libc::sigaction,
}

impl fmt::Debug for SavedDispositions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SavedDispositions")
            .field("interrupt", &self.interrupt.sa_sigaction)
            .field("terminal_stop", &self.terminal_stop.sa_sigaction)
            .finish()
    }
}

impl SavedDispositions {
    /// Put the inherited dispositions back. Only calls `sigaction`, so it is
    /// safe to run between fork and exec.
    pub fn restore(&self) -> io::Result<()> {
        // SAFETY: both actions were filled in by a successful sigaction call.
        unsafe {
            if libc::sigaction(SIGINT, &self.interrupt, ptr::null_mut()) == -1
                || libc::sigaction(SIGTSTP, &self.terminal_stop, ptr::null_mut()) == -1
            {
                return Err(io::Error::last_os_error());
            }
        }
        Ok(())
    }
}

fn set_disposition(signal: c_int, handler: sighandler_t) -> io::Result<libc::sigaction> {
    // SAFETY: zeroed sigaction structs are valid, and the handler is either
    // SIG_IGN or an extern "C" fn that touches no state.
    unsafe {
        let mut action: libc::sigaction = mem::zeroed();
        action.sa_sigaction = handler;
        libc::sigfillset(&mut action.sa_mask);
        // No SA_RESTART: a pending read must fail with EINTR.
        action.sa_flags = 0;

        let mut previous: libc::sigaction = mem::zeroed();
        if libc::sigaction(signal, &action, &mut previous) == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(previous)
    }
}

/// Interactive mode: SIGTSTP is ignored for the shell's whole lifetime and
/// SIGINT is ignored except while reading input.
pub fn setup_signal_handlers() -> Result<SavedDispositions, ProcessError> {
    let terminal_stop = set_disposition(SIGTSTP, SIG_IGN).map_err(ProcessError::Signal)?;
    let interrupt = set_disposition(SIGINT, SIG_IGN).map_err(ProcessError::Signal)?;
    log::debug!("installed interactive signal dispositions");
    Ok(SavedDispositions {
        interrupt,
        terminal_stop,
    })
}

/// SIGINT interrupts the read for as long as the guard lives, and is ignored
/// again once it drops.
pub struct InterruptibleRead {
    _private: (),
}

impl InterruptibleRead {
    pub fn begin() -> Result<Self, ProcessError> {
        set_disposition(SIGINT, handle_sigint as extern "C" fn(c_int) as sighandler_t)
            .map_err(ProcessError::Signal)?;
        Ok(Self { _private: () })
    }
}

impl Drop for InterruptibleRead {
    fn drop(&mut self) {
        if let Err(e) = set_disposition(SIGINT, SIG_IGN) {
            log::warn!("failed to ignore SIGINT after read: {}", e);
        }
    }
}

/// Send `signal` to `pid`.
pub fn send(pid: u32, signal: c_int) -> io::Result<()> {
    let pid = libc::pid_t::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
    // SAFETY: kill has no memory-safety preconditions.
    if unsafe { libc::kill(pid, signal) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
