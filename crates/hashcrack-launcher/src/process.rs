//! Handle to a spawned cracking process.

use tokio::process::{Child, ChildStderr, ChildStdout};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// How a process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code, `None` when ended by a signal or when waiting failed
    pub code: Option<i32>,
    /// Terminating signal (Unix only)
    pub signal: Option<i32>,
}

impl ExitOutcome {
    /// Whether the process exited with code zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    fn from_status(status: std::process::ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;

        Self {
            code: status.code(),
            signal,
        }
    }
}

/// One-shot termination capability for a process.
///
/// `terminate` consumes the terminator, so a process can be asked to stop
/// at most once through it.
pub struct Terminator {
    pid: Option<u32>,
    kill_tx: oneshot::Sender<()>,
}

impl std::fmt::Debug for Terminator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terminator")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

impl Terminator {
    /// Process id, if it was known at spawn time.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Ask the process to stop. Does not wait for it to exit.
    ///
    /// Returns `false` when the process had already exited.
    pub fn terminate(self) -> bool {
        debug!("Requesting termination: pid={:?}", self.pid);
        self.kill_tx.send(()).is_ok()
    }
}

/// A spawned process: its output streams, exit notification and terminator.
#[derive(Debug)]
pub struct ProcessHandle {
    /// Process id
    pub pid: Option<u32>,
    /// Standard output (parsed for state)
    pub stdout: Option<ChildStdout>,
    /// Standard error (diagnostics only)
    pub stderr: Option<ChildStderr>,
    /// Resolves once the process has exited
    pub exit: oneshot::Receiver<ExitOutcome>,
    /// Termination capability
    pub terminator: Terminator,
}

impl ProcessHandle {
    /// Wrap a freshly spawned child.
    ///
    /// Takes the piped stdout/stderr and moves the child into a supervisor
    /// task that waits for exit or a termination request. Must be called
    /// from within a tokio runtime.
    pub fn from_child(mut child: Child) -> Self {
        let pid = child.id();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (exit_tx, exit_rx) = oneshot::channel();
        let (kill_tx, kill_rx) = oneshot::channel();

        tokio::spawn(supervise(child, pid, kill_rx, exit_tx));

        Self {
            pid,
            stdout,
            stderr,
            exit: exit_rx,
            terminator: Terminator { pid, kill_tx },
        }
    }
}

async fn supervise(
    mut child: Child,
    pid: Option<u32>,
    kill_rx: oneshot::Receiver<()>,
    exit_tx: oneshot::Sender<ExitOutcome>,
) {
    let status = tokio::select! {
        status = child.wait() => status,
        request = kill_rx => {
            // A dropped terminator is not a request.
            if request.is_ok() {
                request_termination(&mut child);
            }
            child.wait().await
        }
    };

    let outcome = match status {
        Ok(status) => ExitOutcome::from_status(status),
        Err(e) => {
            warn!("Failed to wait for process {:?}: {}", pid, e);
            ExitOutcome {
                code: None,
                signal: None,
            }
        }
    };

    info!(
        "Process exited: pid={:?}, code={:?}, signal={:?}",
        pid, outcome.code, outcome.signal
    );

    if exit_tx.send(outcome).is_err() {
        debug!("Exit receiver dropped for pid {:?}", pid);
    }
}

/// SIGTERM on Unix so the tool can shut down cleanly, forced kill otherwise
/// or if the signal cannot be delivered.
fn request_termination(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Some(pid) = child.id() {
            // The child has not been reaped yet (we own it), so the pid
            // still refers to it.
            let result = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
            if result == 0 {
                info!("Sent SIGTERM to pid {}", pid);
                return;
            }
            warn!(
                "SIGTERM to pid {} failed: {}",
                pid,
                std::io::Error::last_os_error()
            );
        }
    }

    if let Err(e) = child.start_kill() {
        debug!("Kill request ignored: {}", e);
    }
}
