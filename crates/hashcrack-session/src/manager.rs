//! Session manager: starts cracking jobs and drives their lifecycle.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use hashcrack_core::{Hasher, Result, ServerConfig, SessionId, SessionSnapshot};
use hashcrack_launcher::{ExitOutcome, LaunchRequest, Launcher, ProcessHandle, Terminator};
use hashcrack_parser::{FieldUpdate, OutputParser};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::registry::SessionRegistry;

const READ_CHUNK: usize = 8 * 1024;

/// Coordinates cracking sessions.
///
/// Every running session has three tasks: one applying parsed stdout to the
/// registry, one logging stderr, and one finalizing status on exit. None of
/// the public operations wait on the process.
pub struct SessionManager {
    config: ServerConfig,
    launcher: Arc<dyn Launcher>,
    hasher: Arc<dyn Hasher>,
    registry: Arc<SessionRegistry>,
    // Held across the limit check and registration so concurrent starts
    // cannot exceed max_running_sessions.
    start_gate: Mutex<()>,
}

impl SessionManager {
    /// Create a manager.
    pub fn new(config: ServerConfig, launcher: Arc<dyn Launcher>, hasher: Arc<dyn Hasher>) -> Self {
        Self {
            config,
            launcher,
            hasher,
            registry: Arc::new(SessionRegistry::new()),
            start_gate: Mutex::new(()),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Hash `plaintext` and start cracking it.
    ///
    /// Hashing errors (e.g. an unsupported mode) are returned unchanged and
    /// nothing is launched.
    pub fn start(&self, plaintext: &str, hash_type: u32) -> Result<SessionId> {
        let target_hash = self.hasher.hash(plaintext, hash_type)?;
        self.start_with_hash(&target_hash, hash_type)
    }

    /// Start cracking an existing hash. Must be called within a tokio runtime.
    ///
    /// On launch failure no session is registered.
    pub fn start_with_hash(&self, target_hash: &str, hash_type: u32) -> Result<SessionId> {
        let _gate = self.start_gate.lock().unwrap_or_else(PoisonError::into_inner);

        let limit = self.config.server.max_running_sessions;
        if self.registry.count_running() >= limit {
            warn!("Refusing to start session: {} already running", limit);
            return Err(hashcrack_core::Error::SessionLimitReached(limit));
        }

        let id = SessionId::new();
        let request = LaunchRequest::new(id, target_hash, hash_type);

        let ProcessHandle {
            pid,
            stdout,
            stderr,
            exit,
            terminator,
        } = self.launcher.launch(&request).map_err(|e| {
            error!("Launch failed for session {}: {}", id, e);
            e
        })?;

        register(
            &self.registry,
            SessionSnapshot::new(id, target_hash, hash_type),
            terminator,
        )?;
        info!("Session {} started: mode={}, pid={:?}", id, hash_type, pid);

        let output_task = match stdout {
            Some(stdout) => tokio::spawn(consume_output(
                Arc::clone(&self.registry),
                id,
                target_hash.to_string(),
                stdout,
            )),
            None => tokio::spawn(async {}),
        };

        if let Some(stderr) = stderr {
            tokio::spawn(log_stderr(id, stderr));
        }

        tokio::spawn(finalize_on_exit(
            Arc::clone(&self.registry),
            id,
            exit,
            output_task,
            Duration::from_millis(self.config.cracker.drain_timeout_ms),
        ));

        Ok(id)
    }

    /// Current state of a session.
    pub fn query(&self, id: &SessionId) -> Result<SessionSnapshot> {
        self.registry.get(id)
    }

    /// All sessions, oldest first.
    pub fn list_all(&self) -> Vec<SessionSnapshot> {
        let mut sessions = self.registry.list_all();
        sessions.sort_by(|a, b| {
            a.start_time
                .cmp(&b.start_time)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        sessions
    }

    /// Stop a session.
    ///
    /// Signals the process if it is still live and marks the session
    /// `stopped`. Stopping a finished or already stopped session changes
    /// nothing and is not an error.
    pub fn stop(&self, id: &SessionId) -> Result<SessionSnapshot> {
        // Fail before touching the handle if the id is unknown
        self.registry.get(id)?;

        match self.registry.take_terminator(id) {
            Some(terminator) => {
                let pid = terminator.pid();
                if !terminator.terminate() {
                    // Exited before the request; the exit task owns the status.
                    debug!("Session {} process {:?} had already exited", id, pid);
                } else if self.registry.update(id, |s| s.stop())? {
                    info!("Session {} stopped (pid {:?})", id, pid);
                }
            }
            None => debug!("Session {} has no live process; stop is a no-op", id),
        }

        self.registry.get(id)
    }

    /// Number of registered sessions.
    pub fn session_count(&self) -> usize {
        self.registry.len()
    }
}

/// Register a freshly launched session. If the record cannot be created the
/// process is terminated so it does not outlive its session.
fn register(
    registry: &SessionRegistry,
    record: SessionSnapshot,
    terminator: Terminator,
) -> Result<()> {
    let id = record.id;
    if let Err(e) = registry.create(record, None) {
        error!("Cannot register session {}: {}", id, e);
        terminator.terminate();
        return Err(e);
    }
    registry.attach_terminator(id, terminator);
    Ok(())
}

/// Apply one parsed update to a record. Returns whether the status changed.
///
/// Progress, speed and temperature may still land after a terminal status;
/// recovery only counts while the session is running.
pub fn apply_update(snapshot: &mut SessionSnapshot, update: FieldUpdate) -> bool {
    match update {
        FieldUpdate::Progress(p) => {
            snapshot.progress_percent = p;
            false
        }
        FieldUpdate::Speed(speed) => {
            snapshot.speed = Some(speed);
            false
        }
        FieldUpdate::Temperature(t) => {
            snapshot.temperature = Some(t);
            false
        }
        FieldUpdate::Recovered(plaintext) => snapshot.mark_recovered(plaintext),
    }
}

fn apply_all(registry: &SessionRegistry, id: SessionId, updates: Vec<FieldUpdate>) {
    for update in updates {
        match registry.update(&id, |s| apply_update(s, update)) {
            Ok(true) => info!("Session {} recovered the target hash", id),
            Ok(false) => {}
            Err(e) => {
                debug!("Dropping update for session {}: {}", id, e);
                return;
            }
        }
    }
}

async fn consume_output<R>(
    registry: Arc<SessionRegistry>,
    id: SessionId,
    target_hash: String,
    mut stdout: R,
) where
    R: AsyncRead + Unpin,
{
    let mut parser = OutputParser::new(target_hash);
    let mut buf = vec![0u8; READ_CHUNK];

    loop {
        match stdout.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => apply_all(&registry, id, parser.feed(&buf[..n])),
            Err(e) => {
                warn!("Session {} stdout read failed: {}", id, e);
                break;
            }
        }
    }

    apply_all(&registry, id, parser.finish());
    debug!(
        "Session {} output closed after {} lines",
        id,
        parser.lines_seen()
    );
}

async fn log_stderr<R>(id: SessionId, stderr: R)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(stderr).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if !line.trim().is_empty() => {
                warn!("Session {} stderr: {}", id, line.trim_end())
            }
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(e) => {
                debug!("Session {} stderr read failed: {}", id, e);
                break;
            }
        }
    }
}

async fn finalize_on_exit(
    registry: Arc<SessionRegistry>,
    id: SessionId,
    exit: oneshot::Receiver<ExitOutcome>,
    output_task: JoinHandle<()>,
    drain_timeout: Duration,
) {
    let outcome = exit.await.unwrap_or(ExitOutcome {
        code: None,
        signal: None,
    });

    // The process is gone; from here on stop is a no-op.
    registry.take_terminator(&id);

    // Output produced before exit is applied first, as far as the pipe
    // delivers it within the timeout.
    if tokio::time::timeout(drain_timeout, output_task).await.is_err() {
        debug!("Session {} output still draining at exit", id);
    }

    match registry.update(&id, |s| (s.finish(outcome.code), s.status)) {
        Ok((true, status)) => info!(
            "Session {} {} (exit code {:?})",
            id, status, outcome.code
        ),
        Ok((false, status)) => debug!(
            "Session {} already {}; exit code {:?} recorded",
            id, status, outcome.code
        ),
        Err(e) => warn!("Session {} vanished before exit: {}", id, e),
    }
}
