//! Launching the cracking tool for a session.

use hashcrack_core::{CrackerSettings, Error, Result, SessionId};
use tracing::{debug, info, warn};

use crate::{CrackerCommand, ProcessHandle};

/// What to crack, and under which session id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Session the process belongs to (also names its files)
    pub session_id: SessionId,
    /// Hash to recover
    pub target_hash: String,
    /// hashcat hash mode
    pub hash_type: u32,
}

impl LaunchRequest {
    /// Create a new launch request.
    pub fn new(session_id: SessionId, target_hash: impl Into<String>, hash_type: u32) -> Self {
        Self {
            session_id,
            target_hash: target_hash.into(),
            hash_type,
        }
    }
}

/// Starts a cracking process for a request.
///
/// The session layer only sees this trait, so tests can substitute a
/// scripted process for the real tool.
pub trait Launcher: Send + Sync {
    /// Spawn the process. Must be called from within a tokio runtime.
    fn launch(&self, request: &LaunchRequest) -> Result<ProcessHandle>;
}

/// Launches the real hashcat binary.
#[derive(Debug, Clone, Default)]
pub struct HashcatLauncher {
    settings: CrackerSettings,
}

impl HashcatLauncher {
    /// Create a launcher from cracker settings.
    pub fn new(settings: CrackerSettings) -> Self {
        Self { settings }
    }

    /// Settings in use.
    pub fn settings(&self) -> &CrackerSettings {
        &self.settings
    }

    fn write_hash_file(&self, request: &LaunchRequest) -> Result<std::path::PathBuf> {
        std::fs::create_dir_all(&self.settings.work_dir).map_err(|e| {
            Error::Launch(format!(
                "Cannot create work directory {}: {}",
                self.settings.work_dir.display(),
                e
            ))
        })?;

        let path = self.settings.hash_file(&request.session_id.to_string());
        std::fs::write(&path, format!("{}\n", request.target_hash)).map_err(|e| {
            Error::Launch(format!("Cannot write hash file {}: {}", path.display(), e))
        })?;

        Ok(path)
    }
}

impl Launcher for HashcatLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<ProcessHandle> {
        let hash_file = self.write_hash_file(request)?;
        let mut cmd = CrackerCommand::new(&self.settings).build(request);

        debug!(
            "Spawning {} for session {}: {:?}",
            self.settings.bin_path,
            request.session_id,
            CrackerCommand::new(&self.settings).args(request)
        );

        match cmd.spawn() {
            Ok(child) => {
                let handle = ProcessHandle::from_child(child);
                info!(
                    "Launched {} for session {} (pid {:?})",
                    self.settings.bin_path, request.session_id, handle.pid
                );
                Ok(handle)
            }
            Err(e) => {
                if let Err(rm) = std::fs::remove_file(&hash_file) {
                    warn!("Failed to remove {}: {}", hash_file.display(), rm);
                }
                Err(Error::Launch(format!(
                    "Failed to spawn '{}': {}",
                    self.settings.bin_path, e
                )))
            }
        }
    }
}
