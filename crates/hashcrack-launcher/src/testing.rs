//! Testing utilities for code that drives a [`Launcher`].
//!
//! [`ScriptLauncher`] stands in for hashcat with a shell script, so session
//! lifecycle tests can control output, timing and exit codes.

use std::process::Stdio;
use std::sync::Mutex;

use hashcrack_core::{Error, Result};
use tokio::process::Command;

use crate::{LaunchRequest, Launcher, ProcessHandle};

/// Runs a fixed shell script instead of the cracking tool.
///
/// The script sees `HASHCRACK_TARGET` (target hash), `HASHCRACK_SESSION`
/// (session id) and `HASHCRACK_HASH_TYPE` in its environment.
#[derive(Debug)]
pub struct ScriptLauncher {
    shell: String,
    script: String,
    launched: Mutex<Vec<LaunchRequest>>,
}

impl ScriptLauncher {
    /// Run `script` with `/bin/sh -c`.
    pub fn new(script: impl Into<String>) -> Self {
        Self::with_shell("/bin/sh", script)
    }

    /// Run `script` with a specific shell. A shell that does not exist makes
    /// every launch fail.
    pub fn with_shell(shell: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            script: script.into(),
            launched: Mutex::new(Vec::new()),
        }
    }

    /// Requests that were successfully launched, in order.
    pub fn launched(&self) -> Vec<LaunchRequest> {
        self.launched
            .lock()
            .map(|l| l.clone())
            .unwrap_or_default()
    }
}

impl Launcher for ScriptLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<ProcessHandle> {
        let child = Command::new(&self.shell)
            .arg("-c")
            .arg(&self.script)
            .env("HASHCRACK_TARGET", &request.target_hash)
            .env("HASHCRACK_SESSION", request.session_id.to_string())
            .env("HASHCRACK_HASH_TYPE", request.hash_type.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Launch(format!("Failed to spawn '{}': {}", self.shell, e)))?;

        if let Ok(mut launched) = self.launched.lock() {
            launched.push(request.clone());
        }

        Ok(ProcessHandle::from_child(child))
    }
}
