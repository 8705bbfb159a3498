//! Session types for cracking session tracking.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// Unique identifier for a cracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for SessionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for SessionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| Error::InvalidSessionId(s.to_string()))
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a cracking session.
///
/// `Running` is the only non-terminal state. Once a session reaches
/// `Completed`, `Failed` or `Stopped` it never leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// The cracking process is live
    Running,
    /// The process exited with code zero, or the target hash was recovered
    Completed,
    /// The process exited non-zero (or was killed) without a recovery
    Failed,
    /// Stopped on request
    Stopped,
}

impl SessionStatus {
    /// Whether no further transitions are allowed.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Running)
    }

    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        matches!(self, SessionStatus::Running) && next.is_terminal()
    }

    /// Apply a transition, returning `false` (and leaving `self` untouched)
    /// when it is not legal.
    pub fn transition(&mut self, next: SessionStatus) -> bool {
        if !self.can_transition_to(next) {
            return false;
        }
        *self = next;
        true
    }

    /// Lowercase name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Running => "running",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
            SessionStatus::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public projection of a session.
///
/// This is the whole record as stored by the registry; the live process
/// handle is kept elsewhere, so a snapshot is always safe to serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Session identifier
    pub id: SessionId,
    /// Hash under attack
    pub target_hash: String,
    /// hashcat hash mode (0 = MD5, 100 = SHA1, ...)
    pub hash_type: u32,
    /// Creation time
    pub start_time: DateTime<Utc>,
    /// Current status
    pub status: SessionStatus,
    /// Reported progress, 0-100
    pub progress_percent: u8,
    /// Reported guess rate, verbatim (e.g. "1234.5 kH/s")
    pub speed: Option<String>,
    /// Reported device temperature in Celsius
    pub temperature: Option<i32>,
    /// Whether the plaintext has been recovered
    pub recovered: bool,
    /// Recovered plaintext
    pub original_password: Option<String>,
    /// Exit code of the cracking process, once known
    pub exit_code: Option<i32>,
}

impl SessionSnapshot {
    /// Create a fresh `running` record.
    pub fn new(id: SessionId, target_hash: impl Into<String>, hash_type: u32) -> Self {
        Self {
            id,
            target_hash: target_hash.into(),
            hash_type,
            start_time: Utc::now(),
            status: SessionStatus::Running,
            progress_percent: 0,
            speed: None,
            temperature: None,
            recovered: false,
            original_password: None,
            exit_code: None,
        }
    }

    /// Record a recovered plaintext and complete the session.
    ///
    /// Ignored (returns `false`) unless the session is still running, so
    /// `recovered` always implies `Completed`.
    pub fn mark_recovered(&mut self, plaintext: impl Into<String>) -> bool {
        if self.recovered || !self.status.transition(SessionStatus::Completed) {
            return false;
        }
        self.recovered = true;
        self.original_password = Some(plaintext.into());
        true
    }

    /// Record process exit. Code zero completes, anything else (including a
    /// signal, `None`) fails. Returns whether the status changed.
    pub fn finish(&mut self, exit_code: Option<i32>) -> bool {
        self.exit_code = exit_code;
        let next = match exit_code {
            Some(0) => SessionStatus::Completed,
            _ => SessionStatus::Failed,
        };
        self.status.transition(next)
    }

    /// Mark as stopped on request. Returns whether the status changed.
    pub fn stop(&mut self) -> bool {
        self.status.transition(SessionStatus::Stopped)
    }
}
