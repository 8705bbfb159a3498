//! Error types for hashcrack.

use thiserror::Error;

use crate::SessionId;

/// Main error type for hashcrack operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Session not found
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    /// Session id already registered
    #[error("Session already exists: {0}")]
    SessionExists(SessionId),

    /// The cracking process could not be started
    #[error("Launch error: {0}")]
    Launch(String),

    /// Hash mode not in the catalog or not implemented
    #[error("Unsupported hash type: {0}")]
    UnsupportedAlgorithm(u32),

    /// Running session limit reached
    #[error("Session limit reached (max running: {0})")]
    SessionLimitReached(usize),

    /// Malformed session identifier
    #[error("Invalid session ID: {0}")]
    InvalidSessionId(String),

    /// Hashing backend failure
    #[error("Hashing error: {0}")]
    Hashing(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
