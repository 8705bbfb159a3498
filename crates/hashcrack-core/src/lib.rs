//! # hashcrack-core
//!
//! Core types for hashcrack.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other hashcrack crates. It provides:
//!
//! - Session types (SessionId, SessionStatus, SessionSnapshot)
//! - The session status state machine
//! - Server configuration loaded from YAML
//! - Target hash computation (Hasher)
//! - Error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other hashcrack crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod hash;
pub mod session;

// Re-export commonly used types
pub use config::{CrackerSettings, HashTypeConfig, HashingSettings, ServerConfig, ServerSettings};
pub use error::{Error, Result};
pub use hash::{DigestHasher, HashAlgorithm, Hasher};
pub use session::{SessionId, SessionSnapshot, SessionStatus};
