//! # hashcrack-session
//!
//! Session lifecycle management for hashcrack.
//!
//! This crate provides:
//! - The session registry (atomic per-session updates, one-shot process handles)
//! - Session start, query, list and stop
//! - Output and exit tasks that keep each session's record current
//!
//! ## Architecture
//!
//! This is Layer 2 in the architecture - it depends on hashcrack-core,
//! hashcrack-parser and hashcrack-launcher.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod manager;
pub mod registry;

// Re-export commonly used types
pub use manager::{apply_update, SessionManager};
pub use registry::SessionRegistry;
