//! # hashcrack-launcher
//!
//! Process management for the external cracking tool.
//!
//! This crate provides:
//! - hashcat command line construction from configuration
//! - The `Launcher` seam and its hashcat implementation
//! - Process handles with separate stdout/stderr, exit notification and
//!   one-shot termination
//! - A script-driven launcher for tests
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends on hashcrack-core and is
//! driven by hashcrack-session.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod command;
pub mod launcher;
pub mod process;
pub mod testing;

// Re-export commonly used types
pub use command::CrackerCommand;
pub use launcher::{HashcatLauncher, LaunchRequest, Launcher};
pub use process::{ExitOutcome, ProcessHandle, Terminator};
