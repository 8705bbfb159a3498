//! # hashcrack-parser
//!
//! Output parsing engine for hashcat status streams.
//!
//! This crate provides:
//! - Line reassembly for arbitrarily chunked process output
//! - Field matchers (progress, speed, temperature, recovered credential)
//! - A per-session parser bound to one target hash
//! - The "chunk + current fields -> updated fields" transformation
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it is pure (no I/O) and is driven
//! by hashcrack-session, which applies the updates to the registry.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod line_buffer;
pub mod matcher;
pub mod matchers;
pub mod output;
pub mod update;

// Re-export commonly used types
pub use line_buffer::LineBuffer;
pub use matcher::{parse_line, FieldMatcher, MatchContext, MatcherSet};
pub use matchers::{ProgressMatcher, RecoveryMatcher, SpeedMatcher, TemperatureMatcher};
pub use output::OutputParser;
pub use update::{FieldUpdate, StatusFields};
