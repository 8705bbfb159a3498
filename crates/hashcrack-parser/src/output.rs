//! Per-session output parser.

use tracing::{debug, trace};

use crate::line_buffer::LineBuffer;
use crate::matcher::parse_line;
use crate::update::FieldUpdate;

/// Stateful parser for one session's standard output.
///
/// Owns the line buffer and the session's target hash, so recovery lines
/// are only ever matched against this session's own hash.
#[derive(Debug)]
pub struct OutputParser {
    target_hash: String,
    buffer: LineBuffer,
    lines_seen: u64,
}

impl OutputParser {
    /// Create a parser for the given target hash.
    pub fn new(target_hash: impl Into<String>) -> Self {
        Self {
            target_hash: target_hash.into(),
            buffer: LineBuffer::new(),
            lines_seen: 0,
        }
    }

    /// The target hash this parser matches recoveries against.
    pub fn target_hash(&self) -> &str {
        &self.target_hash
    }

    /// Number of complete lines processed so far.
    pub fn lines_seen(&self) -> u64 {
        self.lines_seen
    }

    /// Feed a raw chunk; returns the updates of every line it completes,
    /// in stream order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<FieldUpdate> {
        let lines = self.buffer.push(chunk);
        let updates = self.parse_lines(&lines);
        debug!(
            "Parsed chunk: {} bytes, {} lines, {} updates",
            chunk.len(),
            lines.len(),
            updates.len()
        );
        updates
    }

    /// Parse the trailing partial line at end of stream.
    pub fn finish(&mut self) -> Vec<FieldUpdate> {
        match self.buffer.finish() {
            Some(line) => self.parse_lines(&[line]),
            None => Vec::new(),
        }
    }

    fn parse_lines(&mut self, lines: &[String]) -> Vec<FieldUpdate> {
        let mut updates = Vec::new();
        for line in lines {
            self.lines_seen += 1;
            match parse_line(line, &self.target_hash) {
                Some(update) => updates.push(update),
                None => trace!("Unmatched line: {:?}", line),
            }
        }
        updates
    }
}
