//! Structured field updates produced from cracker output.

use serde::{Deserialize, Serialize};

/// One field change extracted from a status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldUpdate {
    /// Progress percentage (0-100)
    Progress(u8),
    /// Guess rate, verbatim with unit
    Speed(String),
    /// Device temperature in Celsius
    Temperature(i32),
    /// Plaintext recovered for the session's own target hash
    Recovered(String),
}

/// The parser-owned subset of a session's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusFields {
    /// Progress percentage
    pub progress_percent: u8,
    /// Guess rate
    pub speed: Option<String>,
    /// Device temperature
    pub temperature: Option<i32>,
    /// Whether the plaintext was recovered
    pub recovered: bool,
    /// Recovered plaintext
    pub original_password: Option<String>,
}

impl StatusFields {
    /// Apply one update. Recovery is recorded only once.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Progress(percent) => self.progress_percent = percent,
            FieldUpdate::Speed(speed) => self.speed = Some(speed),
            FieldUpdate::Temperature(temp) => self.temperature = Some(temp),
            FieldUpdate::Recovered(plaintext) => {
                if !self.recovered {
                    self.recovered = true;
                    self.original_password = Some(plaintext);
                }
            }
        }
    }

    /// Parse a whole chunk (complete lines only) against `target_hash` and
    /// return the updated fields.
    pub fn apply_chunk(&self, chunk: &str, target_hash: &str) -> Self {
        let mut next = self.clone();
        for line in chunk.lines() {
            if let Some(update) = crate::parse_line(line, target_hash) {
                next.apply(update);
            }
        }
        next
    }
}
