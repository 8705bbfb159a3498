//! Speed line matcher.

use regex::Regex;

use crate::matcher::{FieldMatcher, MatchContext};
use crate::update::FieldUpdate;

lazy_static::lazy_static! {
    // "Speed...: 1234.5 kH/s", "Speed.#1.........:  1234.5 kH/s (0.52ms) @ Accel:..."
    static ref SPEED: Regex =
        Regex::new(r"^Speed\.(?:#\d+|#\*)?\.*:\s+(\d+(?:\.\d+)? ?[kMGTPE]?H/s)").unwrap();
}

/// Matches guess-rate lines, keeping the reported value and unit verbatim.
pub struct SpeedMatcher;

impl FieldMatcher for SpeedMatcher {
    fn name(&self) -> &'static str {
        "speed"
    }

    fn match_line(&self, line: &str, _context: &MatchContext<'_>) -> Option<FieldUpdate> {
        let caps = SPEED.captures(line)?;
        Some(FieldUpdate::Speed(caps.get(1)?.as_str().to_string()))
    }
}
