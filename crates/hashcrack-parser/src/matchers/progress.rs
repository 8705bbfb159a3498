//! Progress line matcher.

use regex::Regex;

use crate::matcher::{FieldMatcher, MatchContext};
use crate::update::FieldUpdate;

lazy_static::lazy_static! {
    // "Progress.........: 42%" or hashcat's "Progress.........: 1024/14344385 (42.17%)"
    static ref PROGRESS: Regex =
        Regex::new(r"^Progress\.+:\s+(?:\d+/\d+\s+\()?(\d+)(?:\.\d+)?%").unwrap();
}

/// Matches progress lines. Fractions are truncated and values above 100
/// are clamped.
pub struct ProgressMatcher;

impl FieldMatcher for ProgressMatcher {
    fn name(&self) -> &'static str {
        "progress"
    }

    fn match_line(&self, line: &str, _context: &MatchContext<'_>) -> Option<FieldUpdate> {
        let caps = PROGRESS.captures(line)?;
        let percent: u64 = caps.get(1)?.as_str().parse().ok()?;
        Some(FieldUpdate::Progress(percent.min(100) as u8))
    }
}
