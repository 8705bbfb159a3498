//! Temperature line matcher.

use regex::Regex;

use crate::matcher::{FieldMatcher, MatchContext};
use crate::update::FieldUpdate;

lazy_static::lazy_static! {
    // "Temp...: 65C" or hashcat's "Hardware.Mon.#1..: Temp: 65c Fan: 33% Util: 99%"
    static ref TEMPERATURE: Regex =
        Regex::new(r"(?:^Temp\.*:|^Hardware\.Mon\.#\d+\.*:.*\bTemp:)\s*(-?\d+)\s*[cC]\b").unwrap();
}

/// Matches device temperature lines (Celsius).
pub struct TemperatureMatcher;

impl FieldMatcher for TemperatureMatcher {
    fn name(&self) -> &'static str {
        "temperature"
    }

    fn match_line(&self, line: &str, _context: &MatchContext<'_>) -> Option<FieldUpdate> {
        let caps = TEMPERATURE.captures(line)?;
        let temp: i32 = caps.get(1)?.as_str().parse().ok()?;
        Some(FieldUpdate::Temperature(temp))
    }
}
