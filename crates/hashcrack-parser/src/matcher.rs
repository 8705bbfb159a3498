//! Line matching framework and the default matcher set.

use std::sync::Arc;

use crate::matchers::{ProgressMatcher, RecoveryMatcher, SpeedMatcher, TemperatureMatcher};
use crate::update::FieldUpdate;

/// Per-session context handed to matchers.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    /// The hash this session attacks
    pub target_hash: &'a str,
}

impl<'a> MatchContext<'a> {
    /// Create a context for one session.
    pub fn new(target_hash: &'a str) -> Self {
        Self { target_hash }
    }
}

/// Trait for recognizing one kind of status line.
pub trait FieldMatcher: Send + Sync {
    /// Matcher name (for logging).
    fn name(&self) -> &'static str;

    /// Try to extract an update from a single line (no trailing newline).
    fn match_line(&self, line: &str, context: &MatchContext<'_>) -> Option<FieldUpdate>;
}

/// Ordered set of matchers; the first match wins.
pub struct MatcherSet {
    matchers: Vec<Arc<dyn FieldMatcher>>,
}

impl MatcherSet {
    /// Create an empty matcher set.
    pub fn new() -> Self {
        Self {
            matchers: Vec::new(),
        }
    }

    /// Add a matcher at the end of the set.
    pub fn add_matcher(&mut self, matcher: Arc<dyn FieldMatcher>) {
        self.matchers.push(matcher);
    }

    /// Number of matchers.
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// Whether the set has no matchers.
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Run the matchers over one line.
    pub fn match_line(&self, line: &str, context: &MatchContext<'_>) -> Option<FieldUpdate> {
        self.matchers
            .iter()
            .find_map(|matcher| matcher.match_line(line, context))
    }
}

impl Default for MatcherSet {
    /// The hashcat status matchers. Status lines are tried before the
    /// recovery matcher so that a target hash can never shadow them.
    fn default() -> Self {
        let mut set = Self::new();
        set.add_matcher(Arc::new(ProgressMatcher));
        set.add_matcher(Arc::new(SpeedMatcher));
        set.add_matcher(Arc::new(TemperatureMatcher));
        set.add_matcher(Arc::new(RecoveryMatcher));
        set
    }
}

lazy_static::lazy_static! {
    static ref DEFAULT_MATCHERS: MatcherSet = MatcherSet::default();
}

/// Parse one line with the default matcher set.
///
/// Lines that match nothing yield `None` and should simply be skipped.
pub fn parse_line(line: &str, target_hash: &str) -> Option<FieldUpdate> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return None;
    }
    DEFAULT_MATCHERS.match_line(line, &MatchContext::new(target_hash))
}
