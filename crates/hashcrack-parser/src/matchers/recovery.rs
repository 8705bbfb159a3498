//! Cracked credential matcher (`<hash>:<plaintext>`).

use crate::matcher::{FieldMatcher, MatchContext};
use crate::update::FieldUpdate;

/// Matches `<hash>:<plaintext>` lines for the session's own target hash.
///
/// The candidate is the line prefix of the target's length, so lines for any
/// other hash never match. Hex digests compare ASCII-case-insensitively;
/// any other target (bcrypt's base64 alphabet) must match exactly.
/// The plaintext is everything after the separating colon and may itself
/// contain colons.
pub struct RecoveryMatcher;

impl RecoveryMatcher {
    /// Decode hashcat's `$HEX[...]` plaintext encoding. Returns the input
    /// unchanged when it is not valid hex-encoded UTF-8.
    pub fn decode_plaintext(plaintext: &str) -> String {
        plaintext
            .strip_prefix("$HEX[")
            .and_then(|rest| rest.strip_suffix(']'))
            .and_then(|inner| hex::decode(inner).ok())
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .unwrap_or_else(|| plaintext.to_string())
    }
}

impl FieldMatcher for RecoveryMatcher {
    fn name(&self) -> &'static str {
        "recovery"
    }

    fn match_line(&self, line: &str, context: &MatchContext<'_>) -> Option<FieldUpdate> {
        let target = context.target_hash.trim();
        if target.is_empty() {
            return None;
        }

        let candidate = line.get(..target.len())?;
        let same = if target.bytes().all(|b| b.is_ascii_hexdigit()) {
            candidate.eq_ignore_ascii_case(target)
        } else {
            candidate == target
        };
        if !same {
            return None;
        }

        let plaintext = line[target.len()..].strip_prefix(':')?;
        if plaintext.is_empty() {
            return None;
        }

        Some(FieldUpdate::Recovered(Self::decode_plaintext(plaintext)))
    }
}
