//! Property-based tests for the output parser.
//!
//! Uses proptest to generate random inputs and chunkings and verify parser
//! invariants.

use proptest::prelude::*;

use hashcrack_parser::{parse_line, FieldUpdate, LineBuffer, OutputParser, StatusFields};

/// Generate a lowercase hex hash of MD5/SHA1/SHA256 length.
fn hex_hash() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9a-f]{32}",
        "[0-9a-f]{40}",
        "[0-9a-f]{64}"
    ]
}

/// Generate a plausible plaintext.
fn plaintext() -> impl Strategy<Value = String> {
    "[A-Za-z0-9!@#%^&*:]{1,24}"
}

/// Generate one known status line.
fn status_line() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u8..=100).prop_map(|p| format!("Progress.........: {p}%")),
        (1u32..100000, 0u32..10).prop_map(|(a, b)| format!("Speed.#1.........:  {a}.{b} kH/s (1.20ms)")),
        (0i32..120).prop_map(|t| format!("Temp.............: {t}C")),
        Just("Status...........: Running".to_string()),
        Just("Candidates.#1....: 123456 -> password".to_string())
    ]
}

/// Split `data` at the given (sorted, deduplicated) cut points.
fn split_at_points(data: &[u8], mut cuts: Vec<usize>) -> Vec<Vec<u8>> {
    cuts.retain(|&c| c > 0 && c < data.len());
    cuts.sort_unstable();
    cuts.dedup();

    let mut chunks = Vec::new();
    let mut start = 0;
    for cut in cuts {
        chunks.push(data[start..cut].to_vec());
        start = cut;
    }
    chunks.push(data[start..].to_vec());
    chunks
}

proptest! {
    /// The parser should never panic on arbitrary input.
    #[test]
    fn parse_line_never_panics(line in ".*", target in ".{0,80}") {
        let _ = parse_line(&line, &target);
    }

    /// Feeding the same complete line twice yields the same value both times.
    #[test]
    fn parse_line_is_idempotent(line in status_line(), target in hex_hash()) {
        let mut fields = StatusFields::default();
        let chunk = format!("{line}\n");

        let once = fields.apply_chunk(&chunk, &target);
        fields = once.clone();
        let twice = fields.apply_chunk(&chunk, &target);

        prop_assert_eq!(once, twice);
    }

    /// A recovery line for another hash never sets `recovered`.
    #[test]
    fn foreign_recovery_never_matches(
        target in hex_hash(),
        other in hex_hash(),
        plain in plaintext()
    ) {
        prop_assume!(!other.eq_ignore_ascii_case(&target));
        let line = format!("{other}:{plain}");

        let fields = StatusFields::default().apply_chunk(&line, &target);
        prop_assert!(!fields.recovered);
        prop_assert_eq!(fields.original_password, None);
    }

    /// A recovery line for the session's own hash always matches, in any case.
    #[test]
    fn own_recovery_always_matches(
        target in hex_hash(),
        plain in plaintext(),
        upper in prop::bool::ANY
    ) {
        let shown = if upper { target.to_uppercase() } else { target.clone() };
        let update = parse_line(&format!("{shown}:{plain}"), &target);
        prop_assert_eq!(update, Some(FieldUpdate::Recovered(plain)));
    }

    /// Chunk boundaries never change the lines a LineBuffer yields.
    #[test]
    fn line_buffer_is_chunking_invariant(
        lines in prop::collection::vec("[^\n]{0,40}", 0..12),
        cuts in prop::collection::vec(0usize..600, 0..20)
    ) {
        let mut data = Vec::new();
        for line in &lines {
            data.extend_from_slice(line.as_bytes());
            data.push(b'\n');
        }

        let mut whole = LineBuffer::new();
        let expected = whole.push(&data);

        let mut chunked = LineBuffer::new();
        let mut actual = Vec::new();
        for chunk in split_at_points(&data, cuts) {
            actual.extend(chunked.push(&chunk));
        }

        prop_assert_eq!(actual, expected);
        prop_assert_eq!(chunked.pending(), 0);
    }

    /// An OutputParser yields the same updates however the stream is split.
    #[test]
    fn output_parser_is_chunking_invariant(
        lines in prop::collection::vec(status_line(), 1..10),
        target in hex_hash(),
        plain in plaintext(),
        cuts in prop::collection::vec(0usize..800, 0..25)
    ) {
        let mut text = lines.join("\n");
        text.push('\n');
        text.push_str(&format!("{target}:{plain}\n"));
        let data = text.into_bytes();

        let mut whole = OutputParser::new(target.clone());
        let expected = whole.feed(&data);

        let mut chunked = OutputParser::new(target.clone());
        let mut actual = Vec::new();
        for chunk in split_at_points(&data, cuts) {
            actual.extend(chunked.feed(&chunk));
        }

        prop_assert_eq!(&actual, &expected);
        prop_assert_eq!(actual.last(), Some(&FieldUpdate::Recovered(plain)));
    }
}
