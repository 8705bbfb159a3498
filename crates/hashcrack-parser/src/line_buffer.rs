//! Reassembly of complete lines from an arbitrarily chunked byte stream.

/// Longest partial line kept between chunks.
pub const MAX_PARTIAL_LINE: usize = 64 * 1024;

/// Accumulates bytes and yields complete lines.
///
/// Lines end at `\n`; a trailing `\r` is removed and invalid UTF-8 is
/// replaced lossily. Bytes after the last newline are carried over to the
/// next [`push`](Self::push).
#[derive(Debug, Default)]
pub struct LineBuffer {
    partial: Vec<u8>,
    overflowed: bool,
}

impl LineBuffer {
    /// Create an empty line buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        let mut rest = chunk;

        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            let (head, tail) = rest.split_at(pos);
            if self.overflowed {
                // Tail end of an oversized line; drop it.
                self.overflowed = false;
                self.partial.clear();
            } else {
                self.partial.extend_from_slice(head);
                lines.push(Self::decode(&self.partial));
                self.partial.clear();
            }
            rest = &tail[1..];
        }

        if !self.overflowed {
            self.partial.extend_from_slice(rest);
            if self.partial.len() > MAX_PARTIAL_LINE {
                self.partial.clear();
                self.overflowed = true;
            }
        }

        lines
    }

    /// Flush the remaining partial line, if any (call at end of stream).
    pub fn finish(&mut self) -> Option<String> {
        let overflowed = std::mem::take(&mut self.overflowed);
        if overflowed || self.partial.is_empty() {
            self.partial.clear();
            return None;
        }
        let line = Self::decode(&self.partial);
        self.partial.clear();
        Some(line)
    }

    /// Bytes currently held as a partial line.
    pub fn pending(&self) -> usize {
        self.partial.len()
    }

    fn decode(bytes: &[u8]) -> String {
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        String::from_utf8_lossy(bytes).into_owned()
    }
}
