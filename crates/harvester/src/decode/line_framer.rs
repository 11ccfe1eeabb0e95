// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline stage 1+2: accumulate raw bytes and split them on the
//! configured line terminator (spec §4.4 "Decoding pipeline").
//!
//! Framing operates on raw file bytes rather than post-transcode text so
//! that `raw_len` always equals exactly the bytes consumed from the file —
//! the offset invariant in spec §3 must hold to the byte, and re-deriving
//! byte counts from a transcoded string can't guarantee that for every
//! encoding (documented in DESIGN.md).

use encoding_rs::Encoding;

pub struct RawLine {
    /// Decoded (lossy on malformed sequences) UTF-8 text, truncated to
    /// `max_bytes` if the physical line exceeded it.
    pub text: String,
    /// Exact number of file bytes this line consumed, terminator included —
    /// this is what the harvester's offset advances by, truncation or not.
    pub raw_len: u64,
    pub truncated: bool,
}

pub struct LineFramer {
    encoding: &'static Encoding,
    terminator: Vec<u8>,
    max_bytes: usize,
    buffer: Vec<u8>,
}

impl LineFramer {
    pub fn new(encoding: &'static Encoding, terminator: &str, max_bytes: usize) -> Self {
        Self {
            encoding,
            terminator: terminator.as_bytes().to_vec(),
            max_bytes,
            buffer: Vec::new(),
        }
    }

    /// Appends newly read bytes and extracts every complete line now
    /// available. Incomplete trailing bytes stay buffered for the next
    /// call.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<RawLine> {
        self.buffer.extend_from_slice(bytes);
        let mut lines = Vec::new();

        loop {
            let Some(pos) = find_subslice(&self.buffer, &self.terminator) else {
                break;
            };
            let raw_len = (pos + self.terminator.len()) as u64;
            let line_bytes: Vec<u8> = self.buffer.drain(..pos + self.terminator.len()).collect();
            let content = &line_bytes[..pos];
            let (text, truncated) = self.decode_and_limit(content);
            lines.push(RawLine { text, raw_len, truncated });
        }

        lines
    }

    fn decode_and_limit(&self, content: &[u8]) -> (String, bool) {
        let truncated = content.len() > self.max_bytes;
        let slice = if truncated { &content[..self.max_bytes] } else { content };
        let (text, _, _) = self.encoding.decode(slice);
        (text.into_owned(), truncated)
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

#[cfg(test)]
#[path = "line_framer_tests.rs"]
mod tests;
