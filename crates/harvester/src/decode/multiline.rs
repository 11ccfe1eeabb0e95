// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline stage 5: optional multiline joining, either regex-pattern-based
//! (`before`/`after` glue) or fixed line-count aggregation, with a timeout
//! flush (spec §4.4).

use regex::Regex;
use std::time::{Duration, Instant};
use tailer_config::MultilineMatch;

pub struct JoinedLine {
    pub text: String,
    pub raw_len: u64,
}

enum Mode {
    Pattern { pattern: Regex, negate: bool, match_mode: MultilineMatch },
    FixedLines(usize),
}

pub struct MultilineJoiner {
    mode: Mode,
    max_lines: Option<usize>,
    timeout: Option<Duration>,
    buffer: Vec<JoinedLine>,
    started_at: Option<Instant>,
}

pub struct FlushedMessage {
    pub text: String,
    pub raw_len: u64,
}

impl MultilineJoiner {
    pub fn pattern(pattern: Regex, negate: bool, match_mode: MultilineMatch, max_lines: Option<usize>, timeout: Option<Duration>) -> Self {
        Self {
            mode: Mode::Pattern { pattern, negate, match_mode },
            max_lines,
            timeout,
            buffer: Vec::new(),
            started_at: None,
        }
    }

    pub fn fixed_lines(count: usize, timeout: Option<Duration>) -> Self {
        Self {
            mode: Mode::FixedLines(count),
            max_lines: None,
            timeout,
            buffer: Vec::new(),
            started_at: None,
        }
    }

    /// Feeds one physical line. Returns a completed message if this line's
    /// arrival closed out the previous one (the new line itself is then
    /// buffered as the start of the next message).
    pub fn feed(&mut self, line: JoinedLine) -> Option<FlushedMessage> {
        let belongs_to_current = self.belongs_to_current(&line.text);

        if self.buffer.is_empty() {
            self.push(line);
            return None;
        }

        if belongs_to_current {
            self.push(line);
            if self.at_capacity() {
                return self.flush();
            }
            return None;
        }

        let flushed = self.flush();
        self.push(line);
        flushed
    }

    /// Forces out whatever is buffered, e.g. on harvester shutdown or
    /// multiline timeout.
    pub fn flush(&mut self) -> Option<FlushedMessage> {
        if self.buffer.is_empty() {
            return None;
        }
        self.started_at = None;
        let lines = std::mem::take(&mut self.buffer);
        let raw_len = lines.iter().map(|l| l.raw_len).sum();
        let text = lines
            .into_iter()
            .map(|l| l.text)
            .collect::<Vec<_>>()
            .join("\n");
        Some(FlushedMessage { text, raw_len })
    }

    /// True when the buffered group has been open longer than the
    /// configured timeout and should be force-flushed.
    pub fn timed_out(&self, now: Instant) -> bool {
        match (self.timeout, self.started_at) {
            (Some(timeout), Some(started)) => now.duration_since(started) > timeout,
            _ => false,
        }
    }

    /// Absolute instant at which the currently held group should be
    /// force-flushed, if a group is open and a timeout is configured.
    pub fn deadline(&self) -> Option<Instant> {
        match (self.timeout, self.started_at) {
            (Some(timeout), Some(started)) => Some(started + timeout),
            _ => None,
        }
    }

    fn push(&mut self, line: JoinedLine) {
        if self.buffer.is_empty() {
            self.started_at = Some(Instant::now());
        }
        self.buffer.push(line);
    }

    fn at_capacity(&self) -> bool {
        matches!(self.max_lines, Some(max) if self.buffer.len() >= max)
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn belongs_to_current(&self, text: &str) -> bool {
        match &self.mode {
            Mode::FixedLines(count) => self.buffer.len() < *count,
            Mode::Pattern { pattern, negate, match_mode } => {
                let Some(last) = self.buffer.last() else {
                    return false;
                };
                let is_match = pattern.is_match(text) != *negate;
                match match_mode {
                    // `after`: a line continues the buffer when *it* matches
                    // the continuation pattern.
                    MultilineMatch::After => is_match,
                    // `before`: a line continues the buffer when the
                    // *previous* buffered line matched the pattern.
                    MultilineMatch::Before => pattern.is_match(&last.text) != *negate,
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "multiline_tests.rs"]
mod tests;
