// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The full decoding pipeline a harvester runs each line through (spec
//! §4.4 "Decoding pipeline"): line framing, optional JSON parsing, optional
//! multiline joining, include/exclude line filtering, a final byte limit,
//! and the empty-line drop.
//!
//! JSON parsing and line filtering both run per physical line, before any
//! multiline grouping — matching the upstream reader stack this was
//! modeled on, where readers compose outside-in with multiline as the
//! outermost layer. A multiline group inherits its published fields
//! (`decoded_fields`, `@timestamp` override, document id) from whichever
//! physical line started the group, since that's conventionally the
//! "header" line (e.g. a stack trace's first line) carrying the real
//! metadata.

mod json;
mod line_framer;
mod multiline;

pub use json::{parse_line, JsonParsed};
pub use line_framer::{LineFramer, RawLine};
pub use multiline::{FlushedMessage, JoinedLine, MultilineJoiner};

use regex::Regex;
use serde_json::Map;
use std::time::SystemTime;
use tailer_config::{JsonConfig, MultilineConfig, TailerConfig};
use tailer_core::Message;

/// A fully decoded message plus the document id pulled from its JSON body,
/// if configured (spec §4.4, §6 `_id`).
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub message: Message,
    pub doc_id: Option<String>,
}

#[derive(Default, Clone)]
struct LineMeta {
    fields: Map<String, serde_json::Value>,
    timestamp_override: Option<SystemTime>,
    doc_id: Option<String>,
}

pub struct DecodePipeline {
    framer: LineFramer,
    json_config: Option<JsonConfig>,
    multiline: Option<MultilineJoiner>,
    include_lines: Vec<Regex>,
    exclude_lines: Vec<Regex>,
    max_bytes: usize,
    current_group_meta: LineMeta,
}

impl DecodePipeline {
    pub fn new(config: &TailerConfig) -> Result<Self, regex::Error> {
        let reader = &config.reader;
        let encoding =
            encoding_rs::Encoding::for_label(reader.encoding.as_bytes()).unwrap_or(encoding_rs::UTF_8);
        let framer = LineFramer::new(encoding, &reader.line_terminator, reader.max_bytes);

        let include_lines = compile_all(&config.include_lines)?;
        let exclude_lines = compile_all(&config.exclude_lines)?;
        let multiline = config.multiline.as_ref().map(build_joiner).transpose()?;

        Ok(Self {
            framer,
            json_config: config.json.clone().filter(|j| j.enabled),
            multiline,
            include_lines,
            exclude_lines,
            max_bytes: reader.max_bytes,
            current_group_meta: LineMeta::default(),
        })
    }

    /// Feeds newly read file bytes through the pipeline. `now` supplies the
    /// wall-clock timestamp for any message whose JSON body carries no
    /// `@timestamp` override.
    pub fn feed(&mut self, bytes: &[u8], now: SystemTime) -> Vec<Decoded> {
        let raw_lines = self.framer.feed(bytes);
        self.process_lines(raw_lines, now)
    }

    /// Forces out any multiline group still open. Called on harvester
    /// shutdown and on multiline timeout.
    ///
    /// Deliberately does *not* force out an unterminated trailing physical
    /// line sitting in the line framer's buffer: those bytes were never
    /// counted into the advanced offset, so leaving them buffered (to be
    /// discarded along with this pipeline instance) is what lets the next
    /// harvester generation re-read and reconstruct the same line from
    /// scratch instead of the line being split across two published
    /// messages (spec §5).
    pub fn flush(&mut self, now: SystemTime) -> Vec<Decoded> {
        let mut decoded = Vec::new();
        if let Some(joiner) = self.multiline.as_mut() {
            if let Some(flushed) = joiner.flush() {
                let meta = std::mem::take(&mut self.current_group_meta);
                if let Some(message) = self.finish(flushed.text, flushed.raw_len, meta, now) {
                    decoded.push(message);
                }
            }
        }
        decoded
    }

    /// Absolute instant at which an open multiline group should be
    /// force-flushed, if one is open and a timeout is configured. The
    /// harvester folds this into its own closure deadline so a stalled
    /// continuation group doesn't sit held forever between reads.
    pub fn multiline_deadline(&self) -> Option<std::time::Instant> {
        self.multiline.as_ref().and_then(|joiner| joiner.deadline())
    }

    /// True when an open multiline group has outlived its timeout and
    /// should be force-flushed without closing the harvester itself.
    pub fn multiline_timed_out(&self, now: std::time::Instant) -> bool {
        self.multiline.as_ref().is_some_and(|joiner| joiner.timed_out(now))
    }

    fn process_lines(&mut self, raw_lines: Vec<RawLine>, now: SystemTime) -> Vec<Decoded> {
        let mut out = Vec::new();
        for raw in raw_lines {
            let (text, line_meta) = self.parse_json(&raw.text);
            if !self.matches_filters(&text) {
                continue;
            }

            let Some(joiner) = self.multiline.as_mut() else {
                if let Some(message) = self.finish(text, raw.raw_len, line_meta, now) {
                    out.push(message);
                }
                continue;
            };

            let was_empty = joiner.is_empty();
            if was_empty {
                self.current_group_meta = line_meta.clone();
            }

            let flushed = joiner.feed(JoinedLine { text, raw_len: raw.raw_len });
            if let Some(flushed) = flushed {
                let closed_group_meta = std::mem::replace(&mut self.current_group_meta, LineMeta::default());
                if let Some(message) = self.finish(flushed.text, flushed.raw_len, closed_group_meta, now) {
                    out.push(message);
                }
                // A non-empty buffer after the flush means this line both
                // closed the old group and opened a new one.
                if !joiner.is_empty() {
                    self.current_group_meta = line_meta;
                }
            }
        }
        out
    }

    fn parse_json(&self, text: &str) -> (String, LineMeta) {
        let Some(config) = &self.json_config else {
            return (text.to_string(), LineMeta::default());
        };
        let parsed = parse_line(config, text);
        let meta = LineMeta {
            fields: parsed.fields,
            timestamp_override: parsed.timestamp_override,
            doc_id: parsed.doc_id,
        };
        (parsed.text, meta)
    }

    fn matches_filters(&self, text: &str) -> bool {
        if !self.include_lines.is_empty() && !self.include_lines.iter().any(|r| r.is_match(text)) {
            return false;
        }
        !self.exclude_lines.iter().any(|r| r.is_match(text))
    }

    /// Applies the final byte limit and drops empty lines before handing
    /// back a publishable message (spec §4.4 last two steps).
    fn finish(&self, text: String, raw_len: u64, meta: LineMeta, now: SystemTime) -> Option<Decoded> {
        if text.trim().is_empty() {
            return None;
        }
        let mut content = text.into_bytes();
        if content.len() > self.max_bytes {
            content.truncate(self.max_bytes);
        }
        let timestamp = meta.timestamp_override.unwrap_or(now);
        Some(Decoded {
            message: Message {
                timestamp,
                content,
                byte_length: raw_len as usize,
                decoded_fields: meta.fields,
            },
            doc_id: meta.doc_id,
        })
    }
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| Regex::new(p)).collect()
}

fn build_joiner(config: &MultilineConfig) -> Result<MultilineJoiner, regex::Error> {
    if let Some(count) = config.fixed_lines {
        return Ok(MultilineJoiner::fixed_lines(count, config.timeout));
    }
    if let Some(pattern) = &config.pattern {
        let regex = Regex::new(pattern)?;
        return Ok(MultilineJoiner::pattern(
            regex,
            config.negate,
            config.match_mode,
            config.max_lines,
            config.timeout,
        ));
    }
    // Neither set: a degenerate but allowed config (validation only
    // rejects setting both). Every line closes its own group immediately.
    Ok(MultilineJoiner::fixed_lines(1, config.timeout))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
