// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recursive-glob (`**`) expansion and path normalization (spec §4.1 step 1).
//!
//! Rust's `glob` crate has no native `**` support, so a pattern containing
//! it is expanded here into one concrete pattern per depth from 0 up to
//! [`RECURSIVE_GLOB_DEPTH`], each `**` replaced by that many literal `*`
//! path segments — the same trick the original Go implementation's
//! `file.GlobPatterns` helper uses.

use crate::error::WatcherError;
use std::path::{Path, PathBuf};

pub const RECURSIVE_GLOB_DEPTH: usize = 8;

/// Expands one `**`-bearing pattern into depth-bounded concrete patterns. A
/// pattern without `**`, or when `recursive` is false, passes through
/// unchanged.
pub fn expand_recursive_glob(pattern: &str, recursive: bool) -> Vec<String> {
    if !recursive {
        return vec![pattern.to_string()];
    }
    let Some(idx) = pattern.find("**") else {
        return vec![pattern.to_string()];
    };

    let before = pattern[..idx].trim_end_matches('/');
    let after = pattern[idx + 2..].trim_start_matches('/');

    (0..=RECURSIVE_GLOB_DEPTH)
        .map(|depth| {
            let mut segments = Vec::with_capacity(depth + 2);
            segments.push(before.to_string());
            segments.extend(std::iter::repeat("*".to_string()).take(depth));
            if !after.is_empty() {
                segments.push(after.to_string());
            }
            segments.join("/")
        })
        .collect()
}

/// Normalizes `pattern` to an absolute path string, relative to the current
/// working directory when it isn't already absolute. Does not touch the
/// filesystem beyond reading the cwd — the pattern need not resolve to any
/// existing file.
pub fn normalize_pattern(pattern: &str) -> Result<String, WatcherError> {
    let path = Path::new(pattern);
    if path.is_absolute() {
        return Ok(pattern.to_string());
    }
    let cwd = std::env::current_dir().map_err(|source| WatcherError::Cwd {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(cwd.join(path).to_string_lossy().into_owned())
}

/// Expands `pattern`'s recursive globs, normalizes each to an absolute path,
/// and parses them into [`glob::Pattern`]s ready for matching.
pub fn expand_and_normalize(pattern: &str, recursive: bool) -> Result<Vec<PathBuf>, WatcherError> {
    let mut results = Vec::new();
    for expanded in expand_recursive_glob(pattern, recursive) {
        let normalized = normalize_pattern(&expanded)?;
        for entry in glob::glob(&normalized).map_err(|source| WatcherError::Pattern {
            pattern: normalized.clone(),
            source,
        })? {
            if let Ok(path) = entry {
                results.push(path);
            }
            // lstat/glob errors on individual entries are skipped, not
            // fatal to the scan (spec §4.1 "Failure semantics").
        }
    }
    Ok(results)
}
