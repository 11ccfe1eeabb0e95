// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One scan tick: expand configured path patterns, apply the filter chain,
//! and diff against the prior snapshot (spec §4.1).

use crate::error::WatcherError;
use crate::glob_expand::expand_and_normalize;
use crate::snapshot::{diff, Snapshot};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use tailer_core::{FileInfo, FsEvent};
use tracing::debug;

pub struct ScannerConfig {
    pub paths: Vec<String>,
    pub exclude_files: Vec<Regex>,
    pub recursive_glob: bool,
    pub symlinks: bool,
}

pub struct Scanner {
    config: ScannerConfig,
    previous: Snapshot,
}

impl Scanner {
    pub fn new(config: ScannerConfig) -> Self {
        Self {
            config,
            previous: Snapshot::new(),
        }
    }

    /// Runs one scan tick, returning the events synthesized against the
    /// prior tick's snapshot. The prior snapshot is only replaced once this
    /// call returns `Ok`, matching spec §4.1's "failure semantics".
    pub fn scan_once(&mut self) -> Result<Vec<FsEvent>, WatcherError> {
        let snapshot = self.take_snapshot()?;
        let events = diff(&self.previous, &snapshot);
        self.previous = snapshot;
        Ok(events)
    }

    fn take_snapshot(&self) -> Result<Snapshot, WatcherError> {
        let mut snapshot = Snapshot::new();
        let mut accepted_identities = HashSet::new();

        for pattern in &self.config.paths {
            let matches = match expand_and_normalize(pattern, self.config.recursive_glob) {
                Ok(matches) => matches,
                Err(err) => {
                    debug!(pattern, error = %err, "skipping unreadable glob pattern for this tick");
                    continue;
                }
            };

            for path in matches {
                if let Some(info) = self.accept(&path, &mut accepted_identities) {
                    snapshot.insert(path, info);
                }
            }
        }

        Ok(snapshot)
    }

    /// Applies the filter chain from spec §4.1 step 2 to one matched path,
    /// returning its `FileInfo` if it should be included in this tick's
    /// snapshot.
    fn accept(&self, path: &Path, accepted_identities: &mut HashSet<tailer_core::OsIdentity>) -> Option<FileInfo> {
        let path_str = path.to_string_lossy();
        if self.config.exclude_files.iter().any(|re| re.is_match(&path_str)) {
            debug!(path = %path_str, "excluded by exclude_files");
            return None;
        }

        let lstat = match std::fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(err) => {
                debug!(path = %path_str, error = %err, "lstat failed, skipping for this tick");
                return None;
            }
        };
        if lstat.is_dir() {
            return None;
        }

        let is_symlink = lstat.file_type().is_symlink();
        if is_symlink && !self.config.symlinks {
            debug!(path = %path_str, "symlink skipped: scanner.symlinks is disabled");
            return None;
        }

        let stat = match std::fs::metadata(path) {
            Ok(meta) => meta,
            Err(err) => {
                debug!(path = %path_str, error = %err, "stat failed, skipping for this tick");
                return None;
            }
        };
        let info = match FileInfo::from_metadata(&stat) {
            Ok(info) => info,
            Err(err) => {
                debug!(path = %path_str, error = %err, "failed to read mtime, skipping for this tick");
                return None;
            }
        };

        if self.config.symlinks && !accepted_identities.insert(info.os_identity) {
            debug!(path = %path_str, "duplicate of an already-accepted symlink target, skipping");
            return None;
        }

        Some(info)
    }
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
