// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot diffing: turns two `path -> FileInfo` maps into the `FSEvent`
//! stream the watcher emits (spec §4.1 "Event synthesis").

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tailer_core::{FileInfo, FsEvent};

/// A scan result: every matched path and its observed attributes, in
/// deterministic (lexicographic path) order — this order is what spec
/// §4.1's "scan iteration order" tie-break refers to.
pub type Snapshot = BTreeMap<PathBuf, FileInfo>;

/// Diffs `current` against `previous`, producing the events spec §4.1
/// defines. `previous` is the watcher's prior tick; callers replace it with
/// `current` only after a successful tick.
pub fn diff(previous: &Snapshot, current: &Snapshot) -> Vec<FsEvent> {
    let mut events = Vec::new();
    let mut consumed_creates: Vec<&Path> = Vec::new();

    for (path, info) in current {
        if let Some(prior_info) = previous.get(path) {
            if prior_info.mtime != info.mtime {
                events.push(FsEvent::Write {
                    path: path.clone(),
                    info: info.clone(),
                });
            }
        }
    }

    for (deleted_path, prior_info) in previous {
        if current.contains_key(deleted_path) {
            continue;
        }
        let rename_target = current.iter().find(|(new_path, new_info)| {
            !previous.contains_key(*new_path)
                && !consumed_creates.contains(&new_path.as_path())
                && prior_info.same_file(new_info)
        });
        match rename_target {
            Some((new_path, new_info)) => {
                consumed_creates.push(new_path.as_path());
                events.push(FsEvent::Rename {
                    old_path: deleted_path.clone(),
                    new_path: new_path.clone(),
                    info: new_info.clone(),
                });
            }
            None => {
                events.push(FsEvent::Delete {
                    path: deleted_path.clone(),
                    info: prior_info.clone(),
                });
            }
        }
    }

    for (path, info) in current {
        if previous.contains_key(path) || consumed_creates.contains(&path.as_path()) {
            continue;
        }
        events.push(FsEvent::Create {
            path: path.clone(),
            info: info.clone(),
        });
    }

    events
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
