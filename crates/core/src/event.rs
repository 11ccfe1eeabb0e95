// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem events synthesized by the watcher (spec §3 `FSEvent`, §4.1).

use crate::file_info::FileInfo;
use std::path::PathBuf;

/// One filesystem change, as produced by the scanner's snapshot diff.
///
/// Modeled as a tagged enum rather than a single struct with optional
/// `old_path`/`new_path` fields: each variant only carries the fields that
/// make sense for it, which the type system then enforces at every call
/// site (spec §9 "dynamic dispatch ... maps cleanly to a tagged-variant").
#[derive(Debug, Clone, PartialEq)]
pub enum FsEvent {
    Create { path: PathBuf, info: FileInfo },
    Write { path: PathBuf, info: FileInfo },
    Rename {
        old_path: PathBuf,
        new_path: PathBuf,
        info: FileInfo,
    },
    Delete { path: PathBuf, info: FileInfo },
    /// Sentinel emitted once when the watcher's event stream ends
    /// (cancellation), per spec §4.3 run-loop table.
    Done,
}

impl FsEvent {
    /// The path a prospector should key a harvester lookup on, i.e. the most
    /// current path this event refers to. `None` for `Done`.
    pub fn current_path(&self) -> Option<&std::path::Path> {
        match self {
            FsEvent::Create { path, .. } | FsEvent::Write { path, .. } | FsEvent::Delete { path, .. } => {
                Some(path)
            }
            FsEvent::Rename { new_path, .. } => Some(new_path),
            FsEvent::Done => None,
        }
    }

    pub fn info(&self) -> Option<&FileInfo> {
        match self {
            FsEvent::Create { info, .. }
            | FsEvent::Write { info, .. }
            | FsEvent::Rename { info, .. }
            | FsEvent::Delete { info, .. } => Some(info),
            FsEvent::Done => None,
        }
    }
}
