// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observed filesystem attributes (spec §3 `FileInfo`).

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// OS-level identity tuple: device ID + inode (or the platform equivalent).
///
/// Two observations denote the same underlying file iff this tuple matches,
/// independent of path. Stable across renames; not defended against inode
/// reuse after deletion (see SPEC_FULL §9.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OsIdentity {
    pub device: u64,
    pub inode: u64,
}

impl OsIdentity {
    pub fn new(device: u64, inode: u64) -> Self {
        Self { device, inode }
    }

    /// Key used by the `os-identity` strategy: `"{device}-{inode}"`.
    pub fn as_key(&self) -> String {
        format!("{}-{}", self.device, self.inode)
    }
}

impl std::fmt::Display for OsIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

#[cfg(unix)]
pub fn os_identity_of(metadata: &std::fs::Metadata) -> OsIdentity {
    use std::os::unix::fs::MetadataExt;
    OsIdentity::new(metadata.dev(), metadata.ino())
}

#[cfg(not(unix))]
pub fn os_identity_of(metadata: &std::fs::Metadata) -> OsIdentity {
    // No stable device+inode tuple on non-unix targets; fall back to a
    // constant so path-identity/fingerprint remain usable even though
    // os-identity degrades to "everything is the same file".
    let _ = metadata;
    OsIdentity::new(0, 0)
}

/// Immutable snapshot of one observation of a path (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub size: u64,
    #[serde(with = "crate::rfc3339")]
    pub mtime: SystemTime,
    pub os_identity: OsIdentity,
}

impl FileInfo {
    pub fn from_metadata(metadata: &std::fs::Metadata) -> std::io::Result<Self> {
        Ok(Self {
            size: metadata.len(),
            mtime: metadata.modified()?,
            os_identity: os_identity_of(metadata),
        })
    }

    /// `same_file` predicate used by the watcher to bind a deletion to a
    /// creation when the OS identity matches (spec §4.1 event synthesis).
    pub fn same_file(&self, other: &FileInfo) -> bool {
        self.os_identity == other.os_identity
    }
}
