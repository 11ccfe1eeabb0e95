// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File identifier strategies (spec §4.2).
//!
//! An identity key is a short opaque string denoting "the same logical
//! file" across observations. Cheap to clone (`Arc<str>`) since every
//! harvester, state-store record, and harvester-group entry carries one.

use crate::file_info::FileInfo;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub type IdentityKey = Arc<str>;

/// Which identifier strategy produced a given key. Persisted alongside the
/// cursor so the prospector can detect a configuration change at startup
/// (spec §4.3 Init, third bullet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    Os,
    Path,
    Fingerprint,
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            IdentifierKind::Os => "os",
            IdentifierKind::Path => "path",
            IdentifierKind::Fingerprint => "fingerprint",
        };
        write!(f, "{s}")
    }
}

/// The harvester's input: an identity plus the current path it was last
/// observed under (spec §3 `Source`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub identity_key: IdentityKey,
    pub current_path: PathBuf,
    pub identifier_name: IdentifierKind,
}

/// A strategy mapping a filesystem observation to a stable identity key.
///
/// `identify` must be pure given its inputs and must not perform I/O beyond
/// what the strategy requires (spec §4.2): `os`/`path` never need the head
/// bytes; `fingerprint` needs them and returns `None` (deferred) until at
/// least `fingerprint_bytes()` bytes are available.
pub trait Identifier: Send + Sync {
    fn kind(&self) -> IdentifierKind;

    /// Number of leading bytes this strategy needs to read before it can
    /// assign an identity. Zero for strategies that don't read file content.
    fn fingerprint_bytes(&self) -> usize {
        0
    }

    fn identify(&self, path: &Path, info: &FileInfo, head: Option<&[u8]>) -> Option<IdentityKey>;

    fn source_of(&self, path: &Path, info: &FileInfo, head: Option<&[u8]>) -> Option<Source> {
        self.identify(path, info, head).map(|identity_key| Source {
            identity_key,
            current_path: path.to_path_buf(),
            identifier_name: self.kind(),
        })
    }
}

/// `os-identity`: key = `"{device}-{inode}"`. Stable across renames and
/// path changes; vulnerable to inode reuse (spec §4.2, §9.3).
#[derive(Debug, Clone, Copy, Default)]
pub struct OsIdentifier;

impl Identifier for OsIdentifier {
    fn kind(&self) -> IdentifierKind {
        IdentifierKind::Os
    }

    fn identify(&self, _path: &Path, info: &FileInfo, _head: Option<&[u8]>) -> Option<IdentityKey> {
        Some(Arc::from(info.os_identity.as_key()))
    }
}

/// `path`: key = absolute path. Treats rename as delete-plus-create.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathIdentifier;

impl Identifier for PathIdentifier {
    fn kind(&self) -> IdentifierKind {
        IdentifierKind::Path
    }

    fn identify(&self, path: &Path, _info: &FileInfo, _head: Option<&[u8]>) -> Option<IdentityKey> {
        Some(Arc::from(path.to_string_lossy().as_ref()))
    }
}

/// `fingerprint`: key = hash of the first `n` bytes. Survives rename and
/// inode reuse but defers identity until the file has at least `n` bytes.
#[derive(Debug, Clone, Copy)]
pub struct FingerprintIdentifier {
    n: usize,
}

impl FingerprintIdentifier {
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

impl Identifier for FingerprintIdentifier {
    fn kind(&self) -> IdentifierKind {
        IdentifierKind::Fingerprint
    }

    fn fingerprint_bytes(&self) -> usize {
        self.n
    }

    fn identify(&self, _path: &Path, info: &FileInfo, head: Option<&[u8]>) -> Option<IdentityKey> {
        let head = head?;
        if (info.size as usize) < self.n || head.len() < self.n {
            return None;
        }
        let mut hasher = Sha256::new();
        hasher.update(&head[..self.n]);
        let digest = hasher.finalize();
        Some(Arc::from(hex_encode(&digest)))
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
