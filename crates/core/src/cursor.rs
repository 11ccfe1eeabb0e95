// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cursor / persisted state record (spec §3 `Cursor / State`, §6
//! "Persistent state").

use crate::file_info::OsIdentity;
use crate::identity::IdentifierKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The exact set of fields spec §6 allows in the persistent store: no more,
/// no less (implementations may add opaque bookkeeping, but the state store
/// in this workspace does not need to).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorRecord {
    pub source_path: PathBuf,
    pub offset: u64,
    pub os_identity: OsIdentity,
    pub identifier_name: IdentifierKind,
}

impl CursorRecord {
    pub fn new(source_path: PathBuf, os_identity: OsIdentity, identifier_name: IdentifierKind) -> Self {
        Self {
            source_path,
            offset: 0,
            os_identity,
            identifier_name,
        }
    }
}

/// Carried from the harvester to the publisher, then from the publisher's
/// ACK back to the state store (spec §4.4 "Publish contract").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorUpdate {
    pub new_offset: u64,
}
