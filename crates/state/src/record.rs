// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The record shape held in the state store: spec §6's persistent fields
//! (`source_path`, `offset`, `os_identity`, `identifier_name`) plus the TTL
//! deadline, which is bookkeeping the store is explicitly allowed to add.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use tailer_core::CursorRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub cursor: CursorRecord,
    #[serde(with = "tailer_core::rfc3339::option")]
    pub ttl_deadline: Option<SystemTime>,
}

impl StateRecord {
    pub fn new(cursor: CursorRecord) -> Self {
        Self {
            cursor,
            ttl_deadline: None,
        }
    }
}
