// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decoded line (`Message`) and the published envelope (`Event` / spec §3,
//! §6).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::SystemTime;

/// One line's worth of data plus framing overhead, after the decoding
/// pipeline (spec §3 `Message`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(with = "crate::rfc3339")]
    pub timestamp: SystemTime,
    pub content: Vec<u8>,
    pub byte_length: usize,
    #[serde(default)]
    pub decoded_fields: serde_json::Map<String, serde_json::Value>,
}

impl Message {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

/// What is handed to the publisher (spec §3 `Event`, §6 Outputs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailEvent {
    #[serde(with = "crate::rfc3339")]
    pub timestamp: SystemTime,
    #[serde(rename = "log.file.path")]
    pub path: PathBuf,
    #[serde(rename = "log.offset")]
    pub offset_before: u64,
    pub message: String,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub fields: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
}
