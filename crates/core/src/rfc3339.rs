// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Serde helpers for `SystemTime <-> RFC3339`, used wherever the spec calls
//! for an RFC3339 wall-clock timestamp (spec §3 `Message.timestamp`, §6
//! `Outputs.timestamp`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::SystemTime;

pub fn serialize<S: Serializer>(value: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
    humantime::format_rfc3339(*value).to_string().serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SystemTime, D::Error> {
    let s = String::deserialize(deserializer)?;
    humantime::parse_rfc3339(&s).map_err(serde::de::Error::custom)
}

/// The same `SystemTime <-> RFC3339` mapping, for `Option<SystemTime>` fields
/// such as a TTL deadline that may be unset.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<SystemTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => serializer.serialize_some(&humantime::format_rfc3339(*t).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<SystemTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| humantime::parse_rfc3339(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
