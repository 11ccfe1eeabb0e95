// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The configuration keys recognized in spec §6, as a serde schema.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ScannerConfig {
    #[serde(with = "humantime_serde")]
    pub check_interval: Duration,
    pub symlinks: bool,
    pub recursive_glob: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(10),
            symlinks: false,
            recursive_glob: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct OnStateChangeConfig {
    pub removed: bool,
    pub renamed: bool,
    pub inactive: bool,
    #[serde(with = "humantime_serde")]
    pub check_interval: Duration,
}

impl Default for OnStateChangeConfig {
    fn default() -> Self {
        Self {
            removed: true,
            renamed: false,
            inactive: false,
            check_interval: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ReaderCloseConfig {
    pub on_eof: bool,
    #[serde(with = "humantime_serde")]
    pub after_interval: Option<Duration>,
}

impl Default for ReaderCloseConfig {
    fn default() -> Self {
        Self {
            on_eof: false,
            after_interval: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CloseConfig {
    pub on_state_change: OnStateChangeConfig,
    pub reader: ReaderCloseConfig,
}

impl Default for CloseConfig {
    fn default() -> Self {
        Self {
            on_state_change: OnStateChangeConfig::default(),
            reader: ReaderCloseConfig::default(),
        }
    }
}

/// `file_identity` strategy selection (spec §4.2, §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum FileIdentityConfig {
    Os,
    Path,
    Fingerprint {
        #[serde(default = "default_fingerprint_bytes")]
        bytes: usize,
    },
}

fn default_fingerprint_bytes() -> usize {
    1024
}

impl Default for FileIdentityConfig {
    fn default() -> Self {
        FileIdentityConfig::Os
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BackoffConfig {
    #[serde(with = "humantime_serde")]
    pub init: Duration,
    #[serde(with = "humantime_serde")]
    pub max: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            init: Duration::from_millis(1000),
            max: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ReaderConfig {
    pub encoding: String,
    pub line_terminator: String,
    pub buffer_size: usize,
    pub max_bytes: usize,
    pub backoff: BackoffConfig,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            encoding: "utf-8".to_string(),
            line_terminator: "\n".to_string(),
            buffer_size: 16 * 1024,
            max_bytes: 10 * 1024 * 1024,
            backoff: BackoffConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultilineMatch {
    Before,
    After,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MultilineConfig {
    pub pattern: Option<String>,
    pub negate: bool,
    #[serde(rename = "match")]
    pub match_mode: MultilineMatch,
    pub max_lines: Option<usize>,
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,
    /// Fixed line-count aggregation, mutually exclusive with `pattern`.
    pub fixed_lines: Option<usize>,
}

impl Default for MultilineConfig {
    fn default() -> Self {
        Self {
            pattern: None,
            negate: false,
            match_mode: MultilineMatch::After,
            max_lines: Some(500),
            timeout: Some(Duration::from_secs(5)),
            fixed_lines: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct JsonConfig {
    pub enabled: bool,
    pub message_key: Option<String>,
    pub overwrite_keys: bool,
    pub add_error_key: bool,
    pub document_id: Option<String>,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            message_key: None,
            overwrite_keys: false,
            add_error_key: true,
            document_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct TailerConfigSchema {
    pub paths: Vec<String>,
    pub exclude_files: Vec<String>,
    pub scanner: ScannerConfig,
    #[serde(with = "humantime_serde")]
    pub ignore_older: Option<Duration>,
    pub clean_removed: bool,
    pub close: CloseConfig,
    pub file_identity: FileIdentityConfig,
    pub reader: ReaderConfig,
    pub multiline: Option<MultilineConfig>,
    pub json: Option<JsonConfig>,
    pub include_lines: Vec<String>,
    pub exclude_lines: Vec<String>,
}

impl Default for TailerConfigSchema {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            exclude_files: Vec::new(),
            scanner: ScannerConfig::default(),
            ignore_older: None,
            clean_removed: false,
            close: CloseConfig::default(),
            file_identity: FileIdentityConfig::default(),
            reader: ReaderConfig::default(),
            multiline: None,
            json: None,
            include_lines: Vec::new(),
            exclude_lines: Vec::new(),
        }
    }
}
