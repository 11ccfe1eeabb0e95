// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level error type: only configuration errors abort engine startup
//! (spec §7); everything downstream is recoverable and logged in place.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] tailer_config::ConfigError),

    #[error(transparent)]
    State(#[from] tailer_state::StateError),

    #[error(transparent)]
    Prospector(#[from] tailer_prospector::ProspectorError),

    #[error("invalid exclude_files regex {pattern:?}: {source}")]
    BadExcludeRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
