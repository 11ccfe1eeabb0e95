// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use tailer_core::OsIdentity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarvesterError {
    #[error("i/o error harvesting {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} is not a regular file")]
    NotRegularFile { path: PathBuf },

    #[error("identity mismatch on {path:?}: expected {expected}, found {found}")]
    IdentityMismatch {
        path: PathBuf,
        expected: OsIdentity,
        found: OsIdentity,
    },

    #[error("publish failed for {path:?}: {message}")]
    Publish { path: PathBuf, message: String },

    #[error("no state record found for {path:?}")]
    MissingRecord { path: PathBuf },

    #[error("invalid decode pipeline configuration: {0}")]
    InvalidPipeline(#[from] regex::Error),

    #[error(transparent)]
    State(#[from] tailer_state::StateError),
}
