// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error variants used across the engine's crates.

use thiserror::Error;

/// Errors raised by the data-model/identity layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The OS identity observed on open does not match the one recorded in
    /// the cursor handed to the harvester. See spec §4.4 step 2.
    #[error("identity mismatch for {path}: expected {expected}, found {found}")]
    IdentityMismatch {
        path: std::path::PathBuf,
        expected: String,
        found: String,
    },

    /// Wraps an I/O failure encountered while computing identity (e.g.
    /// reading fingerprint bytes).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
