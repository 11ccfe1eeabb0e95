// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the state store (spec §4.6, §7).

use crate::wal::WalError;
use tailer_core::identity::IdentityKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("i/o error on state store: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Wal(#[from] WalError),

    #[error("malformed state record for {0:?}: {1}")]
    Corrupt(IdentityKey, serde_json::Error),

    #[error("no record for identity {0:?}")]
    NotFound(IdentityKey),

    #[error("identity {0:?} is already locked")]
    AlreadyLocked(IdentityKey),
}
