// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProspectorError {
    #[error(transparent)]
    State(#[from] tailer_state::StateError),

    #[error("i/o error resolving identity: {0}")]
    Io(#[from] std::io::Error),

    #[error("harvester group registry is closed")]
    RegistryClosed,
}
