// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("invalid glob pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to determine current directory to normalize {pattern:?}: {source}")]
    Cwd {
        pattern: String,
        #[source]
        source: std::io::Error,
    },
}
