// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds the configured [`Identifier`] strategy (spec §4.2).

use tailer_config::FileIdentityConfig;
use tailer_core::identity::{FingerprintIdentifier, Identifier, OsIdentifier, PathIdentifier};

pub fn build_identifier(config: &FileIdentityConfig) -> Box<dyn Identifier> {
    match config {
        FileIdentityConfig::Os => Box::new(OsIdentifier),
        FileIdentityConfig::Path => Box::new(PathIdentifier),
        FileIdentityConfig::Fingerprint { bytes } => Box::new(FingerprintIdentifier::new(*bytes)),
    }
}
