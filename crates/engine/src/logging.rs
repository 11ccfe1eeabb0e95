// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tracing-subscriber` init for the `taild` binary (SPEC_FULL §4.8).

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a registry subscriber with an env-filter layer, defaulting to
/// `info` for this crate's dependents when `RUST_LOG` isn't set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "tailer=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
