// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `TailEngine`: wires the watcher, prospector, and state store into one
//! cancellable unit (SPEC_FULL §2).

use crate::error::EngineError;
use std::path::Path;
use std::sync::Arc;
use tailer_config::TailerConfig;
use tailer_core::Publisher;
use tailer_prospector::{HarvesterGroup, Prospector};
use tailer_state::StateStore;
use tailer_watcher::{ScannerConfig, Watcher};
use tokio_util::sync::CancellationToken;

pub struct TailEngine {
    config: Arc<TailerConfig>,
    state: Arc<StateStore>,
    group: Arc<HarvesterGroup>,
    cancel: CancellationToken,
}

impl TailEngine {
    /// Opens the state store at `state_path` (creating it if absent) and
    /// wires the harvester group against `publisher`. Configuration errors
    /// are expected to have already been surfaced by [`TailerConfig::load`]
    /// before this is called.
    pub fn new(config: TailerConfig, state_path: &Path, publisher: Arc<dyn Publisher>) -> Result<Self, EngineError> {
        let config = Arc::new(config);
        let state = StateStore::open(state_path)?;
        let cancel = CancellationToken::new();
        let group = HarvesterGroup::new(Arc::clone(&state), publisher, Arc::clone(&config), cancel.child_token());
        Ok(Self { config, state, group, cancel })
    }

    /// A clone of the engine's root cancellation token, for callers that
    /// want to cancel from outside (e.g. a signal handler).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The underlying state store, for callers that need to inspect
    /// persisted cursors directly (e.g. an integration test asserting on
    /// registry contents).
    pub fn state_store(&self) -> &Arc<StateStore> {
        &self.state
    }

    /// Drives the engine until cancelled: spawns the watcher and runs the
    /// prospector's event loop against it. Returns once the watcher has
    /// observed cancellation and emitted its `Done` sentinel.
    pub async fn run(&self) -> Result<(), EngineError> {
        let scanner_config = build_scanner_config(&self.config)?;
        let watcher = Watcher::spawn(scanner_config, self.config.scanner.check_interval, self.cancel.child_token());
        let prospector = Prospector::new(Arc::clone(&self.config), Arc::clone(&self.state), Arc::clone(&self.group));
        prospector.run(watcher).await?;
        Ok(())
    }

    /// Cancels the watcher/harvesters and waits for every live harvester to
    /// flush its decode pipeline and exit.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        self.group.shutdown().await;
    }
}

fn build_scanner_config(config: &TailerConfig) -> Result<ScannerConfig, EngineError> {
    let exclude_files = config
        .exclude_files
        .iter()
        .map(|pattern| {
            regex::Regex::new(pattern).map_err(|source| EngineError::BadExcludeRegex { pattern: pattern.clone(), source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ScannerConfig {
        paths: config.paths.clone(),
        exclude_files,
        recursive_glob: config.scanner.recursive_glob,
        symlinks: config.scanner.symlinks,
    })
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
