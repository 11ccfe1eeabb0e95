// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Harvester Group: a registry enforcing at-most-one live harvester
//! per identity (spec §4.5).
//!
//! Panic isolation falls out of `tokio::spawn` itself: a panicking task
//! resolves its `JoinHandle` to `Err`, which `HarvesterHandle::join`
//! already logs and swallows rather than propagating — no separate
//! `catch_unwind` boundary is needed on top of that.

use crate::error::ProspectorError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tailer_config::TailerConfig;
use tailer_core::identity::{IdentityKey, Source};
use tailer_core::Publisher;
use tailer_state::{StateError, StateStore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub struct HarvesterGroup {
    state: Arc<StateStore>,
    publisher: Arc<dyn Publisher>,
    config: Arc<TailerConfig>,
    cancel: CancellationToken,
    handles: Mutex<HashMap<IdentityKey, tailer_harvester::HarvesterHandle>>,
    closed: AtomicBool,
}

impl HarvesterGroup {
    pub fn new(state: Arc<StateStore>, publisher: Arc<dyn Publisher>, config: Arc<TailerConfig>, cancel: CancellationToken) -> Arc<Self> {
        Arc::new(Self {
            state,
            publisher,
            config,
            cancel,
            handles: Mutex::new(HashMap::new()),
            closed: AtomicBool::new(false),
        })
    }

    /// Starts a harvester for `source`. Idempotent: if one is already
    /// registered and still running for this identity, or the state-store
    /// lock is already held (e.g. a concurrent start lost the race), this
    /// returns `Ok` without starting a second one.
    ///
    /// A harvester that has already exited on its own (EOF-close,
    /// inactivity-close, hard-timeout-close, identity mismatch, any I/O
    /// error) does not count as "already registered": its stale entry is
    /// pruned first, so a later `Write`/`Create` for the same identity
    /// (e.g. the prospector reconciling after an identity mismatch, or the
    /// file being written to again after a close-on-eof/close-inactive
    /// exit) actually spawns a fresh harvester instead of being silently
    /// swallowed forever (spec §4.5, §7).
    pub fn start(&self, source: Source) -> Result<(), ProspectorError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(ProspectorError::RegistryClosed);
        }

        let mut handles = self.handles.lock();
        if let Some(existing) = handles.get(&source.identity_key) {
            if !existing.is_finished() {
                return Ok(());
            }
            handles.remove(&source.identity_key);
        }

        let resource = match self.state.lock(&source.identity_key) {
            Ok(resource) => resource,
            Err(StateError::AlreadyLocked(_)) => {
                debug!(key = %source.identity_key, "identity already locked, skipping start");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        info!(path = %source.current_path.display(), key = %source.identity_key, "starting harvester");
        let handle = tailer_harvester::spawn(
            source.clone(),
            resource,
            Arc::clone(&self.state),
            Arc::clone(&self.publisher),
            Arc::clone(&self.config),
            self.cancel.child_token(),
        );
        handles.insert(source.identity_key, handle);
        Ok(())
    }

    /// Stops the harvester for `key`, if one is registered. Fire-and-forget:
    /// the harvester flushes and exits on its own time; the lock releases
    /// when it does.
    pub fn stop(&self, key: &IdentityKey) {
        if let Some(handle) = self.handles.lock().remove(key) {
            handle.stop();
        }
    }

    /// Signals every registered harvester to stop and waits for them all to
    /// exit. After this returns, `start` refuses with `RegistryClosed`.
    pub async fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
        let handles: Vec<_> = self.handles.lock().drain().map(|(_, h)| h).collect();
        for handle in &handles {
            handle.stop();
        }
        for handle in handles {
            handle.join().await;
        }
    }

    pub fn is_running(&self, key: &IdentityKey) -> bool {
        self.handles.lock().get(key).is_some_and(|handle| !handle.is_finished())
    }
}

#[cfg(test)]
#[path = "group_tests.rs"]
mod tests;
