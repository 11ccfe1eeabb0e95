// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The prospector's event-to-lifecycle translation (spec §4.3).

use crate::error::ProspectorError;
use crate::group::HarvesterGroup;
use crate::identifier_factory::build_identifier;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tailer_config::TailerConfig;
use tailer_core::identity::{Identifier, IdentifierKind, IdentityKey, Source};
use tailer_core::{CursorRecord, FileInfo, FsEvent};
use tailer_state::StateRecord;
use tailer_state::StateStore;
use tailer_watcher::Watcher;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

pub struct Prospector {
    identifier: Box<dyn Identifier>,
    state: Arc<StateStore>,
    group: Arc<HarvesterGroup>,
    config: Arc<TailerConfig>,
}

impl Prospector {
    pub fn new(config: Arc<TailerConfig>, state: Arc<StateStore>, group: Arc<HarvesterGroup>) -> Self {
        let identifier = build_identifier(&config.file_identity);
        Self { identifier, state, group, config }
    }

    /// Purges the state store before the run loop starts (spec §4.3
    /// "Init"). Malformed WAL entries never make it into memory in the
    /// first place — the WAL's own corruption-rotation handles that case
    /// at `StateStore::open` — so this only has the other two sweeps to
    /// perform.
    pub async fn init(&self) -> Result<(), ProspectorError> {
        if self.config.clean_removed {
            let removed = self.state.clean_if(|_, record| !record.cursor.source_path.exists())?;
            for key in removed {
                debug!(key = %key, "removed state record for vanished source path at init");
            }
        }

        let target_kind = self.identifier.kind();
        self.state.update_identifiers(|_key, record| {
            if record.cursor.identifier_name == target_kind {
                return None;
            }
            recompute_identity(self.identifier.as_ref(), &record.cursor)
        })?;

        Ok(())
    }

    /// Drives the run loop: pulls events from `watcher` until it observes
    /// `FsEvent::Done`.
    pub async fn run(&self, mut watcher: Watcher) -> Result<(), ProspectorError> {
        self.init().await?;
        while let Some(event) = watcher.next_event().await {
            if matches!(event, FsEvent::Done) {
                break;
            }
            if let Err(err) = self.handle_event(event).await {
                warn!(error = %err, "prospector failed to handle event, continuing");
            }
        }
        Ok(())
    }

    async fn handle_event(&self, event: FsEvent) -> Result<(), ProspectorError> {
        match event {
            FsEvent::Create { path, info } => self.handle_create_or_write(path, info, true).await,
            FsEvent::Write { path, info } => self.handle_create_or_write(path, info, false).await,
            FsEvent::Delete { path, info } => self.handle_delete(path, info),
            FsEvent::Rename { old_path, new_path, info } => self.handle_rename(old_path, new_path, info).await,
            FsEvent::Done => Ok(()),
        }
    }

    async fn handle_create_or_write(&self, path: std::path::PathBuf, info: FileInfo, check_ignore_older: bool) -> Result<(), ProspectorError> {
        if check_ignore_older && tailer_config::is_ignored_older(info.mtime, SystemTime::now(), self.config.ignore_older) {
            debug!(path = %path.display(), "dropping file older than ignore_older");
            return Ok(());
        }

        let Some(source) = self.resolve_source(&path, &info).await? else {
            debug!(path = %path.display(), "identity deferred, waiting for more bytes");
            return Ok(());
        };

        self.ensure_record(&source, &info)?;
        self.group.start(source)
    }

    fn handle_delete(&self, path: std::path::PathBuf, info: FileInfo) -> Result<(), ProspectorError> {
        // `Delete` never carries enough live file state for fingerprinting
        // (the file is gone); os/path identity don't need file content, so
        // resolving those directly is sufficient. Under `fingerprint`
        // identity the key can't be recomputed post-deletion, so the record
        // is instead found by its (identifier-independent) OS identity.
        let key = if self.identifier.fingerprint_bytes() > 0 {
            self.state.find_key_by_os_identity(info.os_identity)
        } else {
            self.identifier.source_of(&path, &info, None).map(|source| source.identity_key)
        };
        let Some(key) = key else {
            return Ok(());
        };
        self.finish_delete(&key)
    }

    fn finish_delete(&self, key: &IdentityKey) -> Result<(), ProspectorError> {
        if self.config.clean_removed {
            self.state.remove(key)?;
        }
        if self.config.close.on_state_change.removed {
            self.group.stop(key);
        }
        Ok(())
    }

    async fn handle_rename(&self, old_path: std::path::PathBuf, new_path: std::path::PathBuf, info: FileInfo) -> Result<(), ProspectorError> {
        if self.identifier.kind() == IdentifierKind::Path {
            let old_key: IdentityKey = std::sync::Arc::from(old_path.to_string_lossy().as_ref());
            self.group.stop(&old_key);
            self.state.remove(&old_key)?;

            let Some(source) = self.resolve_source(&new_path, &info).await? else {
                return Ok(());
            };
            self.ensure_record(&source, &info)?;
            return self.group.start(source);
        }

        let Some(source) = self.resolve_source(&new_path, &info).await? else {
            return Ok(());
        };
        if let Some(mut record) = self.state.find_meta(&source.identity_key) {
            record.cursor.source_path = new_path.clone();
            self.state.update_meta(&source.identity_key, record)?;
            info!(old = %old_path.display(), new = %new_path.display(), "rename under non-path identity, harvester undisturbed");
        } else {
            self.ensure_record(&source, &info)?;
            self.group.start(source)?;
        }
        Ok(())
    }

    fn ensure_record(&self, source: &Source, info: &FileInfo) -> Result<(), ProspectorError> {
        if self.state.find_meta(&source.identity_key).is_some() {
            return Ok(());
        }
        let cursor = CursorRecord::new(source.current_path.clone(), info.os_identity, source.identifier_name);
        self.state.insert(source.identity_key.clone(), StateRecord::new(cursor))?;
        Ok(())
    }

    async fn resolve_source(&self, path: &Path, info: &FileInfo) -> Result<Option<Source>, ProspectorError> {
        let n = self.identifier.fingerprint_bytes();
        let head = if n > 0 { Some(read_head(path, n).await?) } else { None };
        Ok(self.identifier.source_of(path, info, head.as_deref()))
    }
}

/// Reads up to `n` leading bytes of `path`, returning fewer if the file is
/// shorter (the fingerprint strategy treats that as "not enough yet").
async fn read_head(path: &Path, n: usize) -> std::io::Result<Vec<u8>> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut buf = vec![0u8; n];
    let mut total = 0;
    while total < n {
        let read = file.read(&mut buf[total..]).await?;
        if read == 0 {
            break;
        }
        total += read;
    }
    buf.truncate(total);
    Ok(buf)
}

/// Synchronous recompute used only from `update_identifiers`'s closure at
/// init, which is not async. One-time cost at startup, not the hot path.
fn recompute_identity(identifier: &dyn Identifier, cursor: &CursorRecord) -> Option<IdentityKey> {
    let metadata = std::fs::metadata(&cursor.source_path).ok()?;
    let info = FileInfo::from_metadata(&metadata).ok()?;
    let n = identifier.fingerprint_bytes();
    let head = if n > 0 {
        use std::io::Read;
        let mut file = std::fs::File::open(&cursor.source_path).ok()?;
        let mut buf = vec![0u8; n];
        let mut total = 0;
        while total < n {
            let read = file.read(&mut buf[total..]).ok()?;
            if read == 0 {
                break;
            }
            total += read;
        }
        buf.truncate(total);
        Some(buf)
    } else {
        None
    };
    identifier.identify(&cursor.source_path, &info, head.as_deref())
}

#[cfg(test)]
#[path = "prospector_tests.rs"]
mod tests;
