// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The state store (spec §4.6): a keyed, persistent map from identity key to
//! cursor record, with an advisory per-identity lock and a TTL used by
//! [`StateStore::clean_if`] at prospector init.

use crate::error::StateError;
use crate::record::StateRecord;
use crate::wal::{Wal, WalOp};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tailer_core::identity::IdentityKey;
use tailer_core::OsIdentity;
use tracing::debug;

pub struct StateStore {
    wal: Mutex<Wal>,
    entries: RwLock<HashMap<IdentityKey, StateRecord>>,
    locked: Mutex<HashSet<IdentityKey>>,
}

impl StateStore {
    /// Opens (creating if absent) the backing WAL at `path` and replays it
    /// into memory.
    pub fn open(path: &Path) -> Result<Arc<Self>, StateError> {
        let (wal, replayed) = Wal::open(path)?;
        let mut entries = HashMap::new();
        for entry in replayed {
            match entry.op {
                WalOp::Put { key, record } => {
                    entries.insert(key, record);
                }
                WalOp::Remove { key } => {
                    entries.remove(&key);
                }
            }
        }
        Ok(Arc::new(Self {
            wal: Mutex::new(wal),
            entries: RwLock::new(entries),
            locked: Mutex::new(HashSet::new()),
        }))
    }

    /// Inserts a freshly observed identity. Durable: the insert is on disk
    /// before this returns.
    pub fn insert(&self, key: IdentityKey, record: StateRecord) -> Result<(), StateError> {
        self.put_durable(key.clone(), record.clone())?;
        self.entries.write().insert(key, record);
        Ok(())
    }

    /// Acquires the advisory, exclusive, non-reentrant lock for `key`. The
    /// harvester holds the returned handle for its lifetime; dropping it
    /// releases the lock.
    pub fn lock(self: &Arc<Self>, key: &IdentityKey) -> Result<ResourceHandle, StateError> {
        let mut locked = self.locked.lock();
        if locked.contains(key) {
            return Err(StateError::AlreadyLocked(key.clone()));
        }
        locked.insert(key.clone());
        Ok(ResourceHandle {
            store: Arc::clone(self),
            key: key.clone(),
        })
    }

    /// Extends the TTL deadline for `resource` to `now + duration`.
    pub fn update_ttl(&self, resource: &ResourceHandle, duration: Duration, now: SystemTime) -> Result<(), StateError> {
        let mut entries = self.entries.write();
        let Some(record) = entries.get_mut(&resource.key) else {
            debug!(key = %resource.key, "update_ttl on vanished record, ignoring");
            return Ok(());
        };
        record.ttl_deadline = Some(now + duration);
        let record = record.clone();
        drop(entries);
        self.put_durable(resource.key.clone(), record)
    }

    /// Atomically advances the persisted offset. Must be called, and must
    /// return, before the corresponding ACK is forwarded to the publisher's
    /// upstream — this is the durability boundary the spec requires.
    ///
    /// A `Delete` race can remove the record before a late ACK arrives; per
    /// spec §5, such an ACK is dropped silently rather than treated as an
    /// error.
    pub fn update_cursor(&self, resource: &ResourceHandle, new_offset: u64) -> Result<(), StateError> {
        let mut entries = self.entries.write();
        let Some(record) = entries.get_mut(&resource.key) else {
            debug!(key = %resource.key, "update_cursor on removed record, dropping late ack");
            return Ok(());
        };
        record.cursor.offset = new_offset;
        let record = record.clone();
        drop(entries);
        self.put_durable(resource.key.clone(), record)
    }

    /// Reads the current metadata (source path, identifier name, offset) for
    /// `key`, if a record exists.
    pub fn find_meta(&self, key: &IdentityKey) -> Option<StateRecord> {
        self.entries.read().get(key).cloned()
    }

    /// Finds the key of the record whose OS identity matches, independent
    /// of which strategy that key was produced by. Used by the prospector
    /// to resolve a deleted file under `fingerprint` identity, where the
    /// content needed to recompute the key is already gone.
    pub fn find_key_by_os_identity(&self, os_identity: OsIdentity) -> Option<IdentityKey> {
        self.entries
            .read()
            .iter()
            .find(|(_, record)| record.cursor.os_identity == os_identity)
            .map(|(key, _)| key.clone())
    }

    /// Overwrites metadata for `key` (e.g. the prospector updating
    /// `source_path` after an observed rename under path-based identity).
    pub fn update_meta(&self, key: &IdentityKey, record: StateRecord) -> Result<(), StateError> {
        self.put_durable(key.clone(), record.clone())?;
        self.entries.write().insert(key.clone(), record);
        Ok(())
    }

    /// Deletes the record for `key` outright. Callers are responsible for
    /// first ensuring no harvester holds the lock, per spec §3's removal
    /// invariant.
    pub fn remove(&self, key: &IdentityKey) -> Result<(), StateError> {
        {
            let mut wal = self.wal.lock();
            wal.append(WalOp::Remove { key: key.clone() })?;
            wal.flush()?;
        }
        self.entries.write().remove(key);
        Ok(())
    }

    /// Sweeps every record for which `predicate` holds, skipping any key
    /// currently locked by a live harvester. Intended for the prospector's
    /// init-time purge (spec §4.3 "Init").
    pub fn clean_if(&self, predicate: impl Fn(&IdentityKey, &StateRecord) -> bool) -> Result<Vec<IdentityKey>, StateError> {
        let locked = self.locked.lock();
        let condemned: Vec<IdentityKey> = self
            .entries
            .read()
            .iter()
            .filter(|(key, record)| !locked.contains(*key) && predicate(key, record))
            .map(|(key, _)| key.clone())
            .collect();
        drop(locked);
        for key in &condemned {
            self.remove(key)?;
        }
        Ok(condemned)
    }

    /// Rewrites every record's key under a new identifier strategy: `rekey`
    /// receives the current key and record and returns the new key it
    /// should live under, or `None` to leave it untouched. Used once at
    /// prospector init when `file_identity` changes between runs.
    pub fn update_identifiers(&self, rekey: impl Fn(&IdentityKey, &StateRecord) -> Option<IdentityKey>) -> Result<(), StateError> {
        let migrations: Vec<(IdentityKey, IdentityKey, StateRecord)> = self
            .entries
            .read()
            .iter()
            .filter_map(|(old_key, record)| {
                let new_key = rekey(old_key, record)?;
                (new_key != *old_key).then(|| (old_key.clone(), new_key, record.clone()))
            })
            .collect();

        for (old_key, new_key, record) in migrations {
            self.put_durable(new_key.clone(), record.clone())?;
            {
                let mut wal = self.wal.lock();
                wal.append(WalOp::Remove { key: old_key.clone() })?;
                wal.flush()?;
            }
            let mut entries = self.entries.write();
            entries.remove(&old_key);
            entries.insert(new_key, record);
        }
        Ok(())
    }

    fn put_durable(&self, key: IdentityKey, record: StateRecord) -> Result<(), StateError> {
        let mut wal = self.wal.lock();
        wal.append(WalOp::Put { key, record })?;
        wal.flush()?;
        Ok(())
    }
}

/// An exclusive hold on one identity's record. Released on drop.
pub struct ResourceHandle {
    store: Arc<StateStore>,
    key: IdentityKey,
}

impl ResourceHandle {
    pub fn key(&self) -> &IdentityKey {
        &self.key
    }
}

impl Drop for ResourceHandle {
    fn drop(&mut self) {
        self.store.locked.lock().remove(&self.key);
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
