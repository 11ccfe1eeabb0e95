use super::*;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tailer_core::identity::IdentityKey;
use tailer_core::{CursorRecord, IdentifierKind, OsIdentity};
use tempfile::tempdir;

fn cursor(path: &str, device: u64, inode: u64) -> CursorRecord {
    CursorRecord::new(
        PathBuf::from(path),
        OsIdentity { device, inode },
        IdentifierKind::Os,
    )
}

#[test]
fn insert_then_find_meta_round_trips() {
    let dir = tempdir().unwrap();
    let store = StateStore::open(&dir.path().join("state.wal")).unwrap();
    let key: IdentityKey = "1-2".into();

    store.insert(key.clone(), StateRecord::new(cursor("/var/log/a.log", 1, 2))).unwrap();

    let found = store.find_meta(&key).unwrap();
    assert_eq!(found.cursor.source_path, PathBuf::from("/var/log/a.log"));
    assert_eq!(found.cursor.offset, 0);
}

#[test]
fn find_meta_on_unknown_key_is_none() {
    let dir = tempdir().unwrap();
    let store = StateStore::open(&dir.path().join("state.wal")).unwrap();
    assert!(store.find_meta(&"nope".into()).is_none());
}

#[test]
fn lock_is_exclusive_and_released_on_drop() {
    let dir = tempdir().unwrap();
    let store = StateStore::open(&dir.path().join("state.wal")).unwrap();
    let key: IdentityKey = "1-2".into();
    store.insert(key.clone(), StateRecord::new(cursor("/a.log", 1, 2))).unwrap();

    let handle = store.lock(&key).unwrap();
    let err = store.lock(&key).unwrap_err();
    assert!(matches!(err, StateError::AlreadyLocked(_)));

    drop(handle);
    store.lock(&key).expect("lock should be available again after drop");
}

#[test]
fn update_cursor_advances_offset_and_persists() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.wal");
    let key: IdentityKey = "1-2".into();
    {
        let store = StateStore::open(&path).unwrap();
        store.insert(key.clone(), StateRecord::new(cursor("/a.log", 1, 2))).unwrap();
        let handle = store.lock(&key).unwrap();
        store.update_cursor(&handle, 128).unwrap();
    }

    // Reopening replays the WAL; the advanced offset must survive.
    let store = StateStore::open(&path).unwrap();
    let record = store.find_meta(&key).unwrap();
    assert_eq!(record.cursor.offset, 128);
}

#[test]
fn update_cursor_on_removed_record_is_silently_dropped() {
    let dir = tempdir().unwrap();
    let store = StateStore::open(&dir.path().join("state.wal")).unwrap();
    let key: IdentityKey = "1-2".into();
    store.insert(key.clone(), StateRecord::new(cursor("/a.log", 1, 2))).unwrap();
    let handle = store.lock(&key).unwrap();

    store.remove(&key).unwrap();

    // The late ACK must not error even though the record is gone.
    store.update_cursor(&handle, 99).unwrap();
    assert!(store.find_meta(&key).is_none());
}

#[test]
fn update_ttl_sets_deadline_relative_to_now() {
    let dir = tempdir().unwrap();
    let store = StateStore::open(&dir.path().join("state.wal")).unwrap();
    let key: IdentityKey = "1-2".into();
    store.insert(key.clone(), StateRecord::new(cursor("/a.log", 1, 2))).unwrap();
    let handle = store.lock(&key).unwrap();

    let now = SystemTime::now();
    store.update_ttl(&handle, Duration::from_secs(60), now).unwrap();

    let record = store.find_meta(&key).unwrap();
    assert_eq!(record.ttl_deadline, Some(now + Duration::from_secs(60)));
}

#[test]
fn update_meta_overwrites_source_path() {
    let dir = tempdir().unwrap();
    let store = StateStore::open(&dir.path().join("state.wal")).unwrap();
    let key: IdentityKey = "1-2".into();
    store.insert(key.clone(), StateRecord::new(cursor("/old.log", 1, 2))).unwrap();

    let mut updated = store.find_meta(&key).unwrap();
    updated.cursor.source_path = PathBuf::from("/new.log");
    store.update_meta(&key, updated).unwrap();

    assert_eq!(store.find_meta(&key).unwrap().cursor.source_path, PathBuf::from("/new.log"));
}

#[test]
fn clean_if_removes_matching_unlocked_records_only() {
    let dir = tempdir().unwrap();
    let store = StateStore::open(&dir.path().join("state.wal")).unwrap();
    let stale: IdentityKey = "stale".into();
    let fresh: IdentityKey = "fresh".into();
    let locked_key: IdentityKey = "locked".into();
    store.insert(stale.clone(), StateRecord::new(cursor("/stale.log", 1, 1))).unwrap();
    store.insert(fresh.clone(), StateRecord::new(cursor("/fresh.log", 2, 2))).unwrap();
    store.insert(locked_key.clone(), StateRecord::new(cursor("/locked.log", 3, 3))).unwrap();
    let _handle = store.lock(&locked_key).unwrap();

    let removed = store
        .clean_if(|key, _| key.as_ref() == "stale" || key.as_ref() == "locked")
        .unwrap();

    assert_eq!(removed, vec![stale.clone()]);
    assert!(store.find_meta(&stale).is_none());
    assert!(store.find_meta(&fresh).is_some());
    assert!(store.find_meta(&locked_key).is_some());
}

#[test]
fn update_identifiers_rekeys_and_preserves_record() {
    let dir = tempdir().unwrap();
    let store = StateStore::open(&dir.path().join("state.wal")).unwrap();
    let old_key: IdentityKey = "os:1-2".into();
    store.insert(old_key.clone(), StateRecord::new(cursor("/a.log", 1, 2))).unwrap();

    store
        .update_identifiers(|key, _| {
            if key.as_ref() == "os:1-2" {
                Some("path:/a.log".into())
            } else {
                None
            }
        })
        .unwrap();

    assert!(store.find_meta(&old_key).is_none());
    let migrated = store.find_meta(&"path:/a.log".into()).unwrap();
    assert_eq!(migrated.cursor.source_path, PathBuf::from("/a.log"));
}

#[test]
fn reopen_after_remove_does_not_resurrect_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.wal");
    let key: IdentityKey = "1-2".into();
    {
        let store = StateStore::open(&path).unwrap();
        store.insert(key.clone(), StateRecord::new(cursor("/a.log", 1, 2))).unwrap();
        store.remove(&key).unwrap();
    }

    let store = StateStore::open(&path).unwrap();
    assert!(store.find_meta(&key).is_none());
}
