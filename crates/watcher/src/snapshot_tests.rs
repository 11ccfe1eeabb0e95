use super::*;
use std::time::{Duration, SystemTime};
use tailer_core::OsIdentity;

fn info(size: u64, mtime_offset_secs: u64, device: u64, inode: u64) -> FileInfo {
    FileInfo {
        size,
        mtime: SystemTime::UNIX_EPOCH + Duration::from_secs(mtime_offset_secs),
        os_identity: OsIdentity::new(device, inode),
    }
}

#[test]
fn unchanged_path_emits_nothing() {
    let mut snap = Snapshot::new();
    snap.insert(PathBuf::from("/a.log"), info(10, 100, 1, 1));
    let events = diff(&snap, &snap);
    assert!(events.is_empty());
}

#[test]
fn mtime_change_emits_write() {
    let mut previous = Snapshot::new();
    previous.insert(PathBuf::from("/a.log"), info(10, 100, 1, 1));
    let mut current = Snapshot::new();
    current.insert(PathBuf::from("/a.log"), info(20, 200, 1, 1));

    let events = diff(&previous, &current);
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], FsEvent::Write { path, .. } if path == &PathBuf::from("/a.log")));
}

#[test]
fn new_path_emits_create() {
    let previous = Snapshot::new();
    let mut current = Snapshot::new();
    current.insert(PathBuf::from("/new.log"), info(0, 100, 1, 1));

    let events = diff(&previous, &current);
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], FsEvent::Create { path, .. } if path == &PathBuf::from("/new.log")));
}

#[test]
fn vanished_path_with_no_identity_match_emits_delete() {
    let mut previous = Snapshot::new();
    previous.insert(PathBuf::from("/gone.log"), info(10, 100, 1, 1));
    let current = Snapshot::new();

    let events = diff(&previous, &current);
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], FsEvent::Delete { path, .. } if path == &PathBuf::from("/gone.log")));
}

#[test]
fn matching_identity_across_paths_emits_rename_not_delete_and_create() {
    let mut previous = Snapshot::new();
    previous.insert(PathBuf::from("/old.log"), info(10, 100, 1, 1));
    let mut current = Snapshot::new();
    current.insert(PathBuf::from("/new.log"), info(10, 100, 1, 1));

    let events = diff(&previous, &current);
    assert_eq!(events.len(), 1);
    match &events[0] {
        FsEvent::Rename { old_path, new_path, .. } => {
            assert_eq!(old_path, &PathBuf::from("/old.log"));
            assert_eq!(new_path, &PathBuf::from("/new.log"));
        }
        other => panic!("expected Rename, got {other:?}"),
    }
}

#[test]
fn unrelated_delete_and_create_do_not_pair_when_identity_differs() {
    let mut previous = Snapshot::new();
    previous.insert(PathBuf::from("/old.log"), info(10, 100, 1, 1));
    let mut current = Snapshot::new();
    current.insert(PathBuf::from("/new.log"), info(10, 100, 2, 2));

    let events = diff(&previous, &current);
    assert_eq!(events.len(), 2);
    assert!(events.iter().any(|e| matches!(e, FsEvent::Delete { .. })));
    assert!(events.iter().any(|e| matches!(e, FsEvent::Create { .. })));
}

#[test]
fn multiple_deletions_bind_to_identity_matches_without_double_counting() {
    let mut previous = Snapshot::new();
    previous.insert(PathBuf::from("/a.log"), info(10, 100, 1, 1));
    previous.insert(PathBuf::from("/b.log"), info(20, 200, 2, 2));
    let mut current = Snapshot::new();
    current.insert(PathBuf::from("/a2.log"), info(10, 100, 1, 1));
    current.insert(PathBuf::from("/b2.log"), info(20, 200, 2, 2));

    let mut events = diff(&previous, &current);
    events.sort_by_key(|e| e.current_path().map(|p| p.to_path_buf()));
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| matches!(e, FsEvent::Rename { .. })));
}
