use super::*;
use crate::file_info::OsIdentity;
use std::path::Path;
use std::time::SystemTime;

fn info(size: u64, device: u64, inode: u64) -> FileInfo {
    FileInfo {
        size,
        mtime: SystemTime::now(),
        os_identity: OsIdentity::new(device, inode),
    }
}

#[test]
fn os_identifier_keys_by_device_and_inode() {
    let id = OsIdentifier;
    let a = id.identify(Path::new("/a"), &info(10, 1, 42), None).unwrap();
    let b = id.identify(Path::new("/b"), &info(99, 1, 42), None).unwrap();
    assert_eq!(a, b, "same device+inode must produce the same key regardless of path/size");
}

#[test]
fn path_identifier_keys_by_absolute_path() {
    let id = PathIdentifier;
    let a = id.identify(Path::new("/a/log"), &info(10, 1, 1), None).unwrap();
    let b = id.identify(Path::new("/a/log"), &info(10, 2, 2), None).unwrap();
    assert_eq!(a, b);
    let c = id.identify(Path::new("/a/other"), &info(10, 1, 1), None).unwrap();
    assert_ne!(a, c);
}

#[test]
fn fingerprint_identifier_defers_until_enough_bytes() {
    let id = FingerprintIdentifier::new(8);
    let short = info(4, 1, 1);
    assert!(id.identify(Path::new("/a"), &short, Some(b"1234")).is_none());

    let long = info(8, 1, 1);
    assert!(id
        .identify(Path::new("/a"), &long, Some(b"12345678"))
        .is_some());
}

#[test]
fn fingerprint_identifier_is_stable_for_same_head_bytes() {
    let id = FingerprintIdentifier::new(4);
    let observation = info(4, 1, 1);
    let a = id.identify(Path::new("/a"), &observation, Some(b"abcd")).unwrap();
    let b = id.identify(Path::new("/b"), &observation, Some(b"abcd")).unwrap();
    assert_eq!(a, b, "fingerprint must survive rename (different path, same head bytes)");

    let c = id.identify(Path::new("/a"), &observation, Some(b"wxyz")).unwrap();
    assert_ne!(a, c);
}

#[test]
fn source_of_carries_kind_and_current_path() {
    let id = PathIdentifier;
    let source = id
        .source_of(Path::new("/a/log"), &info(1, 1, 1), None)
        .unwrap();
    assert_eq!(source.identifier_name, IdentifierKind::Path);
    assert_eq!(source.current_path, Path::new("/a/log"));
}
