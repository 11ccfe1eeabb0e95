use crate::support::Harness;
use std::time::Duration;

/// spec.md §8, close-renamed: a rotated file keeps its identity (and
/// offset) under os-identity; the file created at the vacated path gets a
/// brand new harvester starting at offset 0.
#[tokio::test]
async fn renamed_file_keeps_its_offset_and_the_new_path_starts_fresh() {
    let harness = Harness::start(|_| {});

    let first = b"first log line\n";
    harness.write("a.log", first);
    harness.wait_for_messages(1, Duration::from_secs(2)).await;

    let rotated_key = harness.os_identity_key("a.log");

    std::fs::rename(harness.path("a.log"), harness.path("a.log.rotated")).unwrap();
    harness.settle(Duration::from_millis(60)).await;

    let second = b"new first log line\nnew second log line\n";
    harness.write("a.log", second);
    harness.wait_for_messages(3, Duration::from_secs(2)).await;

    let new_key = harness.os_identity_key("a.log");
    assert_ne!(rotated_key, new_key);

    assert_eq!(harness.offset_for(&rotated_key), Some(first.len() as u64));
    assert_eq!(harness.offset_for(&new_key), Some(second.len() as u64));

    let messages = harness.publisher.messages();
    assert_eq!(messages, vec!["first log line", "new first log line", "new second log line"]);

    harness.shutdown().await;
}
