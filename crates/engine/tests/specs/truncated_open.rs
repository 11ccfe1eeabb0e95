use crate::support::Harness;
use std::time::Duration;

/// spec.md §8, truncated-open: a truncation mid-stream resets the offset to
/// 0 and the harvester reseeks so post-truncation content is read fresh.
#[tokio::test]
async fn truncation_resets_offset_and_the_harvester_keeps_reading() {
    let harness = Harness::start(|_| {});

    let lines = b"one\ntwo\nthree\n";
    harness.write("a.log", lines);
    harness.wait_for_messages(3, Duration::from_secs(2)).await;

    let key = harness.os_identity_key("a.log");
    assert_eq!(harness.offset_for(&key), Some(lines.len() as u64));

    harness.truncate("a.log");
    let fresh = b"truncated first line\n";
    harness.write("a.log", fresh);
    harness.wait_for_messages(4, Duration::from_secs(2)).await;

    assert_eq!(harness.offset_for(&key), Some(fresh.len() as u64));
    assert_eq!(
        harness.publisher.messages(),
        vec!["one", "two", "three", "truncated first line"]
    );

    harness.shutdown().await;
}
