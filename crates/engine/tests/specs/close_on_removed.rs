use crate::support::Harness;
use std::time::Duration;

/// spec.md §8, close-removed: with a scan interval long enough that no
/// second tick can occur within the test, a file removed after its first
/// harvest keeps its registry entry at the offset it last reached, and the
/// fresh file written at the same path is never picked up.
#[tokio::test]
async fn removed_file_keeps_its_registry_entry_and_the_replacement_is_not_seen() {
    let harness = Harness::start(|schema| {
        schema.scanner.check_interval = Duration::from_secs(60 * 60 * 24);
    });

    let first = b"first log line\n";
    harness.write("a.log", first);
    harness.wait_for_messages(1, Duration::from_secs(2)).await;

    let original_key = harness.os_identity_key("a.log");
    assert_eq!(harness.offset_for(&original_key), Some(first.len() as u64));

    std::fs::remove_file(harness.path("a.log")).unwrap();
    harness.settle(Duration::from_millis(100)).await;
    harness.write("a.log", b"a fresh twenty seven byte line\n");
    harness.settle(Duration::from_millis(100)).await;

    assert_eq!(harness.publisher.messages().len(), 1);
    assert_eq!(harness.offset_for(&original_key), Some(first.len() as u64));

    harness.shutdown().await;
}
