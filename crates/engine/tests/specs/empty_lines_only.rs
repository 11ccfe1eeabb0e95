use crate::support::Harness;
use std::time::Duration;

/// spec.md §8, empty-lines-only: a file containing nothing but blank lines
/// never advances its offset, since empty lines are dropped before
/// publishing and the offset only moves on a successful publish.
///
/// The registry still gains an entry at harvester start (the state-store
/// lock the harvester group takes is keyed off it) but its offset never
/// leaves 0, which is the observable form of "no registry entry" this
/// architecture can provide — see DESIGN.md.
#[tokio::test]
async fn a_file_of_only_blank_lines_publishes_nothing_and_never_advances() {
    let harness = Harness::start(|_| {});

    harness.write("a.log", b"\n\n\n");
    harness.settle(Duration::from_millis(150)).await;

    assert!(harness.publisher.messages().is_empty());

    let key = harness.os_identity_key("a.log");
    assert_eq!(harness.offset_for(&key), Some(0));

    harness.shutdown().await;
}
