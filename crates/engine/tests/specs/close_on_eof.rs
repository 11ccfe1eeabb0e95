use crate::support::Harness;
use std::time::Duration;

/// spec.md §8, close-eof: `close.reader.on_eof=true` makes the harvester
/// exit the instant it hits EOF; with a scan interval long enough that no
/// second tick can occur, content appended afterward is never re-harvested.
#[tokio::test]
async fn closing_on_eof_means_appended_content_waits_for_the_next_scan() {
    let harness = Harness::start(|schema| {
        schema.scanner.check_interval = Duration::from_secs(60 * 60 * 24);
        schema.close.reader.on_eof = true;
    });

    harness.write("a.log", b"first log line\n");
    harness.wait_for_messages(1, Duration::from_secs(2)).await;

    harness.append("a.log", b"a line appended after close\n");
    harness.settle(Duration::from_millis(150)).await;

    assert_eq!(harness.publisher.messages(), vec!["first log line"]);

    harness.shutdown().await;
}
