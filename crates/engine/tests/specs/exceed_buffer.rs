use crate::support::Harness;
use std::time::Duration;

/// spec.md §8, exceed-buffer: a line longer than the read buffer is still
/// assembled whole across several `read()` calls before the line framer
/// sees a terminator.
#[tokio::test]
async fn a_line_longer_than_the_read_buffer_is_still_delivered_whole() {
    let harness = Harness::start(|schema| {
        schema.reader.buffer_size = 10;
    });

    let mut line = "x".repeat(46);
    line.push('\n');
    assert_eq!(line.len(), 47);
    harness.write("a.log", line.as_bytes());
    harness.wait_for_messages(1, Duration::from_secs(2)).await;

    assert_eq!(harness.publisher.messages(), vec!["x".repeat(46)]);

    let key = harness.os_identity_key("a.log");
    assert_eq!(harness.offset_for(&key), Some(47));

    harness.shutdown().await;
}
