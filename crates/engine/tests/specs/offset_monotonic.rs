use crate::support::Harness;
use proptest::prelude::*;
use std::time::Duration;

/// spec.md §8 invariant 1: offsets are non-decreasing except immediately
/// following a truncation, where they reset to 0 and then resume climbing.
#[derive(Debug, Clone)]
enum Op {
    Append(u8),
    Truncate,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![3 => (1u8..12).prop_map(Op::Append), 1 => Just(Op::Truncate),]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn persisted_offset_only_drops_through_a_truncation(ops in prop::collection::vec(op_strategy(), 1..10)) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let harness = Harness::start(|_| {});
            harness.write("a.log", b"seed\n");
            harness.wait_for_messages(1, Duration::from_secs(2)).await;

            let key = harness.os_identity_key("a.log");
            let mut prev = harness.offset_for(&key).unwrap_or(0);
            let mut expected_published = 1usize;

            for op in ops {
                match op {
                    Op::Append(n) => {
                        let line = format!("{}\n", "a".repeat(n as usize));
                        harness.append("a.log", line.as_bytes());
                        expected_published += 1;
                        harness.wait_for_messages(expected_published, Duration::from_secs(2)).await;
                        let now = harness.offset_for(&key).unwrap_or(0);
                        prop_assert!(now >= prev, "offset went backwards without a truncation: {now} < {prev}");
                        prev = now;
                    }
                    Op::Truncate => {
                        harness.truncate("a.log");
                        harness.settle(Duration::from_millis(80)).await;
                        let now = harness.offset_for(&key).unwrap_or(0);
                        prop_assert_eq!(now, 0, "truncation must reset the persisted offset to 0");
                        prev = 0;
                    }
                }
            }

            harness.shutdown().await;
            Ok(())
        })?;
    }
}
