//! Cross-thread delivery guarantees of `Queue`.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]

use std::sync::Arc;
use std::thread;

use jsb_queue::{spawn_stage, Queue};
use proptest::prelude::*;

fn pump(n: usize, limit: Option<usize>) -> Vec<usize> {
    let queue = Arc::new(Queue::threaded(limit));
    let producer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            for i in 0..n {
                assert!(queue.append_blocking(i));
            }
            queue.producer_fin();
        })
    };
    let mut got = Vec::with_capacity(n);
    while let Some(v) = queue.dequeue_blocking() {
        got.push(v);
    }
    producer.join().unwrap();
    got
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn unbounded_delivery_is_fifo_exactly_once(n in 0usize..2000) {
        prop_assert_eq!(pump(n, None), (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn bounded_delivery_is_fifo_exactly_once(n in 0usize..2000, limit in 1usize..8) {
        prop_assert_eq!(pump(n, Some(limit)), (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn teardown_mid_stream_never_hangs(n in 1usize..500, take in 0usize..50, limit in 1usize..4) {
        let mut stage = spawn_stage("numbers", Some(limit), move |out| {
            for i in 0..n {
                if !out.send(i) {
                    break;
                }
            }
            Ok(())
        })
        .unwrap();
        let got: Vec<usize> = stage.by_ref().take(take).collect();
        prop_assert_eq!(got, (0..n.min(take)).collect::<Vec<_>>());
        prop_assert!(stage.finish().is_ok());
    }
}
