#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;

use super::*;

// === Status bookkeeping ===

#[test]
fn new_threaded_queue_is_empty_and_running() {
    let q: Queue<u32> = Queue::threaded(None);
    assert_eq!(q.status(), QueueStatus::EMPTY);
    assert!(!q.is_done());
    assert_eq!(q.len(), 0);
}

#[test]
fn unthreaded_queue_starts_finished() {
    let q: Queue<u32> = Queue::unthreaded();
    assert_eq!(q.status(), QueueStatus::EMPTY | QueueStatus::PRODUCER_FIN);
    assert!(q.is_done());
}

#[test]
fn empty_flag_tracks_length() {
    let q = Queue::threaded(None);
    q.append(1).unwrap();
    assert!(!q.status().contains(QueueStatus::EMPTY));
    assert_eq!(q.try_dequeue(), Some(1));
    assert!(q.status().contains(QueueStatus::EMPTY));
}

#[test]
fn full_flag_and_rejection() {
    let q = Queue::threaded(Some(2));
    q.append('a').unwrap();
    let status = q.append('b').unwrap();
    assert!(status.contains(QueueStatus::FULL));

    let rejected = q.append('c').unwrap_err();
    assert!(rejected.status().contains(QueueStatus::FULL));
    assert_eq!(rejected.into_inner(), 'c');

    q.try_dequeue();
    assert!(!q.status().contains(QueueStatus::FULL));
    q.append('c').unwrap();
    assert_eq!(q.snapshot(), vec!['b', 'c']);
}

#[test]
fn zero_limit_still_admits_one() {
    let q = Queue::threaded(Some(0));
    assert!(q.append(1).is_ok());
    assert!(q.append(2).is_err());
}

#[test]
fn set_max_lifts_limit() {
    let q = Queue::threaded(Some(1));
    q.append(1).unwrap();
    assert!(q.append(2).is_err());
    q.set_max(None);
    assert!(q.append(2).is_ok());
}

#[test]
fn halted_producer_is_rejected() {
    let q = Queue::threaded(None);
    q.halt_producer();
    let rejected = q.append(5).unwrap_err();
    assert!(rejected.status().contains(QueueStatus::HALT_PRODUCER));
    assert!(!q.append_blocking(6));
    assert!(q.is_empty());
}

#[test]
fn done_queue_stays_done() {
    let q = Queue::threaded(None);
    q.producer_fin();
    let rejected = q.append(7).unwrap_err();
    assert!(rejected.status().contains(QueueStatus::PRODUCER_FIN));
    assert_eq!(rejected.into_inner(), 7);
    assert!(!q.append_blocking(8));
    assert!(q.is_done());
    assert_eq!(q.dequeue_blocking(), None);
}

#[test]
fn finished_producer_keeps_pending_items() {
    let q = Queue::threaded(None);
    q.append(1).unwrap();
    q.producer_fin();
    assert!(q.append(2).is_err());
    assert_eq!(q.dequeue_blocking(), Some(1));
    assert_eq!(q.dequeue_blocking(), None);
}

#[test]
fn first_failure_is_kept() {
    let q: Queue<u8> = Queue::threaded(None);
    q.set_failed(StageError::new("one", "first"));
    q.set_failed(StageError::new("two", "second"));
    assert!(q.status().contains(QueueStatus::FAILED));
    assert_eq!(q.failure(), Some(StageError::new("one", "first")));
}

// === Blocking behavior ===

#[test]
fn dequeue_blocking_returns_none_when_done() {
    let q = Queue::threaded(None);
    q.append(1).unwrap();
    q.producer_fin();
    assert_eq!(q.dequeue_blocking(), Some(1));
    assert_eq!(q.dequeue_blocking(), None);
    assert!(q.is_done());
}

#[test]
fn dequeue_blocking_waits_for_producer() {
    let q = Arc::new(Queue::threaded(None));
    let producer = {
        let q = Arc::clone(&q);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            q.append_blocking(7);
            q.producer_fin();
        })
    };
    assert_eq!(q.dequeue_blocking(), Some(7));
    assert_eq!(q.dequeue_blocking(), None);
    producer.join().unwrap();
}

#[test]
fn halt_consumer_unblocks_dequeue() {
    let q: Arc<Queue<u8>> = Arc::new(Queue::threaded(None));
    let consumer = {
        let q = Arc::clone(&q);
        thread::spawn(move || q.dequeue_blocking())
    };
    thread::sleep(Duration::from_millis(20));
    q.halt_consumer();
    assert_eq!(consumer.join().unwrap(), None);
    assert_eq!(q.try_dequeue(), None);
}

#[test]
fn halt_producer_unblocks_full_append() {
    let q = Arc::new(Queue::threaded(Some(1)));
    q.append(0).unwrap();
    let producer = {
        let q = Arc::clone(&q);
        thread::spawn(move || q.append_blocking(1))
    };
    thread::sleep(Duration::from_millis(20));
    q.halt_producer();
    assert!(!producer.join().unwrap());
    assert_eq!(q.len(), 1);
}

#[test]
fn peek_does_not_remove() {
    let q = Queue::threaded(None);
    q.append(3).unwrap();
    assert_eq!(q.peek_head_blocking_with(|v| v * 2), Some(6));
    assert_eq!(q.len(), 1);
    q.producer_fin();
    q.try_dequeue();
    assert_eq!(q.peek_head_blocking_with(|v| *v), None);
}

#[test]
fn consume_until_skips_to_match() {
    let q = Queue::threaded(None);
    for v in [1, 2, 3, 10, 4] {
        q.append(v).unwrap();
    }
    q.producer_fin();
    assert!(q.consume_until(|v| *v >= 10));
    assert_eq!(q.snapshot(), vec![10, 4]);
    q.try_dequeue();
    assert!(!q.consume_until(|v| *v >= 10));
    assert!(q.is_done());
}

// === Single-owner operations ===

#[test]
fn double_ended_operations() {
    let mut q = Queue::unthreaded();
    q.push_tail(2);
    q.push_tail(3);
    q.push_head(1);
    assert_eq!(q.peek_head(), Some(&1));
    assert_eq!(q.peek_tail(), Some(&3));
    assert_eq!(q.pop_tail(), Some(3));
    assert_eq!(q.pop_head(), Some(1));
    assert_eq!(q.items().copied().collect::<Vec<_>>(), vec![2]);
    assert_eq!(q.pop_head(), Some(2));
    assert_eq!(q.pop_tail(), None);
    assert!(q.status().contains(QueueStatus::EMPTY));
}

#[test]
fn consume_tail_until_trims_tail() {
    let mut q = Queue::unthreaded();
    for c in ['a', ' ', 'b', ' ', ' '] {
        q.push_tail(c);
    }
    let mut removed = Vec::new();
    let count = q.consume_tail_until(|c| *c != ' ', |c| removed.push(c));
    assert_eq!(count, 2);
    assert_eq!(removed, vec![' ', ' ']);
    assert_eq!(q.into_items(), vec!['a', ' ', 'b']);
}

#[test]
fn consume_tail_until_can_empty() {
    let mut q = Queue::unthreaded();
    q.push_tail(' ');
    assert_eq!(q.consume_tail_until(|c| *c != ' ', drop), 1);
    assert!(q.is_empty());
    assert!(q.status().contains(QueueStatus::EMPTY));
}
