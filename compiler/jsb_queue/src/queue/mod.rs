//! Blocking FIFO shared by one producer and one consumer.
//!
//! A [`Queue`] is a `VecDeque` behind a `parking_lot` mutex with two
//! condition variables (`not_empty`, `not_full`). Queue-level state is a
//! [`QueueStatus`] bitset kept in step with the contents:
//!
//! - `EMPTY` is set exactly when the queue holds no items.
//! - `FULL` is set exactly when an item limit is configured and reached.
//! - `HALT_PRODUCER` / `HALT_CONSUMER` are cooperative shutdown requests.
//! - `PRODUCER_FIN` means no further items will ever be appended.
//! - `FAILED` means the producer stopped on an error, kept in [`Queue::failure`].
//!
//! A queue is *done* once it is `EMPTY` and `PRODUCER_FIN`. Done is
//! terminal: appends are refused and blocking dequeues return `None` from
//! then on.

use std::collections::{vec_deque, VecDeque};

use bitflags::bitflags;
use parking_lot::{Condvar, Mutex};
use tracing::trace;

use crate::StageError;

bitflags! {
    /// Queue state flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct QueueStatus: u8 {
        const EMPTY = 1 << 0;
        const FULL = 1 << 1;
        const HALT_CONSUMER = 1 << 2;
        const HALT_PRODUCER = 1 << 3;
        const PRODUCER_FIN = 1 << 4;
        const FAILED = 1 << 5;
    }
}

impl QueueStatus {
    /// Empty with no producer left: nothing more will ever arrive.
    pub fn is_done(self) -> bool {
        self.contains(Self::EMPTY | Self::PRODUCER_FIN)
    }
}

/// An item [`Queue::append`] refused; ownership returns to the caller.
#[derive(Debug)]
pub struct Rejected<T> {
    item: T,
    status: QueueStatus,
}

impl<T> Rejected<T> {
    /// Status at the time of rejection (`HALT_PRODUCER`, `PRODUCER_FIN` or
    /// `FULL`).
    pub fn status(&self) -> QueueStatus {
        self.status
    }

    /// Take back the refused item.
    pub fn into_inner(self) -> T {
        self.item
    }
}

struct Inner<T> {
    items: VecDeque<T>,
    status: QueueStatus,
    max: Option<usize>,
    failure: Option<StageError>,
}

impl<T> Inner<T> {
    fn refresh(&mut self) {
        self.status.set(QueueStatus::EMPTY, self.items.is_empty());
        let full = self.max.is_some_and(|max| self.items.len() >= max);
        self.status.set(QueueStatus::FULL, full);
    }

    fn push_back(&mut self, item: T) {
        self.items.push_back(item);
        self.refresh();
    }

    fn pop_front(&mut self) -> Option<T> {
        let item = self.items.pop_front();
        self.refresh();
        item
    }
}

/// FIFO queue usable across a producer and a consumer thread, or as a
/// single-owner double-ended list.
pub struct Queue<T> {
    inner: Mutex<Inner<T>>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl<T> Queue<T> {
    /// Queue for a producer thread, optionally capped at `max` items.
    ///
    /// A cap of zero is treated as one so a producer can always make
    /// progress.
    pub fn threaded(max: Option<usize>) -> Self {
        Self::with_status(QueueStatus::empty(), max)
    }

    /// Single-owner list. Starts `PRODUCER_FIN` since no thread ever
    /// produces into it.
    pub fn unthreaded() -> Self {
        Self::with_status(QueueStatus::PRODUCER_FIN, None)
    }

    fn with_status(status: QueueStatus, max: Option<usize>) -> Self {
        let mut inner = Inner {
            items: VecDeque::new(),
            status,
            max: max.map(|m| m.max(1)),
            failure: None,
        };
        inner.refresh();
        Self {
            inner: Mutex::new(inner),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    // === Producer side ===

    /// Append without blocking.
    ///
    /// Refused when the producer has been halted or has finished, or the
    /// queue is full; the item comes back inside the [`Rejected`].
    pub fn append(&self, item: T) -> Result<QueueStatus, Rejected<T>> {
        let mut inner = self.inner.lock();
        let refused = inner.status
            & (QueueStatus::HALT_PRODUCER | QueueStatus::PRODUCER_FIN | QueueStatus::FULL);
        if !refused.is_empty() {
            trace!(status = ?inner.status, "append rejected");
            return Err(Rejected {
                item,
                status: inner.status,
            });
        }
        inner.push_back(item);
        self.not_empty.notify_one();
        Ok(inner.status)
    }

    /// Append, waiting while the queue is full.
    ///
    /// Returns `false` and drops the item if the producer is halted or
    /// finished, before or during the wait.
    pub fn append_blocking(&self, item: T) -> bool {
        let mut inner = self.inner.lock();
        loop {
            if inner
                .status
                .intersects(QueueStatus::HALT_PRODUCER | QueueStatus::PRODUCER_FIN)
            {
                trace!(status = ?inner.status, "producer stopped, dropping item");
                return false;
            }
            if !inner.status.contains(QueueStatus::FULL) {
                inner.push_back(item);
                self.not_empty.notify_one();
                return true;
            }
            self.not_full.wait(&mut inner);
        }
    }

    /// Mark that no further items will be appended.
    pub fn producer_fin(&self) {
        self.inner.lock().status.insert(QueueStatus::PRODUCER_FIN);
        self.wake_all();
    }

    /// Record the producer's failure. The first failure is kept.
    pub fn set_failed(&self, error: StageError) {
        let mut inner = self.inner.lock();
        inner.status.insert(QueueStatus::FAILED);
        if inner.failure.is_none() {
            inner.failure = Some(error);
        }
    }

    // === Consumer side ===

    /// Dequeue the head if there is one. `None` also when the consumer is
    /// halted.
    pub fn try_dequeue(&self) -> Option<T> {
        let mut inner = self.inner.lock();
        if inner.status.contains(QueueStatus::HALT_CONSUMER) {
            return None;
        }
        let item = inner.pop_front();
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    /// Dequeue the head, waiting while the queue is empty.
    ///
    /// Returns `None` once the consumer is halted or the queue is done;
    /// both are terminal.
    pub fn dequeue_blocking(&self) -> Option<T> {
        let mut inner = self.inner.lock();
        loop {
            if inner.status.contains(QueueStatus::HALT_CONSUMER) {
                return None;
            }
            if let Some(item) = inner.pop_front() {
                self.not_full.notify_one();
                return Some(item);
            }
            if inner.status.contains(QueueStatus::PRODUCER_FIN) {
                return None;
            }
            self.not_empty.wait(&mut inner);
        }
    }

    /// Apply `f` to the head without removing it, waiting while empty.
    ///
    /// `None` under the same terminal conditions as
    /// [`dequeue_blocking`](Self::dequeue_blocking).
    pub fn peek_head_blocking_with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let mut inner = self.inner.lock();
        loop {
            if inner.status.contains(QueueStatus::HALT_CONSUMER) {
                return None;
            }
            if let Some(head) = inner.items.front() {
                return Some(f(head));
            }
            if inner.status.contains(QueueStatus::PRODUCER_FIN) {
                return None;
            }
            self.not_empty.wait(&mut inner);
        }
    }

    /// Drop head items until the head satisfies `stop`, waiting for items
    /// as needed.
    ///
    /// Returns `true` with the matching item left at the head, or `false`
    /// if the queue ended (or the consumer was halted) first.
    pub fn consume_until(&self, mut stop: impl FnMut(&T) -> bool) -> bool {
        let mut inner = self.inner.lock();
        loop {
            if inner.status.contains(QueueStatus::HALT_CONSUMER) {
                return false;
            }
            match inner.items.front().map(&mut stop) {
                Some(true) => return true,
                Some(false) => {
                    drop(inner.pop_front());
                    self.not_full.notify_one();
                }
                None if inner.status.contains(QueueStatus::PRODUCER_FIN) => return false,
                None => self.not_empty.wait(&mut inner),
            }
        }
    }

    // === Signals and state ===

    /// Ask the producer to stop; blocked and future appends give up.
    pub fn halt_producer(&self) {
        self.inner.lock().status.insert(QueueStatus::HALT_PRODUCER);
        self.wake_all();
    }

    /// Ask the consumer to stop; blocked and future dequeues return `None`.
    pub fn halt_consumer(&self) {
        self.inner.lock().status.insert(QueueStatus::HALT_CONSUMER);
        self.wake_all();
    }

    /// Current state flags.
    pub fn status(&self) -> QueueStatus {
        self.inner.lock().status
    }

    /// Whether the queue is empty and its producer finished.
    pub fn is_done(&self) -> bool {
        self.status().is_done()
    }

    /// The producer's stored failure, if it stopped on an error.
    pub fn failure(&self) -> Option<StageError> {
        self.inner.lock().failure.clone()
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    /// Whether no items are queued.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().items.is_empty()
    }

    /// Change the item cap. Lifting it wakes a blocked producer.
    pub fn set_max(&self, max: Option<usize>) {
        let mut inner = self.inner.lock();
        inner.max = max.map(|m| m.max(1));
        inner.refresh();
        self.not_full.notify_all();
    }

    fn wake_all(&self) {
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    // === Single-owner operations ===
    //
    // These take `&mut self`, so they cannot run while a producer thread
    // holds a shared handle; no locking is needed.

    /// Append to the tail, ignoring any item cap.
    pub fn push_tail(&mut self, item: T) {
        self.inner.get_mut().push_back(item);
    }

    /// Insert at the head.
    pub fn push_head(&mut self, item: T) {
        let inner = self.inner.get_mut();
        inner.items.push_front(item);
        inner.refresh();
    }

    /// Remove the head.
    pub fn pop_head(&mut self) -> Option<T> {
        self.inner.get_mut().pop_front()
    }

    /// Remove the tail.
    pub fn pop_tail(&mut self) -> Option<T> {
        let inner = self.inner.get_mut();
        let item = inner.items.pop_back();
        inner.refresh();
        item
    }

    pub fn peek_head(&mut self) -> Option<&T> {
        self.inner.get_mut().items.front()
    }

    pub fn peek_tail(&mut self) -> Option<&T> {
        self.inner.get_mut().items.back()
    }

    /// Pop tail items until the tail satisfies `stop` or the list is
    /// empty, passing each removed item to `removed`. Returns how many
    /// were removed.
    pub fn consume_tail_until(
        &mut self,
        mut stop: impl FnMut(&T) -> bool,
        mut removed: impl FnMut(T),
    ) -> usize {
        let inner = self.inner.get_mut();
        let mut count = 0;
        while inner.items.back().is_some_and(|tail| !stop(tail)) {
            if let Some(item) = inner.items.pop_back() {
                removed(item);
                count += 1;
            }
        }
        inner.refresh();
        count
    }

    /// Iterate the items in order.
    pub fn items(&mut self) -> vec_deque::Iter<'_, T> {
        self.inner.get_mut().items.iter()
    }

    /// Take every item, leaving the queue empty.
    pub fn into_items(self) -> VecDeque<T> {
        self.inner.into_inner().items
    }
}

impl<T: Clone> Queue<T> {
    /// Copy of the current contents, head first.
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.lock().items.iter().cloned().collect()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::unthreaded()
    }
}

#[cfg(test)]
mod tests;
