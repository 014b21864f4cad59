//! Thread-per-stage spawning.
//!
//! [`spawn_stage`] starts a named producer thread that publishes into a
//! fresh [`Queue`] and returns the consumer-side [`Stage`] handle. Stages
//! compose by moving the upstream `Stage` into the downstream closure: when
//! the downstream thread ends, the upstream handle is dropped with it, which
//! halts, drains and joins the upstream thread.

use std::cell::Cell;
use std::error::Error as StdError;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{debug, debug_span, error};

use crate::Queue;

/// Terminal failure of a pipeline stage.
///
/// `Clone` so it can sit in queue state and be read by any consumer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{stage}: {message}")]
pub struct StageError {
    stage: &'static str,
    message: String,
}

impl StageError {
    pub fn new(stage: &'static str, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }

    /// Flatten `err` and its source chain into a message.
    pub fn from_error(stage: &'static str, err: &dyn StdError) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::new(stage, message)
    }

    /// Name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        self.stage
    }

    /// What went wrong.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Producer-side handle passed to a stage's work closure.
pub struct Producer<T> {
    queue: Arc<Queue<T>>,
    sent: Cell<u64>,
}

impl<T> Producer<T> {
    /// Publish one item, waiting while the queue is full.
    ///
    /// Returns `false` once the consumer has asked the producer to halt;
    /// the closure should then stop and return `Ok(())`.
    pub fn send(&self, item: T) -> bool {
        let accepted = self.queue.append_blocking(item);
        if accepted {
            self.sent.set(self.sent.get() + 1);
        }
        accepted
    }

    /// Whether the consumer has asked the producer to stop.
    pub fn is_halted(&self) -> bool {
        self.queue
            .status()
            .contains(crate::QueueStatus::HALT_PRODUCER)
    }

    /// Items accepted so far.
    pub fn sent(&self) -> u64 {
        self.sent.get()
    }
}

/// Marks the queue finished when the producer thread exits, including by
/// panic, so a joining consumer never waits forever.
struct FinGuard<T> {
    stage: &'static str,
    queue: Arc<Queue<T>>,
}

impl<T> Drop for FinGuard<T> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.queue
                .set_failed(StageError::new(self.stage, "stage thread panicked"));
        }
        self.queue.producer_fin();
    }
}

/// Consumer-side handle: owns the stage's output queue and its thread.
pub struct Stage<T> {
    name: &'static str,
    queue: Arc<Queue<T>>,
    handle: Option<JoinHandle<()>>,
}

/// Start `work` on a thread named `jsb-<name>` producing into a new queue
/// capped at `limit` items.
///
/// A `work` error is logged and stored as the queue's failure; either way
/// the queue ends `PRODUCER_FIN`.
pub fn spawn_stage<T, F>(
    name: &'static str,
    limit: Option<usize>,
    work: F,
) -> Result<Stage<T>, StageError>
where
    T: Send + 'static,
    F: FnOnce(&Producer<T>) -> Result<(), StageError> + Send + 'static,
{
    let queue = Arc::new(Queue::threaded(limit));
    let thread_queue = Arc::clone(&queue);
    let handle = thread::Builder::new()
        .name(format!("jsb-{name}"))
        .spawn(move || {
            let _fin = FinGuard {
                stage: name,
                queue: Arc::clone(&thread_queue),
            };
            let span = debug_span!("stage", name);
            let _enter = span.enter();
            debug!("stage started");

            let producer = Producer {
                queue: thread_queue,
                sent: Cell::new(0),
            };
            match work(&producer) {
                Ok(()) => debug!(sent = producer.sent(), "stage finished"),
                Err(err) => {
                    error!(error = %err, sent = producer.sent(), "stage failed");
                    producer.queue.set_failed(err);
                }
            }
        })
        .map_err(|err| StageError::from_error(name, &err))?;

    Ok(Stage {
        name,
        queue,
        handle: Some(handle),
    })
}

impl<T> Stage<T> {
    /// Stage name, as used in the thread name and errors.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Next item, waiting for the producer. `None` once the stage is done.
    pub fn recv(&self) -> Option<T> {
        self.queue.dequeue_blocking()
    }

    /// Apply `f` to the next item without taking it.
    pub fn peek_with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.queue.peek_head_blocking_with(f)
    }

    /// Discard items until the next one satisfies `stop`.
    pub fn consume_until(&self, stop: impl FnMut(&T) -> bool) -> bool {
        self.queue.consume_until(stop)
    }

    /// The stage's output queue.
    pub fn queue(&self) -> &Queue<T> {
        &self.queue
    }

    /// The producer's stored failure, if any.
    pub fn failure(&self) -> Option<StageError> {
        self.queue.failure()
    }

    /// Halt the producer, drop whatever it still has queued, and join it.
    ///
    /// Idempotent. Safe while the producer is blocked on a full queue.
    pub fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.queue.halt_producer();
        while self.queue.dequeue_blocking().is_some() {}
        if handle.join().is_err() {
            debug!(stage = self.name, "stage thread panicked");
        }
    }

    /// Shut the stage down and report its failure, if it had one.
    pub fn finish(mut self) -> Result<(), StageError> {
        self.shutdown();
        match self.queue.failure() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<T> Iterator for Stage<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.recv()
    }
}

impl<T> Drop for Stage<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
