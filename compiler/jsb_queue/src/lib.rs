//! Producer/consumer plumbing for the jsb pipeline.
//!
//! Every pipeline stage runs on its own named thread and publishes into a
//! [`Queue`]. The next stage (or the final consumer) drains it through the
//! [`Stage`] handle, which owns both the queue and the producer thread so the
//! two are always torn down together.
//!
//! ```text
//! spawn_stage(name, work) ──► thread "jsb-<name>" ── Producer::send ──► Queue<T>
//!                                                                       │
//!                               Stage<T> (recv / peek / finish / Drop) ◄┘
//! ```
//!
//! The same [`Queue`] type doubles as an unthreaded double-ended list
//! (see [`Queue::unthreaded`]); its `&mut self` operations can only be
//! reached by a sole owner, so they never race with a producer thread.

mod queue;
mod stage;

pub use queue::{Queue, QueueStatus, Rejected};
pub use stage::{spawn_stage, Producer, Stage, StageError};
