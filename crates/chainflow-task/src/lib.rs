//! Asynchronous building blocks for chainflow.
//!
//! - [`Slot`] / [`Promise`]: a write-once cell and its single producer.
//! - [`Executor`]: a fixed worker pool fed by one shared FIFO crossbeam
//!   channel.
//! - [`Executor::dataflow`]: a node that runs once all of its
//!   [`Dependency`] slots resolve, inline or on the pool ([`Launch`]).
//! - [`SlotVec`]: a partitioned state, one slot per block, with a
//!   generation counter per index.
//!
//! Faults propagate: a node whose dependency is poisoned is poisoned with
//! the same [`TaskFault`](chainflow_core::TaskFault) without running.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dataflow;
pub mod executor;
pub mod slot;
pub mod slot_vec;

pub use dataflow::{Dependency, Launch};
pub use executor::{Executor, ExecutorConfig};
pub use slot::{Outcome, Promise, Slot};
pub use slot_vec::{BlockState, SlotVec};
