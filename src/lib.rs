//! Concurrent integer sets built on singly linked lists.
//!
//! Three implementations of `ConcurrentSet` trade simplicity for scalability: a list
//! guarded by one global lock, a list with a lock per node traversed by hand-over-hand
//! locking, and a lock-free list whose removed nodes are reclaimed through hazard pointers.
//! The `workload` module drives any of them from many threads and checks the outcome,
//! and `testing` checks recorded histories for linearizability.

#[macro_use]
extern crate log;

pub mod structures;
pub mod memory;
pub mod testing;
pub mod workload;
mod error;

pub use crate::error::{Error, Result};
