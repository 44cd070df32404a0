//! Utilities for testing linearizability of concurrent data structures based on the strategy
//! defined by Lowe in [Testing for Linearizability](http://www.cs.ox.ac.uk/people/gavin.lowe/LinearizabiltyTesting/paper.pdf).
//! This should be done by using the LinearizabilityTester struct and the ThreadLog.

//! # Example
//! This is an example of how to use the LinearizabilityTester on a set. The tester needs
//! a sequential reference data structure along with operations defined on it to match those on
//! the concurrent object. `set_model` provides them for integer sets.
//! ```
//! use listset::structures::{ConcurrentSet, LockFreeListSet};
//! use listset::testing::set_model::{sequential_insert, sequential_lookup, SetModel};
//! use listset::testing::{LinearizabilityResult, LinearizabilityTester, ThreadLog};
//!
//! fn worker(id: usize, log: &mut ThreadLog<LockFreeListSet, SetModel, i32, bool>) {
//!     for i in 0..50 {
//!         let val = ((id * 7 + i) % 5) as i32;
//!         if i % 2 == 0 {
//!             log.log_val(LockFreeListSet::insert, val, format!("insert({})", val), sequential_insert);
//!         } else {
//!             log.log_val(LockFreeListSet::lookup, val, format!("lookup({})", val), sequential_lookup);
//!         }
//!     }
//! }
//!
//! let mut linearizer = LinearizabilityTester::new(4, LockFreeListSet::new(), SetModel::new());
//! let result = linearizer.run(worker).unwrap();
//!
//! assert_eq!(result, LinearizabilityResult::Success);
//! ```

pub use self::linearizability_tester::{LinearizabilityTester, LinearizabilityResult, ThreadLog};

pub mod linearizability_tester;
pub mod set_model;
mod time_stamped;
mod automaton;
