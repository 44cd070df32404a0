//! A module for lock-free memory management.
//!
//! The struct in this module allows for lock-free memory management, meaning that
//! it can be used in the development of lock-free data structures. It ensures that
//! no node is freed while another thread can still access it, which also rules out
//! the [ABA problem](https://en.wikipedia.org/wiki/ABA_problem) on protected nodes.

pub use self::hazardpointers::HPBRManager;
mod hazardpointers;
