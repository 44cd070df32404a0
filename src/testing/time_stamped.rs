use std::cmp::Ordering;
use std::sync::atomic::{self, AtomicUsize};

/// A logical clock shared by every thread of a test run. Stamps are unique and,
/// being taken with `SeqCst`, respect real-time order: an operation that returned
/// before another was invoked has the smaller stamps.
#[derive(Debug, Default)]
pub struct Clock {
    ticks: AtomicUsize
}

impl Clock {
    pub fn new() -> Self {
        Clock::default()
    }

    pub fn tick(&self) -> usize {
        self.ticks.fetch_add(1, atomic::Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeStamped {
    pub stamp: usize,
    pub event: Event
}

/// Invocation or return of the operation with the given index in the history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Invoke(usize),
    Return(usize)
}

impl TimeStamped {
    pub fn new_invoke(stamp: usize, op: usize) -> Self {
        TimeStamped { stamp, event: Event::Invoke(op) }
    }

    pub fn new_return(stamp: usize, op: usize) -> Self {
        TimeStamped { stamp, event: Event::Return(op) }
    }
}

impl Ord for TimeStamped {
    fn cmp(&self, other: &Self) -> Ordering {
        self.stamp.cmp(&other.stamp)
    }
}

impl PartialOrd for TimeStamped {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
