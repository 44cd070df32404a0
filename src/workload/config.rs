use std::fmt;
use std::str::FromStr;
use crate::error::{Error, Result};

/// Which set implementation a workload runs against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SetKind {
    Coarse,
    Fine,
    LockFree,
}

impl SetKind {
    pub const ALL: [SetKind; 3] = [SetKind::Coarse, SetKind::Fine, SetKind::LockFree];

    pub fn name(self) -> &'static str {
        match self {
            SetKind::Coarse => "coarse",
            SetKind::Fine => "fine",
            SetKind::LockFree => "lockfree",
        }
    }
}

impl fmt::Display for SetKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for SetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SetKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown set implementation `{}`", s)))
    }
}

/// Parameters of a benchmark run. The defaults reproduce the classic setup: 100
/// ids, ten million operations per run, and one insert plus one remove per ten
/// thousand operations, everything else being lookups.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkloadConfig {
    /// Ids are drawn from `0..elems`.
    pub elems: usize,
    /// Operations per run, split evenly across the worker threads.
    pub iterations: usize,
    /// Per operation `r = rand % ratio`: 0 inserts, 1 removes, anything else looks up.
    pub ratio: u32,
    /// Runs use 1, 2, 4, ... threads up to this bound.
    pub max_threads: usize,
    /// Base RNG seed; worker `t` uses `seed + t`.
    pub seed: u64,
    /// Distinct ids inserted before the workers start.
    pub initial: usize,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        WorkloadConfig {
            elems: 100,
            iterations: 10_000_000,
            ratio: 10_000,
            max_threads: 32,
            seed: 0,
            initial: 50,
        }
    }
}

impl WorkloadConfig {
    pub fn validate(&self) -> Result<()> {
        if self.elems == 0 {
            return Err(Error::InvalidConfig("elems must be at least 1".to_owned()));
        }
        if self.elems > i32::MAX as usize {
            return Err(Error::InvalidConfig(format!("elems must not exceed {}", i32::MAX)));
        }
        if self.ratio == 0 {
            return Err(Error::InvalidConfig("ratio must be at least 1".to_owned()));
        }
        if self.max_threads == 0 {
            return Err(Error::InvalidConfig("max_threads must be at least 1".to_owned()));
        }
        if self.initial > self.elems {
            return Err(Error::InvalidConfig(format!(
                "cannot seed {} distinct ids out of {}", self.initial, self.elems)));
        }
        Ok(())
    }

    /// Thread counts of a sweep: powers of two up to `max_threads`.
    pub fn thread_counts(&self) -> Vec<usize> {
        let mut counts = Vec::new();
        let mut threads = 1;
        while threads <= self.max_threads {
            counts.push(threads);
            threads *= 2;
        }
        counts
    }
}
