//! The throughput benchmark driving a set from many threads.
//!
//! A run seeds a fresh set, lets `threads` workers issue their share of
//! pseudo-random operations against it through a shared `Arc` handle, and times
//! them until all have joined. Afterwards the set is drained and the number of
//! destroyed members is checked against the bookkeeping of the workers.

pub use self::config::{SetKind, WorkloadConfig};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::ops::AddAssign;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use crate::error::{Error, Result};
use crate::structures::{CoarseListSet, ConcurrentSet, FineListSet, LockFreeListSet};

mod config;

/// What one worker did, by operation and outcome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub inserts: u64,
    pub inserted: u64,
    pub removes: u64,
    pub removed: u64,
    pub lookups: u64,
    pub found: u64,
}

impl Tally {
    pub fn operations(&self) -> u64 {
        self.inserts + self.removes + self.lookups
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, other: Tally) {
        self.inserts += other.inserts;
        self.inserted += other.inserted;
        self.removes += other.removes;
        self.removed += other.removed;
        self.lookups += other.lookups;
        self.found += other.found;
    }
}

/// Outcome of one run at a fixed thread count.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub kind: Option<SetKind>,
    pub threads: usize,
    pub elapsed: Duration,
    /// Distinct ids present before the workers started.
    pub seeded: usize,
    pub tally: Tally,
    /// Members counted by a traversal after all workers joined.
    pub members: usize,
    /// Members destroyed by the final drain.
    pub drained: usize,
}

impl RunReport {
    /// Members the ABSENT/PRESENT bookkeeping of the workers predicts.
    pub fn expected_members(&self) -> usize {
        (self.seeded as u64 + self.tally.inserted).saturating_sub(self.tally.removed) as usize
    }

    /// Whether traversal, drain and bookkeeping agree.
    pub fn is_consistent(&self) -> bool {
        self.members == self.expected_members() && self.drained == self.members
    }

    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 { 0.0 } else { self.tally.operations() as f64 / secs }
    }
}

/// Insert `config.initial` distinct random ids. Returns how many were inserted.
pub fn seed<S: ConcurrentSet>(set: &S, config: &WorkloadConfig) -> usize {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut seeded = 0;
    while seeded < config.initial {
        if set.insert(rng.gen_range(0..config.elems) as i32) {
            seeded += 1;
        }
    }
    debug!("seeded {} ids out of 0..{}", seeded, config.elems);
    seeded
}

/// One worker's private operation sequence.
fn work<S: ConcurrentSet>(set: &S, config: &WorkloadConfig, index: usize, threads: usize) -> Tally {
    let mut rng = SmallRng::seed_from_u64(config.seed.wrapping_add(index as u64));
    let mut tally = Tally::default();

    for _ in 0..config.iterations / threads {
        let task = rng.gen_range(0..config.ratio);
        let id = rng.gen_range(0..config.elems) as i32;

        match task {
            0 => {
                tally.inserts += 1;
                if set.insert(id) { tally.inserted += 1 }
            },
            1 => {
                tally.removes += 1;
                if set.remove(id) { tally.removed += 1 }
            },
            _ => {
                tally.lookups += 1;
                if set.lookup(id) { tally.found += 1 }
            }
        }
    }

    tally
}

/// Run the workload once with `threads` workers against a fresh `S`.
pub fn run<S: ConcurrentSet + Default + 'static>(config: &WorkloadConfig, threads: usize) -> Result<RunReport> {
    config.validate()?;
    if threads == 0 {
        return Err(Error::InvalidConfig("a run needs at least one thread".to_owned()));
    }

    let mut set = Arc::new(S::default());
    let seeded = seed(&*set, config);

    let start = Instant::now();
    let mut handles = Vec::with_capacity(threads);
    for index in 0..threads {
        let set_copy = set.clone();
        let config_copy = config.clone();
        let handle = thread::Builder::new()
            .name(format!("worker-{}", index))
            .spawn(move || work(&*set_copy, &config_copy, index, threads))?;
        handles.push(handle);
    }

    let mut tally = Tally::default();
    for (index, handle) in handles.into_iter().enumerate() {
        let worker_tally = handle.join().map_err(|_| Error::WorkerPanicked { thread: index })?;
        debug!("worker {} finished: {:?}", index, worker_tally);
        tally += worker_tally;
    }
    let elapsed = start.elapsed();

    let set = Arc::get_mut(&mut set).ok_or(Error::SetStillShared)?;
    let members = set.len();
    let drained = set.drain();

    let report = RunReport {
        kind: None,
        threads,
        elapsed,
        seeded,
        tally,
        members,
        drained,
    };
    if !report.is_consistent() {
        warn!("inconsistent run with {} threads: {} members, {} drained, {} expected",
              threads, report.members, report.drained, report.expected_members());
    }
    Ok(report)
}

/// Run `kind` once per thread count of the configuration.
pub fn sweep(config: &WorkloadConfig, kind: SetKind) -> Result<Vec<RunReport>> {
    config.validate()?;
    let mut reports = Vec::new();
    for threads in config.thread_counts() {
        let mut report = match kind {
            SetKind::Coarse => run::<CoarseListSet>(config, threads)?,
            SetKind::Fine => run::<FineListSet>(config, threads)?,
            SetKind::LockFree => run::<LockFreeListSet>(config, threads)?,
        };
        report.kind = Some(kind);
        info!("{} set, {} threads: {} ms, {:.0} ops/s",
              kind, threads, report.elapsed.as_millis(), report.ops_per_sec());
        reports.push(report);
    }
    Ok(reports)
}
