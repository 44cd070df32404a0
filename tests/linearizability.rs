use listset::structures::{CoarseListSet, ConcurrentSet, FineListSet, LockFreeListSet};
use listset::testing::set_model::{random_set_ops, sequential_insert, SetModel};
use listset::testing::{LinearizabilityResult, LinearizabilityTester};
use rand::rngs::SmallRng;
use rand::SeedableRng;

const THREADS: usize = 4;
const OPS: usize = 300;
const KEYS: i32 = 6;

fn check_set<S: ConcurrentSet + Default>() {
    for round in 0..5u64 {
        let mut linearizer: LinearizabilityTester<S, SetModel, i32, bool>
            = LinearizabilityTester::new(THREADS, S::default(), SetModel::new());
        let result = linearizer.run(|id, log| {
            let mut rng = SmallRng::seed_from_u64(round * 100 + id as u64);
            random_set_ops(log, &mut rng, OPS, KEYS);
        }).unwrap();

        println!("{:?}", result);
        assert_eq!(result, LinearizabilityResult::Success);
    }
}

#[test]
fn test_coarse_linearizable() {
    check_set::<CoarseListSet>();
}

#[test]
fn test_fine_linearizable() {
    check_set::<FineListSet>();
}

#[test]
fn test_lock_free_linearizable() {
    check_set::<LockFreeListSet>();
}

#[test]
fn test_seeded_set_linearizable() {
    let set = LockFreeListSet::new();
    set.seed(0..3);
    let model: SetModel = (0..3).collect();
    let mut linearizer: LinearizabilityTester<LockFreeListSet, SetModel, i32, bool>
        = LinearizabilityTester::new(THREADS, set, model);
    let result = linearizer.run(|id, log| {
        let mut rng = SmallRng::seed_from_u64(id as u64);
        random_set_ops(log, &mut rng, OPS, KEYS);
    }).unwrap();
    assert_eq!(result, LinearizabilityResult::Success);
}

/// Claims every insert succeeded.
#[derive(Default)]
struct OverEagerSet {
    inner: CoarseListSet
}

impl ConcurrentSet for OverEagerSet {
    fn insert(&self, id: i32) -> bool {
        self.inner.insert(id);
        true
    }

    fn remove(&self, id: i32) -> bool {
        self.inner.remove(id)
    }

    fn lookup(&self, id: i32) -> bool {
        self.inner.lookup(id)
    }

    fn snapshot(&self) -> Vec<i32> {
        self.inner.snapshot()
    }

    fn drain(&mut self) -> usize {
        self.inner.drain()
    }
}

#[test]
fn test_duplicate_inserts_detected() {
    let mut linearizer: LinearizabilityTester<OverEagerSet, SetModel, i32, bool>
        = LinearizabilityTester::new(2, OverEagerSet::default(), SetModel::new());
    let result = linearizer.run(|_, log| {
        for _ in 0..2 {
            log.log_val(OverEagerSet::insert, 0, "insert(0)".to_owned(), sequential_insert);
        }
    }).unwrap();

    match result {
        LinearizabilityResult::Failure(message) => assert!(message.contains("insert(0)")),
        LinearizabilityResult::Success => panic!("duplicate inserts were accepted")
    }
}
