use im::OrdSet;
use rand::Rng;
use crate::structures::ConcurrentSet;
use super::linearizability_tester::ThreadLog;

/// Sequential specification of an id set.
pub type SetModel = OrdSet<i32>;

pub fn sequential_insert(set: &SetModel, id: Option<i32>) -> (SetModel, bool) {
    match id {
        Some(id) if !set.contains(&id) => (set.update(id), true),
        _ => (set.clone(), false)
    }
}

pub fn sequential_remove(set: &SetModel, id: Option<i32>) -> (SetModel, bool) {
    match id {
        Some(id) if set.contains(&id) => (set.without(&id), true),
        _ => (set.clone(), false)
    }
}

pub fn sequential_lookup(set: &SetModel, id: Option<i32>) -> (SetModel, bool) {
    let found = id.map_or(false, |id| set.contains(&id));
    (set.clone(), found)
}

/// Issue `ops` random inserts, removes and lookups over `0..keys`, logging each.
pub fn random_set_ops<S, R>(log: &mut ThreadLog<S, SetModel, i32, bool>, rng: &mut R, ops: usize, keys: i32)
where S: ConcurrentSet,
      R: Rng
{
    for _ in 0..ops {
        let id = rng.gen_range(0..keys);
        match rng.gen_range(0..3) {
            0 => { log.log_val(S::insert, id, format!("insert({})", id), sequential_insert); },
            1 => { log.log_val(S::remove, id, format!("remove({})", id), sequential_remove); },
            _ => { log.log_val(S::lookup, id, format!("lookup({})", id), sequential_lookup); }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{sequential_insert, sequential_lookup, sequential_remove, SetModel};

    #[test]
    fn test_model() {
        let empty = SetModel::new();
        let (one, inserted) = sequential_insert(&empty, Some(1));
        assert!(inserted);
        assert!(!sequential_insert(&one, Some(1)).1);
        assert!(sequential_lookup(&one, Some(1)).1);
        assert!(!sequential_lookup(&empty, Some(1)).1);
        let (none, removed) = sequential_remove(&one, Some(1));
        assert!(removed);
        assert_eq!(none, empty);
        assert!(!sequential_remove(&none, Some(1)).1);
    }
}
