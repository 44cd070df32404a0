use rayon::ThreadPoolBuilder;
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use crate::error::Result;
use super::automaton::{Configuration, ThreadState};
use super::time_stamped::{Clock, Event, TimeStamped};

/// Sequential counterpart of a concurrent operation: the state after the
/// operation and its result.
pub type SequentialOp<Seq, Val, Ret> = fn(&Seq, Option<Val>) -> (Seq, Ret);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinearizabilityResult {
    Success,
    /// No linearization exists; describes the first return that could not be explained.
    Failure(String)
}

struct Operation<Seq, Val, Ret> {
    thread: usize,
    message: String,
    arg: Option<Val>,
    result: Ret,
    seq_method: SequentialOp<Seq, Val, Ret>,
    invoked: usize,
    returned: usize
}

/// Records the operations one worker thread performs on the concurrent object.
pub struct ThreadLog<'a, C: 'a, Seq, Val, Ret> {
    id: usize,
    concurrent: &'a C,
    clock: &'a Clock,
    history: Vec<Operation<Seq, Val, Ret>>
}

impl<'a, C: 'a, Seq, Val: Clone, Ret: Clone> ThreadLog<'a, C, Seq, Val, Ret> {
    fn new(id: usize, concurrent: &'a C, clock: &'a Clock) -> Self {
        ThreadLog {
            id,
            concurrent,
            clock,
            history: Vec::new()
        }
    }

    /// Perform `op` with argument `val` and record it, along with its sequential
    /// counterpart and a message used in failure reports.
    pub fn log_val<F>(&mut self, op: F, val: Val, message: String, seq_method: SequentialOp<Seq, Val, Ret>) -> Ret
    where F: FnOnce(&C, Val) -> Ret
    {
        let invoked = self.clock.tick();
        let result = op(self.concurrent, val.clone());
        let returned = self.clock.tick();
        self.push(message, Some(val), result.clone(), seq_method, invoked, returned);
        result
    }

    fn push(&mut self, message: String, arg: Option<Val>, result: Ret, seq_method: SequentialOp<Seq, Val, Ret>, invoked: usize, returned: usize) {
        self.history.push(Operation {
            thread: self.id,
            message,
            arg,
            result,
            seq_method,
            invoked,
            returned
        });
    }
}

/// Checks that the histories produced by concurrent workers are linearizable with
/// respect to a sequential specification.
pub struct LinearizabilityTester<C, Seq, Val, Ret> {
    num_threads: usize,
    concurrent: C,
    sequential: Seq,
    marker: PhantomData<fn(Val) -> Ret>
}

impl<C, Seq, Val, Ret> LinearizabilityTester<C, Seq, Val, Ret>
where C: Sync,
      Seq: Clone + Hash + Eq,
      Val: Clone + Send,
      Ret: Clone + PartialEq + Send + Debug
{
    pub fn new(num_threads: usize, concurrent: C, sequential: Seq) -> Self {
        LinearizabilityTester {
            num_threads,
            concurrent,
            sequential,
            marker: PhantomData
        }
    }

    /// Run `worker` once on each of `num_threads` threads, then search for a
    /// linearization of everything they logged.
    pub fn run<W>(&mut self, worker: W) -> Result<LinearizabilityResult>
    where W: Fn(usize, &mut ThreadLog<C, Seq, Val, Ret>) + Sync
    {
        let clock = Clock::new();
        let mut logs: Vec<ThreadLog<C, Seq, Val, Ret>> = (0..self.num_threads)
            .map(|id| ThreadLog::new(id, &self.concurrent, &clock))
            .collect();

        let pool = ThreadPoolBuilder::new().num_threads(self.num_threads).build()?;
        let worker = &worker;
        pool.scope(|scope| {
            for log in logs.iter_mut() {
                scope.spawn(move |_| worker(log.id, log));
            }
        });

        let history: Vec<Operation<Seq, Val, Ret>> = logs.into_iter().flat_map(|log| log.history).collect();
        debug!("checking a history of {} operations", history.len());
        Ok(check(&self.sequential, self.num_threads, &history))
    }
}

/// Just-in-time linearization: replay invocations and returns in stamp order,
/// keeping every configuration the history so far can be in. An operation is only
/// linearized when its return forces it, together with whatever pending operations
/// have to precede it.
fn check<Seq, Val, Ret>(initial: &Seq, num_threads: usize, history: &[Operation<Seq, Val, Ret>]) -> LinearizabilityResult
where Seq: Clone + Hash + Eq,
      Val: Clone,
      Ret: PartialEq + Debug
{
    let mut events: Vec<TimeStamped> = Vec::with_capacity(history.len() * 2);
    for (index, op) in history.iter().enumerate() {
        events.push(TimeStamped::new_invoke(op.invoked, index));
        events.push(TimeStamped::new_return(op.returned, index));
    }
    events.sort();

    let mut configs: HashSet<Configuration<Seq>> = HashSet::new();
    configs.insert(Configuration::new(initial.clone(), num_threads));

    for event in events {
        match event.event {
            Event::Invoke(index) => {
                let thread = history[index].thread;
                configs = configs.into_iter()
                    .map(|config| config.with_state(thread, ThreadState::Called(index)))
                    .collect();
            },
            Event::Return(index) => {
                configs = linearize(&configs, history, index);
                if configs.is_empty() {
                    let op = &history[index];
                    return LinearizabilityResult::Failure(format!(
                        "thread {}: `{}` returning {:?} cannot be linearized", op.thread, op.message, op.result));
                }
            }
        }
    }

    LinearizabilityResult::Success
}

/// All configurations reachable from `configs` in which operation `index` has
/// taken effect, with its thread moved back to `Returned`.
fn linearize<Seq, Val, Ret>(configs: &HashSet<Configuration<Seq>>, history: &[Operation<Seq, Val, Ret>], index: usize) -> HashSet<Configuration<Seq>>
where Seq: Clone + Hash + Eq,
      Val: Clone,
      Ret: PartialEq
{
    let thread = history[index].thread;
    let mut found = HashSet::new();
    let mut seen: HashSet<Configuration<Seq>> = configs.clone();
    let mut stack: Vec<Configuration<Seq>> = configs.iter().cloned().collect();

    while let Some(config) = stack.pop() {
        if config.states[thread] == ThreadState::Linearized(index) {
            found.insert(config.with_state(thread, ThreadState::Returned));
            continue;
        }
        for (other, op_index) in config.pending() {
            let op = &history[op_index];
            let (sequential, result) = (op.seq_method)(&config.sequential, op.arg.clone());
            if result != op.result {
                continue;
            }
            let mut next = config.with_state(other, ThreadState::Linearized(op_index));
            next.sequential = sequential;
            if seen.insert(next.clone()) {
                stack.push(next);
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::{check, LinearizabilityResult, Operation};
    use crate::testing::set_model::{sequential_insert, sequential_lookup, sequential_remove, SetModel};

    fn op(thread: usize, invoked: usize, returned: usize, name: &str, arg: i32, result: bool) -> Operation<SetModel, i32, bool> {
        let seq_method = match name {
            "insert" => sequential_insert,
            "remove" => sequential_remove,
            _ => sequential_lookup
        };
        Operation { thread, message: format!("{}({})", name, arg), arg: Some(arg), result, seq_method, invoked, returned }
    }

    #[test]
    fn test_sequential_history() {
        let history = vec![
            op(0, 0, 1, "insert", 5, true),
            op(0, 2, 3, "insert", 5, false),
            op(0, 4, 5, "remove", 5, true),
            op(0, 6, 7, "lookup", 5, false),
            op(0, 8, 9, "remove", 5, false),
        ];
        assert_eq!(check(&SetModel::new(), 1, &history), LinearizabilityResult::Success);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let history = vec![
            op(0, 0, 1, "insert", 5, true),
            op(0, 2, 3, "insert", 5, true),
        ];
        match check(&SetModel::new(), 1, &history) {
            LinearizabilityResult::Failure(message) => assert!(message.contains("insert(5)")),
            LinearizabilityResult::Success => panic!("duplicate insert accepted")
        }
    }

    #[test]
    fn test_overlapping_operations_reorder() {
        // The lookup overlaps the insert, so it may take effect after it
        let history = vec![
            op(0, 0, 3, "insert", 1, true),
            op(1, 1, 2, "lookup", 1, true),
        ];
        assert_eq!(check(&SetModel::new(), 2, &history), LinearizabilityResult::Success);
    }

    #[test]
    fn test_real_time_order_enforced() {
        // The lookup starts after the insert returned and must see it
        let history = vec![
            op(0, 0, 1, "insert", 1, true),
            op(1, 2, 3, "lookup", 1, false),
        ];
        assert!(check(&SetModel::new(), 2, &history) != LinearizabilityResult::Success);
    }

    #[test]
    fn test_concurrent_duplicate_inserts_rejected() {
        // Two overlapping inserts of the same id cannot both succeed
        let history = vec![
            op(0, 0, 2, "insert", 3, true),
            op(1, 1, 3, "insert", 3, true),
        ];
        assert!(check(&SetModel::new(), 2, &history) != LinearizabilityResult::Success);
    }
}
