use std::hash::Hash;

/// Where one thread stands in a candidate linearization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThreadState {
    /// No pending operation.
    Returned,
    /// The operation with this index was invoked but is not linearized yet.
    Called(usize),
    /// The operation with this index took effect and awaits its return event.
    Linearized(usize)
}

/// A sequential state together with the state of every thread. Two searches that
/// reach equal configurations continue identically, so the tester memoizes them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Configuration<Seq: Hash + Eq> {
    pub sequential: Seq,
    pub states: Vec<ThreadState>
}

impl<Seq: Hash + Eq + Clone> Configuration<Seq> {
    pub fn new(sequential: Seq, num_threads: usize) -> Self {
        Self {
            sequential,
            states: vec![ThreadState::Returned; num_threads]
        }
    }

    pub fn with_state(&self, thread: usize, state: ThreadState) -> Self {
        let mut next = self.clone();
        next.states[thread] = state;
        next
    }

    /// Threads whose operation is pending, with the operation's index.
    pub fn pending(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.states.iter().enumerate().filter_map(|(thread, state)| match *state {
            ThreadState::Called(op) => Some((thread, op)),
            _ => None
        })
    }
}
