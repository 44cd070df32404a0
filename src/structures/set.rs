/// Id stored in the sentinel node. Traversal starts after the sentinel, so this
/// value never matches a lookup.
pub const SENTINEL_ID: i32 = -1;

/// A concurrent unordered set of integer ids backed by a singly linked list.
///
/// `insert`, `remove` and `lookup` are linearizable: each takes effect atomically
/// at some point between its invocation and its return. The position at which
/// `insert` links a new node is left to the implementation.
pub trait ConcurrentSet: Send + Sync {
    /// Adds `id`. Returns whether it was newly inserted.
    fn insert(&self, id: i32) -> bool;

    /// Removes `id`. Returns whether it was present.
    fn remove(&self, id: i32) -> bool;

    /// Returns whether `id` is currently a member.
    fn lookup(&self, id: i32) -> bool;

    /// The ids found by one traversal of the chain, in chain order.
    ///
    /// Safe to call at any time, but only meaningful when no other thread is
    /// mutating the set.
    fn snapshot(&self) -> Vec<i32>;

    /// Unlinks and frees every remaining node. Returns how many members it destroyed.
    fn drain(&mut self) -> usize;

    fn len(&self) -> usize {
        self.snapshot().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bulk insert, returning how many ids were not already present.
    fn seed<I: IntoIterator<Item = i32>>(&self, ids: I) -> usize
    where Self: Sized
    {
        ids.into_iter().filter(|&id| self.insert(id)).count()
    }
}

/// Invariant check for `debug_assert!`: no id occurs twice in a chain. A cycle
/// revisits an id, so this also terminates on cyclic chains.
pub(crate) fn all_distinct<I: IntoIterator<Item = i32>>(ids: I) -> bool {
    let mut seen = ::std::collections::HashSet::new();
    ids.into_iter().all(|id| seen.insert(id))
}
