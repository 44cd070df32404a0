use std::fmt;
use std::ptr;
use crate::memory::HPBRManager;
use super::set::ConcurrentSet;
use super::utils::atomic_markable::{self, AtomicMarkablePtr};

const MAX_RETIRED: usize = 64;

// Hazard slots: the head snapshot an insert links after, the predecessor of the
// current node, and the current node.
const HP_FIRST: usize = 0;
const HP_PREV: usize = 1;
const HP_CUR: usize = 2;
const NUM_HP: usize = 3;

/// A lock-free linked-list set, after Harris' [A Pragmatic Implementation of
/// Non-Blocking Linked-Lists](https://doi.org/10.1007/3-540-45414-4_21) with the
/// hazard pointer traversal of Michael's [High Performance Dynamic Lock-Free Hash
/// Tables and List-Based Sets](https://dl.acm.org/citation.cfm?id=564870).
///
/// A remove first marks the victim's `next` link, which is the point where the id
/// leaves the set, then swings the predecessor past it. Any traversal that meets a
/// marked node helps to unlink it. Unlinked nodes are retired to a hazard pointer
/// manager and freed once no thread protects them.
///
/// Inserts link at the head with a single compare-and-swap against the head
/// snapshot taken before the search. Since nodes only ever enter the chain at the
/// head, a successful swap proves that no insert raced with the search.
pub struct LockFreeListSet {
    head: AtomicMarkablePtr<Node>,
    manager: HPBRManager<Node>
}

struct Node {
    id: i32,
    next: AtomicMarkablePtr<Node>
}

impl Node {
    fn new(id: i32) -> Self {
        Node {
            id,
            next: AtomicMarkablePtr::default()
        }
    }
}

/// Result of a search: `prev` is the link that held `cur` when it was validated,
/// `cur` the matching node or null.
struct Position {
    prev: *const AtomicMarkablePtr<Node>,
    cur: *mut Node
}

impl LockFreeListSet {
    pub fn new() -> Self {
        LockFreeListSet {
            head: AtomicMarkablePtr::new(ptr::null_mut()),
            manager: HPBRManager::new(MAX_RETIRED, NUM_HP)
        }
    }

    /// Search for the first unmarked node carrying `id`, unlinking marked nodes
    /// on the way. With `id` of `None` it runs to the end of the chain and pushes
    /// every unmarked id into `seen`.
    ///
    /// On return `HP_PREV` protects the node owning `prev` and `HP_CUR` protects `cur`.
    fn find(&self, id: Option<i32>, mut seen: Option<&mut Vec<i32>>) -> Position {
        'retry: loop {
            if let Some(seen) = seen.as_mut() {
                seen.clear();
            }
            let mut prev: *const AtomicMarkablePtr<Node> = &self.head;
            // The sentinel link is never marked
            let mut cur = self.head.load();

            loop {
                if cur.is_null() {
                    return Position { prev, cur };
                }
                self.manager.protect(cur, HP_CUR);
                unsafe {
                    // Still linked, and the predecessor not marked?
                    if (*prev).load() != cur {
                        continue 'retry;
                    }
                    let next = (*cur).next.load();
                    if atomic_markable::is_marked(next) {
                        let succ = atomic_markable::unmark(next);
                        if (*prev).compare_exchange(cur, succ).is_err() {
                            continue 'retry;
                        }
                        self.manager.retire(cur, HP_CUR);
                        cur = succ;
                        continue;
                    }
                    if Some((*cur).id) == id {
                        return Position { prev, cur };
                    }
                    if let Some(seen) = seen.as_mut() {
                        seen.push((*cur).id);
                    }
                    self.manager.protect(cur, HP_PREV);
                    prev = &(*cur).next;
                    cur = next;
                }
            }
        }
    }
}

impl Default for LockFreeListSet {
    fn default() -> Self {
        LockFreeListSet::new()
    }
}

impl ConcurrentSet for LockFreeListSet {
    fn insert(&self, id: i32) -> bool {
        let node = Box::into_raw(Box::new(Node::new(id)));
        let inserted = loop {
            let first = self.head.load();
            if !first.is_null() {
                self.manager.protect(first, HP_FIRST);
                if self.head.load() != first {
                    continue;
                }
            }
            if !self.find(Some(id), None).cur.is_null() {
                // Never published, nobody else can hold it
                unsafe { drop(Box::from_raw(node)) };
                break false;
            }
            unsafe { (*node).next.store(first) };
            if self.head.compare_exchange(first, node).is_ok() {
                break true;
            }
        };
        self.manager.clear();
        inserted
    }

    fn remove(&self, id: i32) -> bool {
        let removed = loop {
            let position = self.find(Some(id), None);
            if position.cur.is_null() {
                break false;
            }
            unsafe {
                let cur = position.cur;
                let next = (*cur).next.load();
                if atomic_markable::is_marked(next) {
                    continue;
                }
                if (*cur).next.compare_and_mark(next).is_err() {
                    continue;
                }
                // Logically removed; unlink now or leave it to the next traversal
                if (*position.prev).compare_exchange(cur, next).is_ok() {
                    self.manager.retire(cur, HP_CUR);
                } else {
                    self.find(Some(id), None);
                }
            }
            break true;
        };
        self.manager.clear();
        removed
    }

    fn lookup(&self, id: i32) -> bool {
        let found = !self.find(Some(id), None).cur.is_null();
        self.manager.clear();
        found
    }

    fn snapshot(&self) -> Vec<i32> {
        let mut ids = Vec::new();
        self.find(None, Some(&mut ids));
        self.manager.clear();
        ids
    }

    fn drain(&mut self) -> usize {
        let mut deleted = 0;
        let mut current = self.head.get_ptr();
        *self.head.get_mut() = ptr::null_mut();
        while let Some(raw) = current {
            let node = unsafe { Box::from_raw(raw) };
            // Marked nodes still linked are garbage, not members
            if !node.next.is_marked() {
                deleted += 1;
            }
            current = node.next.get_ptr();
        }
        self.manager.purge();
        deleted
    }
}

impl Drop for LockFreeListSet {
    fn drop(&mut self) {
        self.drain();
    }
}

impl fmt::Debug for LockFreeListSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.snapshot()).finish()
    }
}
