use parking_lot::Mutex;
use std::fmt;
use super::set::{self, ConcurrentSet, SENTINEL_ID};

type Link = Option<Box<Node>>;

/// A linked-list set serialized by one global lock.
///
/// Every operation, traversal included, runs inside a single critical section on
/// the sentinel. The existence check and the link (or unlink) of a node happen in
/// the same critical section, and a removed node is freed before the lock is
/// released. New members are linked directly after the sentinel.
pub struct CoarseListSet {
    head: Mutex<Node>
}

struct Node {
    id: i32,
    next: Link
}

impl Node {
    fn new(id: i32, next: Link) -> Self {
        Node {
            id,
            next
        }
    }
}

/// Walk from `link` to the link holding the first node with `id`, i.e. the
/// `next` field of its predecessor. Returns the terminating `None` link when
/// `id` is absent.
fn locate(mut link: &mut Link, id: i32) -> &mut Link {
    while link.as_ref().map_or(false, |node| node.id != id) {
        link = match link {
            Some(node) => &mut node.next,
            None => unreachable!()
        };
    }
    link
}

struct Iter<'a> {
    next: Option<&'a Node>
}

impl<'a> Iterator for Iter<'a> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        self.next.map(|node| {
            self.next = node.next.as_ref().map(|next| &**next);
            node.id
        })
    }
}

fn iter(sentinel: &Node) -> Iter<'_> {
    Iter { next: sentinel.next.as_ref().map(|node| &**node) }
}

impl CoarseListSet {
    pub fn new() -> Self {
        CoarseListSet {
            head: Mutex::new(Node::new(SENTINEL_ID, None))
        }
    }
}

impl Default for CoarseListSet {
    fn default() -> Self {
        CoarseListSet::new()
    }
}

impl ConcurrentSet for CoarseListSet {
    fn insert(&self, id: i32) -> bool {
        let mut sentinel = self.head.lock();
        if locate(&mut sentinel.next, id).is_some() {
            return false;
        }
        let first = sentinel.next.take();
        sentinel.next = Some(Box::new(Node::new(id, first)));
        debug_assert!(set::all_distinct(iter(&sentinel)));
        true
    }

    fn remove(&self, id: i32) -> bool {
        let mut sentinel = self.head.lock();
        let link = locate(&mut sentinel.next, id);
        match link.take() {
            None => false,
            Some(mut node) => {
                // Bypass the node, then free it while still holding the lock
                *link = node.next.take();
                drop(node);
                debug_assert!(set::all_distinct(iter(&sentinel)));
                true
            }
        }
    }

    fn lookup(&self, id: i32) -> bool {
        let sentinel = self.head.lock();
        let mut current = sentinel.next.as_ref();
        while let Some(node) = current {
            if node.id == id {
                return true;
            }
            current = node.next.as_ref();
        }
        false
    }

    fn snapshot(&self) -> Vec<i32> {
        iter(&self.head.lock()).collect()
    }

    fn drain(&mut self) -> usize {
        let sentinel = self.head.get_mut();
        let mut deleted = 0;
        // Iteratively, so long chains do not recurse through Box drops
        let mut current = sentinel.next.take();
        while let Some(mut node) = current {
            current = node.next.take();
            deleted += 1;
        }
        deleted
    }
}

impl Drop for CoarseListSet {
    fn drop(&mut self) {
        self.drain();
    }
}

impl fmt::Debug for CoarseListSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(iter(&self.head.lock())).finish()
    }
}
