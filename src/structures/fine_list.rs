use parking_lot::RawMutex;
use parking_lot::lock_api::RawMutex as RawMutexApi;
use std::cell::UnsafeCell;
use std::fmt;
use std::ptr;
use super::set::{ConcurrentSet, SENTINEL_ID};

/// A linked-list set with one lock per node, traversed hand-over-hand.
///
/// A traversal holds the lock of the node it stands on and acquires the lock of
/// the successor before releasing it, so locks are always taken in chain order.
/// `insert` and `remove` keep the predecessor locked from the check until the
/// link or unlink, which makes each of them atomic. New members are appended at
/// the tail, where a failed search ends holding the last node's lock.
///
/// Unlinked nodes are freed immediately. Reaching a node requires holding its
/// predecessor's lock, and the remover holds that lock while it unlinks, so no
/// other thread can still be on its way to the node.
pub struct FineListSet {
    sentinel: Node
}

// Every `next` field is only read or written while holding the owning node's lock.
unsafe impl Send for FineListSet {}
unsafe impl Sync for FineListSet {}

struct Node {
    id: i32,
    lock: RawMutex,
    next: UnsafeCell<*mut Node>
}

impl Node {
    fn new(id: i32) -> Self {
        Node {
            id,
            lock: RawMutex::INIT,
            next: UnsafeCell::new(ptr::null_mut())
        }
    }

    unsafe fn next(&self) -> *mut Node {
        *self.next.get()
    }

    unsafe fn set_next(&self, next: *mut Node) {
        *self.next.get() = next;
    }
}

/// The two nodes a search stops at. `pred` is always locked, `curr` is locked
/// when non-null and then holds the searched id.
struct Window {
    pred: *const Node,
    curr: *mut Node
}

impl Window {
    unsafe fn release(&self) {
        if !self.curr.is_null() {
            (*self.curr).lock.unlock();
        }
        (*self.pred).lock.unlock();
    }
}

impl FineListSet {
    pub fn new() -> Self {
        FineListSet {
            sentinel: Node::new(SENTINEL_ID)
        }
    }

    /// Lock-coupled search for `id`. When absent, `pred` is the last node.
    unsafe fn locate(&self, id: i32) -> Window {
        let mut pred: *const Node = &self.sentinel;
        (*pred).lock.lock();
        let mut curr = (*pred).next();
        while !curr.is_null() {
            (*curr).lock.lock();
            if (*curr).id == id {
                break;
            }
            (*pred).lock.unlock();
            pred = curr;
            curr = (*curr).next();
        }
        Window { pred, curr }
    }
}

impl Default for FineListSet {
    fn default() -> Self {
        FineListSet::new()
    }
}

impl ConcurrentSet for FineListSet {
    fn insert(&self, id: i32) -> bool {
        unsafe {
            let window = self.locate(id);
            if !window.curr.is_null() {
                window.release();
                return false;
            }
            let node = Box::into_raw(Box::new(Node::new(id)));
            (*window.pred).set_next(node);
            window.release();
            true
        }
    }

    fn remove(&self, id: i32) -> bool {
        unsafe {
            let window = self.locate(id);
            if window.curr.is_null() {
                window.release();
                return false;
            }
            (*window.pred).set_next((*window.curr).next());
            window.release();
            drop(Box::from_raw(window.curr));
            true
        }
    }

    fn lookup(&self, id: i32) -> bool {
        unsafe {
            let window = self.locate(id);
            let found = !window.curr.is_null();
            window.release();
            found
        }
    }

    fn snapshot(&self) -> Vec<i32> {
        let mut ids = Vec::new();
        unsafe {
            let mut pred: *const Node = &self.sentinel;
            (*pred).lock.lock();
            let mut curr = (*pred).next();
            while !curr.is_null() {
                (*curr).lock.lock();
                ids.push((*curr).id);
                (*pred).lock.unlock();
                pred = curr;
                curr = (*curr).next();
            }
            (*pred).lock.unlock();
        }
        ids
    }

    fn drain(&mut self) -> usize {
        let mut deleted = 0;
        let mut current = ::std::mem::replace(self.sentinel.next.get_mut(), ptr::null_mut());
        while !current.is_null() {
            let node = unsafe { Box::from_raw(current) };
            current = node.next.into_inner();
            deleted += 1;
        }
        deleted
    }
}

impl Drop for FineListSet {
    fn drop(&mut self) {
        self.drain();
    }
}

impl fmt::Debug for FineListSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.snapshot()).finish()
    }
}
