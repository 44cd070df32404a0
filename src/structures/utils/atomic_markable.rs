use std::sync::atomic::AtomicPtr;
use std::sync::atomic::Ordering::SeqCst;

pub fn is_marked<T>(ptr: *mut T) -> bool {
    let ptr_usize = ptr as usize;
    match ptr_usize & 0x1 {
        0 => false,
        _ => true,
    }
}

pub fn unmark<T>(ptr: *mut T) -> *mut T {
    let ptr_usize = ptr as usize;
    (ptr_usize & !(0x1)) as *mut T
}

pub fn mark<T>(ptr: *mut T) -> *mut T {
    let ptr_usize = ptr as usize;
    (ptr_usize | 0x1) as *mut T
}

/// An atomic link whose lowest bit doubles as a logical-deletion mark.
///
/// The pointee must be at least 2-byte aligned. The link does not own what it
/// points to: freeing nodes is left to the structure holding the link.
#[derive(Debug)]
pub struct AtomicMarkablePtr<T: Send> {
    ptr: AtomicPtr<T>
}

impl<T: Send> AtomicMarkablePtr<T> {
    pub fn new(ptr: *mut T) -> Self {
        debug_assert!(!is_marked(ptr));
        AtomicMarkablePtr {
            ptr: AtomicPtr::new(ptr)
        }
    }

    /// The raw link, mark bit included.
    pub fn load(&self) -> *mut T {
        self.ptr.load(SeqCst)
    }

    pub fn store(&self, ptr: *mut T) {
        self.ptr.store(ptr, SeqCst)
    }

    pub fn get_ptr(&self) -> Option<*mut T> {
        let ptr = unmark(self.load());
        if ptr.is_null() { None } else { Some(ptr) }
    }

    pub fn is_marked(&self) -> bool {
        is_marked(self.load())
    }

    /// Set the mark on an unmarked link that still equals `old`.
    pub fn compare_and_mark(&self, old: *mut T) -> Result<*mut T, *mut T> {
        let marked_ptr = mark(old);
        self.ptr.compare_exchange(unmark(old), marked_ptr, SeqCst, SeqCst)
    }

    pub fn compare_exchange(&self, current: *mut T, new: *mut T) -> Result<*mut T, *mut T> {
        self.ptr.compare_exchange(current, new, SeqCst, SeqCst)
    }

    pub fn get_mut(&mut self) -> &mut *mut T {
        self.ptr.get_mut()
    }
}

impl<T: Send> Default for AtomicMarkablePtr<T> {
    fn default() -> Self {
        AtomicMarkablePtr {
            ptr: AtomicPtr::default()
        }
    }
}
