use std::sync::atomic::{AtomicPtr, Ordering};
use std::fmt::Debug;
use thread_local::ThreadLocal;
use std::collections::HashSet;
use std::cell::RefCell;
use std::fmt;
use std::ptr;

/// Hazard pointer based reclamation, after Michael's [Hazard Pointers: Safe Memory
/// Reclamation for Lock-Free Objects](https://ieeexplore.ieee.org/document/1291819).
///
/// Every thread owns `num_hp_per_thread` hazard slots, published on a global list
/// that only ever grows. A record handed to `retire` is freed by a later `scan` of
/// the retiring thread, once no slot of any thread still protects it.
pub struct HPBRManager<T: Send> {
    thread_info: ThreadLocal<RefCell<ThreadLocalInfo<T>>>,
    head: AtomicPtr<HazardPointer<T>>,
    max_retired: usize,
    num_hp_per_thread: usize
}

impl<T: Send> Debug for HPBRManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let retired = match self.thread_info.get() {
            None => 0,
            Some(cell) => cell.borrow().retired_list.len()
        };

        write!(f, "HPBRManager(head: {:?}, max_retired: {:?}, retired_here: {:?})", self.head, self.max_retired, retired)
    }
}

impl<T: Send> HPBRManager<T> {
    pub fn new(max_retired: usize, num_hp_per_thread: usize) -> Self {
        HPBRManager {
            thread_info: ThreadLocal::new(),
            head: AtomicPtr::default(),
            max_retired,
            num_hp_per_thread
        }
    }

    fn allocate_hp(&self) -> *mut HazardPointer<T> {
        let new_hp_ptr = Box::into_raw(Box::new(HazardPointer::new()));

        // CAS push the new hazard pointer onto the global list
        // Hazard pointers are only freed when the manager is dropped
        loop {
            let old_head = self.head.load(Ordering::Acquire);
            unsafe {
                (*new_hp_ptr).next.store(old_head, Ordering::Release);
            }
            if self.head.compare_exchange(old_head, new_hp_ptr, Ordering::AcqRel, Ordering::Acquire).is_ok() {
                break;
            }
        }

        new_hp_ptr
    }

    /// Retire a record that has been unlinked from its structure, releasing the
    /// given hazard slot. The caller must not publish `record` again.
    pub fn retire(&self, record: *mut T, hazard_num: usize) {
        self.with_thread_info(|thread_info| {
            thread_info.hazard_pointer(hazard_num).unprotect();
            thread_info.retired_list.push(record);

            if thread_info.retired_list.len() > self.max_retired {
                self.scan(thread_info);
            }
        });
    }

    /// Publish `record` in the given slot. The caller has to validate that the
    /// record is still reachable afterwards before dereferencing it.
    pub fn protect(&self, record: *mut T, hazard_num: usize) {
        self.with_thread_info(|thread_info| {
            thread_info.hazard_pointer(hazard_num).protect(record);
        });
    }

    pub fn unprotect(&self, hazard_num: usize) {
        self.with_thread_info(|thread_info| {
            thread_info.hazard_pointer(hazard_num).unprotect();
        });
    }

    /// Release every slot of the calling thread.
    pub fn clear(&self) {
        self.with_thread_info(|thread_info| {
            for hp in &thread_info.local_hazards {
                unsafe { (**hp).unprotect() };
            }
        });
    }

    /// Number of records the calling thread has retired but not yet freed.
    pub fn retired_count(&self) -> usize {
        self.thread_info.get().map_or(0, |cell| cell.borrow().retired_list.len())
    }

    /// Deletes any retired nodes of this thread which are not protected by hazard pointers
    fn scan(&self, thread_info: &mut ThreadLocalInfo<T>) {
        let mut hazard_set: HashSet<*mut T> = HashSet::new();
        let mut current = self.head.load(Ordering::Acquire);

        while !current.is_null() {
            unsafe {
                let hazard_pointer = &*current;
                let protected = hazard_pointer.protected.load(Ordering::SeqCst);
                if !protected.is_null() {
                    hazard_set.insert(protected);
                }
                current = hazard_pointer.next.load(Ordering::Acquire);
            }
        }

        let before = thread_info.retired_list.len();
        thread_info.retired_list.retain(|ptr| {
            if hazard_set.contains(ptr) {
                true
            } else {
                unsafe { Self::free(*ptr) };
                false
            }
        });
        trace!("hazard scan freed {} of {} retired records", before - thread_info.retired_list.len(), before);
    }

    /// Free every retired record of every thread.
    pub fn purge(&mut self) -> usize {
        let mut freed = 0;
        for cell in self.thread_info.iter_mut() {
            let thread_info = cell.get_mut();
            for ptr in thread_info.retired_list.drain(..) {
                unsafe { Self::free(ptr) };
                freed += 1;
            }
        }
        freed
    }

    unsafe fn free(garbage: *mut T) {
        // Letting this box go out of scope calls Drop on the garbage
        drop(Box::from_raw(garbage));
    }

    /// Run `f` on the calling thread's info. On first access, allocates the
    /// thread's hazard pointers and adds them to the central list.
    fn with_thread_info<R, F: FnOnce(&mut ThreadLocalInfo<T>) -> R>(&self, f: F) -> R {
        let cell = self.thread_info.get_or(|| {
            let mut starting_hp: Vec<*mut HazardPointer<T>> = Vec::with_capacity(self.num_hp_per_thread);
            for _ in 0..self.num_hp_per_thread {
                starting_hp.push(self.allocate_hp());
            }
            RefCell::new(ThreadLocalInfo::new(starting_hp))
        });
        let mut thread_info = cell.borrow_mut();
        f(&mut thread_info)
    }
}

impl<T: Send> Drop for HPBRManager<T> {
    fn drop(&mut self) {
        self.purge();
        let mut current = *self.head.get_mut();
        while !current.is_null() {
            unsafe {
                let hazard_pointer = Box::from_raw(current);
                current = hazard_pointer.next.load(Ordering::Relaxed);
            }
        }
    }
}

struct HazardPointer<T: Send> {
    protected: AtomicPtr<T>,
    next: AtomicPtr<HazardPointer<T>>
}

impl<T: Send> HazardPointer<T> {
    fn new() -> Self {
        HazardPointer {
            protected: AtomicPtr::default(),
            next: AtomicPtr::default()
        }
    }

    fn protect(&self, record: *mut T) {
        self.protected.store(record, Ordering::SeqCst);
    }

    fn unprotect(&self) {
        self.protected.store(ptr::null_mut(), Ordering::Release);
    }
}

// The raw pointers are either hazard records owned by the manager or retired
// records owned by this list; a recycled thread slot inherits both.
unsafe impl<T: Send> Send for ThreadLocalInfo<T> {}

struct ThreadLocalInfo<T: Send> {
    local_hazards: Vec<*mut HazardPointer<T>>,
    retired_list: Vec<*mut T>
}

impl<T: Send> ThreadLocalInfo<T> {
    fn new(starting_hazards: Vec<*mut HazardPointer<T>>) -> Self {
        ThreadLocalInfo {
            local_hazards: starting_hazards,
            retired_list: Vec::new()
        }
    }

    fn hazard_pointer(&self, hazard_index: usize) -> &HazardPointer<T> {
        unsafe { &*self.local_hazards[hazard_index] }
    }
}
