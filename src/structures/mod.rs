//! Concurrent linked-list sets of integer ids.
//!
//! All three sets implement [`ConcurrentSet`](trait.ConcurrentSet.html) with the same
//! observable behavior and differ only in how they synchronize:
//!
//! * [`CoarseListSet`](struct.CoarseListSet.html) serializes everything on one lock.
//! * [`FineListSet`](struct.FineListSet.html) locks node by node, hand-over-hand.
//! * [`LockFreeListSet`](struct.LockFreeListSet.html) uses compare-and-swap on marked
//!   links and reclaims nodes through hazard pointers.

pub use self::set::{ConcurrentSet, SENTINEL_ID};
pub use self::coarse_list::CoarseListSet;
pub use self::fine_list::FineListSet;
pub use self::lock_free_list::LockFreeListSet;

mod set;
mod coarse_list;
mod fine_list;
mod lock_free_list;
mod utils;
