//! Per-worker reduction slot, combined at an explicit `reduce()` call.
//!
//! Grounded on the worker-slot pattern the teacher uses for its centrality
//! accumulators (one slot per rayon worker, combined once at the end of a
//! phase) but generalized to an arbitrary associative-commutative combine,
//! per §4.5.

use rayon::current_num_threads;
use std::cell::RefCell;

/// One slot of `T` per worker thread, initialized lazily by `identity`.
/// `combine` must be associative and commutative: callers may reduce in
/// any order.
pub struct Reducer<T, C> {
    slots: Vec<RefCell<T>>,
    combine: C,
}

impl<T, C> Reducer<T, C>
where
    T: Clone,
    C: Fn(T, T) -> T,
{
    pub fn new(identity: T, combine: C) -> Self {
        let num_workers = current_num_threads().max(1);
        Reducer {
            slots: (0..num_workers)
                .map(|_| RefCell::new(identity.clone()))
                .collect(),
            combine,
        }
    }

    /// Updates the calling worker's slot in place. Must be called from
    /// within the thread pool the reducer was built for; the slot index is
    /// `rayon::current_thread_index()` modulo the slot count, falling back
    /// to slot 0 off the pool.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let idx = rayon::current_thread_index().unwrap_or(0) % self.slots.len();
        f(&mut self.slots[idx].borrow_mut());
    }

    /// Combines every slot's current value into one, leaving the reducer
    /// reusable (slots are left at their last value, not reset).
    pub fn reduce(&self) -> T {
        let mut iter = self.slots.iter().map(|slot| slot.borrow().clone());
        let first = iter.next().expect("a reducer always has at least one slot");
        iter.fold(first, &self.combine)
    }
}

// SAFETY: each slot is only ever touched by the worker whose
// `current_thread_index()` maps to it; rayon guarantees a task does not
// migrate mid-closure, so concurrent `update` calls never alias a slot.
unsafe impl<T: Send, C: Send> Sync for Reducer<T, C> {}
