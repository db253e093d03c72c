//! One slot per worker thread, accessed without synchronization — for
//! RNGs, scratch buffers, and deterministic per-worker accumulators (§4.5).

use rayon::current_num_threads;
use std::cell::UnsafeCell;

pub struct PerThreadStorage<T> {
    slots: Vec<UnsafeCell<T>>,
}

impl<T> PerThreadStorage<T> {
    pub fn new(mut make: impl FnMut(usize) -> T) -> Self {
        let num_workers = current_num_threads().max(1);
        PerThreadStorage {
            slots: (0..num_workers).map(|i| UnsafeCell::new(make(i))).collect(),
        }
    }

    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// Runs `f` against the calling worker's slot. The caller must not
    /// re-enter `with` for the same worker while already inside a call for
    /// that worker (no interior aliasing check is performed).
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let idx = rayon::current_thread_index().unwrap_or(0) % self.slots.len();
        // SAFETY: each rayon worker thread maps to exactly one slot and
        // does not migrate mid-closure, so no two threads ever alias the
        // same `UnsafeCell` concurrently.
        let slot = unsafe { &mut *self.slots[idx].get() };
        f(slot)
    }

    /// Drains every slot after all workers have quiesced (i.e. outside any
    /// parallel region touching this storage).
    pub fn into_values(self) -> Vec<T> {
        self.slots.into_iter().map(UnsafeCell::into_inner).collect()
    }
}

unsafe impl<T: Send> Sync for PerThreadStorage<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn each_worker_accumulates_independently() {
        let storage = PerThreadStorage::new(|_| 0u64);
        (0..10_000).into_par_iter().for_each(|_| {
            storage.with(|slot| *slot += 1);
        });
        let total: u64 = storage.into_values().into_iter().sum();
        assert_eq!(total, 10_000);
    }
}
