//! Thin, documented wrappers over `rayon` realizing the parallel execution
//! primitives of §4.5. These are not a scheduler reimplementation: every
//! function here delegates to `rayon`'s work-stealing pool, exactly as the
//! teacher crate uses `par_iter` directly rather than rolling its own.

pub mod atomic;
pub mod insert_bag;
pub mod per_thread;
pub mod reducer;

pub use atomic::{atomic_add_u32, atomic_max_u32, atomic_min_u32, atomic_sub_u32, AtomicF64};
pub use insert_bag::InsertBag;
pub use per_thread::PerThreadStorage;
pub use reducer::Reducer;

use rayon::prelude::*;
use std::ops::Range;

/// Runs `body` once per element of `range`, in unspecified order, work
/// stolen across the current thread pool. No cross-task ordering
/// guarantees.
pub fn parallel_for<T, F>(range: Range<T>, body: F)
where
    T: Into<u64> + TryFrom<u64> + Send + Sync + Copy,
    <T as TryFrom<u64>>::Error: std::fmt::Debug,
    F: Fn(T) + Sync + Send,
{
    let start: u64 = range.start.into();
    let end: u64 = range.end.into();
    (start..end).into_par_iter().for_each(|i| {
        body(T::try_from(i).expect("range bounds fit back into T"))
    });
}

/// As [`parallel_for`], with a chunk-size hint: each stolen task covers at
/// least `chunk_size` consecutive elements, amortizing scheduling overhead
/// when the body is very cheap.
pub fn parallel_for_chunked<T, F>(range: Range<T>, chunk_size: usize, body: F)
where
    T: Into<u64> + TryFrom<u64> + Send + Sync + Copy,
    <T as TryFrom<u64>>::Error: std::fmt::Debug,
    F: Fn(T) + Sync + Send,
{
    let start: usize = range.start.into().try_into().expect("range bound fits in usize");
    let end: usize = range.end.into().try_into().expect("range bound fits in usize");
    (start..end)
        .into_par_iter()
        .with_min_len(chunk_size.max(1))
        .for_each(|i| {
            body(T::try_from(i as u64).expect("range bounds fit back into T"))
        });
}

/// A worklist-based parallel loop: `body` receives one item and a
/// [`WorkContext`] it may use to enqueue more work. Terminates once the
/// worklist is empty on every worker. Ordering across rounds is
/// unspecified.
pub struct WorkContext<'a, T> {
    next_round: &'a InsertBag<T>,
}

impl<'a, T> WorkContext<'a, T> {
    pub fn push(&self, item: T) {
        self.next_round.push(item);
    }
}

pub fn parallel_for_each<T, F>(initial_work: Vec<T>, body: F)
where
    T: Send + Sync,
    F: Fn(&T, &WorkContext<T>) + Sync,
{
    let mut frontier = initial_work;
    while !frontier.is_empty() {
        let next_round = InsertBag::new();
        frontier.par_iter().for_each(|item| {
            body(item, &WorkContext { next_round: &next_round });
        });
        frontier = next_round.into_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn parallel_for_visits_every_element() {
        let total = AtomicU64::new(0);
        parallel_for(0u32..1000, |i| {
            total.fetch_add(i as u64, Ordering::SeqCst);
        });
        assert_eq!(total.load(Ordering::SeqCst), (0..1000u64).sum());
    }

    #[test]
    fn chunked_parallel_for_visits_every_element_once() {
        let total = AtomicU64::new(0);
        parallel_for_chunked(0u32..1000, 64, |i| {
            total.fetch_add(i as u64, Ordering::SeqCst);
        });
        assert_eq!(total.load(Ordering::SeqCst), (0..1000u64).sum());
    }

    #[test]
    fn parallel_for_each_drains_enqueued_work() {
        let visited = InsertBag::new();
        parallel_for_each(vec![3u32], |item, ctx| {
            visited.push(*item);
            if *item > 0 {
                ctx.push(item - 1);
            }
        });
        let mut seen = visited.into_vec();
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }
}
