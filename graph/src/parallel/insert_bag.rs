//! Unordered, concurrent, append-only container. Iteration after all
//! appenders quiesce yields every item in unspecified order (§4.5).
//!
//! Backed by one `Mutex<Vec<T>>` per worker so concurrent `push` calls from
//! different workers never contend on the same lock.

use rayon::current_num_threads;
use std::sync::Mutex;

pub struct InsertBag<T> {
    buckets: Vec<Mutex<Vec<T>>>,
}

impl<T> Default for InsertBag<T> {
    fn default() -> Self {
        InsertBag::new()
    }
}

impl<T> InsertBag<T> {
    pub fn new() -> Self {
        let num_workers = current_num_threads().max(1);
        InsertBag {
            buckets: (0..num_workers).map(|_| Mutex::new(Vec::new())).collect(),
        }
    }

    pub fn push(&self, value: T) {
        let idx = rayon::current_thread_index().unwrap_or(0) % self.buckets.len();
        self.buckets[idx]
            .lock()
            .expect("insert bag mutex poisoned")
            .push(value);
    }

    pub fn len(&self) -> usize {
        self.buckets
            .iter()
            .map(|b| b.lock().expect("insert bag mutex poisoned").len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<T> {
        self.buckets
            .into_iter()
            .flat_map(|b| b.into_inner().expect("insert bag mutex poisoned"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn collects_every_pushed_item() {
        let bag = InsertBag::new();
        (0..1000).into_par_iter().for_each(|i| bag.push(i));
        let mut items = bag.into_vec();
        items.sort();
        assert_eq!(items, (0..1000).collect::<Vec<_>>());
    }
}
