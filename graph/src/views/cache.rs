//! Builds derived topology views once and caches the handle, under
//! internal mutual exclusion with a double-checked publish, per §4.4's
//! `build_view<K>()` contract.

use super::kind::ViewKind;
use super::ViewData;
use hashbrown::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct ViewCache {
    handles: Mutex<HashMap<ViewKind, Arc<ViewData>>>,
}

impl ViewCache {
    pub fn new() -> Self {
        ViewCache::default()
    }

    /// Returns the cached handle for `kind`, building it with `build` on a
    /// cache miss. The build runs with the lock released, so a long view
    /// construction never blocks cache hits for other kinds; the result is
    /// published under a second lock acquisition, and a racing builder that
    /// loses the publish discards its copy and returns the winner's handle.
    pub fn get_or_build(
        &self,
        kind: ViewKind,
        build: impl FnOnce() -> ViewData,
    ) -> Arc<ViewData> {
        {
            let handles = self.handles.lock().expect("view cache mutex poisoned");
            if let Some(existing) = handles.get(&kind) {
                return Arc::clone(existing);
            }
        }

        let handle = Arc::new(build());

        let mut handles = self.handles.lock().expect("view cache mutex poisoned");
        if let Some(winner) = handles.get(&kind) {
            return Arc::clone(winner);
        }
        handles.insert(kind, Arc::clone(&handle));
        handle
    }

    pub fn is_cached(&self, kind: &ViewKind) -> bool {
        self.handles
            .lock()
            .expect("view cache mutex poisoned")
            .contains_key(kind)
    }

    /// Drops every cached derived view. Per §4.4, the base topology never
    /// changes, so this is the only way a view is ever invalidated short of
    /// dropping the graph itself.
    pub fn drop_all(&self) {
        self.handles.lock().expect("view cache mutex poisoned").clear();
    }
}
