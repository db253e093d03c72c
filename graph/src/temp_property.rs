//! Scoped guard for scratch properties used by algorithms mid-computation.
//!
//! Ported from `original_source`'s `TemporaryPropertyGuard`
//! (`libgraph/include/katana/analytics/Utils.h`): a thread-local counter
//! and the current thread id produce a unique name; the property is
//! removed on every exit path, including panics, via `Drop`.

use crate::properties::{Column, ColumnData, PropertyTable};
use shared::{Error, Result};
use std::cell::Cell;

thread_local! {
    static COUNTER: Cell<u64> = Cell::new(0);
}

fn next_temporary_name() -> String {
    let id = COUNTER.with(|c| {
        let next = c.get();
        c.set(next + 1);
        next
    });
    format!(
        "__temporary_property_{:?}_{}",
        std::thread::current().id(),
        id
    )
}

/// Registers a scratch column under a reserved, process-unique name on
/// construction and removes it on drop, regardless of how the borrow's
/// scope is exited (an early `return`, a `?`, or a panic unwind).
pub struct TemporaryPropertyGuard<'a> {
    table: &'a mut PropertyTable,
    name: String,
}

impl<'a> TemporaryPropertyGuard<'a> {
    pub fn new(table: &'a mut PropertyTable, data: ColumnData) -> Result<Self> {
        let name = next_temporary_name();
        table.add_property(Column::new(name.clone(), data))?;
        Ok(TemporaryPropertyGuard { table, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &PropertyTable {
        self.table
    }

    pub fn table_mut(&mut self) -> &mut PropertyTable {
        self.table
    }
}

impl Drop for TemporaryPropertyGuard<'_> {
    fn drop(&mut self) {
        match self.table.remove_property(&self.name) {
            Ok(_) => {}
            Err(Error::NotFound(_)) => {}
            Err(e) => log::warn!("failed to remove temporary property {}: {}", self.name, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_the_scratch_column_on_drop() {
        let mut table = PropertyTable::new(3);
        let name = {
            let guard =
                TemporaryPropertyGuard::new(&mut table, ColumnData::from(vec![0u32; 3]))
                    .unwrap();
            guard.name().to_string()
        };
        assert!(!table.has_property(&name));
    }

    #[test]
    fn two_guards_on_the_same_thread_get_distinct_names() {
        let mut table_a = PropertyTable::new(1);
        let mut table_b = PropertyTable::new(1);
        let guard_a =
            TemporaryPropertyGuard::new(&mut table_a, ColumnData::from(vec![0u32])).unwrap();
        let guard_b =
            TemporaryPropertyGuard::new(&mut table_b, ColumnData::from(vec![0u32])).unwrap();
        assert_ne!(guard_a.name(), guard_b.name());
    }
}
