use crate::error::AppError;
use crate::storage::SnapshotStore;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// In-memory snapshot store. Clones share the same cells, so a test can
/// hand one clone to a `TaskStore` and inspect the other afterwards.
#[derive(Clone, Default)]
pub struct MemoryStore {
    cells: Rc<RefCell<HashMap<String, String>>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest value written under `key`, if any.
    pub fn value(&self, key: &str) -> Option<String> {
        self.cells.borrow().get(key).cloned()
    }

    /// Seed a value without counting it as a write.
    pub fn seed(&self, key: &str, value: &str) {
        self.cells
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    /// Number of `set` calls observed so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.cells.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.writes.set(self.writes.get() + 1);
        self.cells
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
