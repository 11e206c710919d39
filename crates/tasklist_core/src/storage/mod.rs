use crate::error::AppError;

mod file_store;
mod memory;

pub use file_store::FileStore;
pub use memory::MemoryStore;

/// Fixed key under which the task snapshot lives.
pub const SNAPSHOT_KEY: &str = "todos";

const DISABLE_ENV_VAR: &str = "TASKLIST_DISABLE_PERSISTENCE";

/// Synchronous string key-value store holding the serialized task list.
///
/// `is_available` is the capability check for the execution context: a
/// backend that reports `false` stands in for environments where the
/// store is unreachable, and callers skip it silently.
pub trait SnapshotStore {
    fn is_available(&self) -> bool {
        true
    }

    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
}

/// Backend for contexts without a reachable store. Always unavailable;
/// reads see nothing and writes go nowhere.
pub struct DetachedStore;

impl SnapshotStore for DetachedStore {
    fn is_available(&self) -> bool {
        false
    }

    fn get(&self, _key: &str) -> Result<Option<String>, AppError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), AppError> {
        Ok(())
    }
}

/// Pick a backend for the current environment. Persistence explicitly
/// disabled, or no resolvable store location, means a detached backend;
/// this never fails.
pub fn store_from_env() -> Box<dyn SnapshotStore> {
    if std::env::var(DISABLE_ENV_VAR).is_ok() {
        return Box::new(DetachedStore);
    }

    match file_store::store_path() {
        Ok(path) => Box::new(FileStore::new(path)),
        Err(_) => Box::new(DetachedStore),
    }
}
