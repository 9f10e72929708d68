//! Process-local backend.

use super::Tables;
use festival_kiosk_core::storage::{KeyValueStore, Result, WriteBatch};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory key-value store
///
/// Contents live as long as the process. Used by tests and by kiosks that
/// do not need bookings to survive a restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, table: &str, key: &str) -> Result<Option<String>> {
        Ok(self.read().get(table, key))
    }

    fn put(&self, table: &str, key: &str, value: String) -> Result<()> {
        self.write().put(table, key, value);
        Ok(())
    }

    fn list_all(&self, table: &str) -> Result<Vec<(String, String)>> {
        Ok(self.read().list_all(table))
    }

    fn apply(&self, batch: WriteBatch) -> Result<()> {
        self.write().apply(batch);
        Ok(())
    }

    fn clear(&self, table: &str) -> Result<()> {
        self.write().clear(table);
        Ok(())
    }
}
