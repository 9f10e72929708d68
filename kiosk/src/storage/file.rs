//! JSON file backend.
//!
//! The whole snapshot is rewritten on every change: it is serialised to a
//! sibling `*.json.tmp` file which is then renamed over the target. A crash
//! mid-write leaves the previous snapshot in place.

use super::Tables;
use festival_kiosk_core::storage::{KeyValueStore, Result, StorageError, WriteBatch};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Key-value store persisted to a JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    tables: Mutex<Tables>,
}

impl JsonFileStore {
    /// Open the store at `path`
    ///
    /// A missing file yields an empty store; the file is created on the
    /// first write.
    ///
    /// # Errors
    ///
    /// [`StorageError::Io`] if the file exists but cannot be read,
    /// [`StorageError::Corrupt`] if it does not hold a valid snapshot.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tables = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| StorageError::Corrupt(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == ErrorKind::NotFound => Tables::default(),
            Err(e) => return Err(StorageError::Io(format!("{}: {e}", path.display()))),
        };

        tracing::debug!(path = %path.display(), "Opened JSON store");

        Ok(Self {
            path,
            tables: Mutex::new(tables),
        })
    }

    /// Location of the snapshot file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `change` to a copy of the tables, persist the copy, and only then
    /// make it the live state
    fn update(&self, change: impl FnOnce(&mut Tables)) -> Result<()> {
        let mut tables = self.lock();
        let mut next = tables.clone();
        change(&mut next);
        self.persist(&next)?;
        *tables = next;
        Ok(())
    }

    fn persist(&self, tables: &Tables) -> Result<()> {
        let json = serde_json::to_string_pretty(tables)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| StorageError::Io(format!("{}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| StorageError::Io(format!("{}: {e}", self.path.display())))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, table: &str, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(table, key))
    }

    fn put(&self, table: &str, key: &str, value: String) -> Result<()> {
        self.update(|tables| tables.put(table, key, value))
    }

    fn list_all(&self, table: &str) -> Result<Vec<(String, String)>> {
        Ok(self.lock().list_all(table))
    }

    fn apply(&self, batch: WriteBatch) -> Result<()> {
        self.update(|tables| tables.apply(batch))
    }

    fn clear(&self, table: &str) -> Result<()> {
        self.update(|tables| tables.clear(table))
    }
}
