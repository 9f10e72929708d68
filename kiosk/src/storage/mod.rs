//! Storage backends implementing [`KeyValueStore`].
//!
//! Both backends share [`Tables`], an insertion-ordered set of named
//! tables. [`InMemoryStore`] keeps it in memory only; [`JsonFileStore`]
//! mirrors every change to a JSON file.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::InMemoryStore;

use crate::config::{StorageBackend, StorageConfig};
use festival_kiosk_core::storage::{self, BatchWrite, KeyValueStore, WriteBatch};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Table holding the booking ledger
pub const BOOKINGS_TABLE: &str = "bookings";

/// Table holding remaining slots per ISO date
pub const AVAILABILITY_TABLE: &str = "availability";

/// One insertion-ordered table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<(String, String)>", into = "Vec<(String, String)>")]
struct Table {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl From<Vec<(String, String)>> for Table {
    fn from(entries: Vec<(String, String)>) -> Self {
        let mut table = Self::default();
        for (key, value) in entries {
            table.put(key, value);
        }
        table
    }
}

impl From<Table> for Vec<(String, String)> {
    fn from(table: Table) -> Self {
        table.entries
    }
}

impl Table {
    fn get(&self, key: &str) -> Option<&String> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    fn put(&mut self, key: String, value: String) {
        if let Some(&position) = self.index.get(&key) {
            self.entries[position].1 = value;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, value));
        }
    }
}

/// Named tables as held by both backends
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Tables {
    tables: BTreeMap<String, Table>,
}

impl Tables {
    pub(crate) fn get(&self, table: &str, key: &str) -> Option<String> {
        self.tables.get(table).and_then(|t| t.get(key)).cloned()
    }

    pub(crate) fn put(&mut self, table: &str, key: &str, value: String) {
        self.tables
            .entry(table.to_string())
            .or_default()
            .put(key.to_string(), value);
    }

    pub(crate) fn list_all(&self, table: &str) -> Vec<(String, String)> {
        self.tables
            .get(table)
            .map(|t| t.entries.clone())
            .unwrap_or_default()
    }

    pub(crate) fn apply(&mut self, batch: WriteBatch) {
        for BatchWrite { table, key, value } in batch {
            self.put(&table, &key, value);
        }
    }

    pub(crate) fn clear(&mut self, table: &str) {
        self.tables.remove(table);
    }
}

/// Open the backend selected by configuration
///
/// # Errors
///
/// Returns a storage error if the file backend cannot read its file.
pub fn open(config: &StorageConfig) -> storage::Result<Arc<dyn KeyValueStore>> {
    Ok(match config.backend {
        StorageBackend::Memory => Arc::new(InMemoryStore::new()),
        StorageBackend::File => Arc::new(JsonFileStore::open(&config.path)?),
    })
}
