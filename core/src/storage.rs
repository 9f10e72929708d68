//! Key-value persistence abstraction.
//!
//! The kiosk keeps its data in a handful of logical tables (the booking
//! ledger and the availability counters). Each table maps string keys to
//! JSON-encoded values and remembers insertion order.
//!
//! # Implementations
//!
//! - `InMemoryStore` (in `festival-kiosk`): process-local tables
//! - `JsonFileStore` (in `festival-kiosk`): tables persisted to a JSON file
//!
//! # Atomic writes
//!
//! [`KeyValueStore::apply`] takes a [`WriteBatch`]. Implementations must make
//! every write of the batch visible together or none of them. Callers that
//! need to update two tables consistently (a booking plus its slot
//! decrement) go through a single batch.
//!
//! # Example
//!
//! ```ignore
//! use festival_kiosk_core::storage::{KeyValueStore, WriteBatch};
//!
//! fn record(store: &dyn KeyValueStore) -> Result<(), StorageError> {
//!     let batch = WriteBatch::new()
//!         .put("bookings", "BOOK-1", "{...}")
//!         .put("availability", "2026-10-16", "4");
//!     store.apply(batch)
//! }
//! ```

use thiserror::Error;

/// Result alias for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// A value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The backing medium holds data that is not a valid snapshot.
    #[error("Corrupt store: {0}")]
    Corrupt(String),
}

/// A single write inside a [`WriteBatch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchWrite {
    /// Target table
    pub table: String,
    /// Key inside the table
    pub key: String,
    /// Encoded value
    pub value: String,
}

/// Group of writes applied as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    writes: Vec<BatchWrite>,
}

impl WriteBatch {
    /// Create an empty batch
    #[must_use]
    pub const fn new() -> Self {
        Self { writes: Vec::new() }
    }

    /// Add a put to the batch
    #[must_use]
    pub fn put(
        mut self,
        table: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.writes.push(BatchWrite {
            table: table.into(),
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Number of writes in the batch
    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Whether the batch holds no writes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Writes in the order they were added
    #[must_use]
    pub fn writes(&self) -> &[BatchWrite] {
        &self.writes
    }
}

impl IntoIterator for WriteBatch {
    type Item = BatchWrite;
    type IntoIter = std::vec::IntoIter<BatchWrite>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.into_iter()
    }
}

/// Synchronous key-value store with named tables.
///
/// Implementations must be `Send + Sync` so a single store can be shared by
/// the booking store and the runtime environment.
///
/// There is exactly one writer (the booking store), so implementations only
/// need to guarantee that each call is atomic on its own; no cross-call
/// isolation is required.
pub trait KeyValueStore: Send + Sync {
    /// Look up a value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing medium cannot be read.
    fn get(&self, table: &str, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite a value.
    ///
    /// A new key is appended at the end of the table's insertion order;
    /// overwriting keeps the key's original position.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write cannot be persisted.
    fn put(&self, table: &str, key: &str, value: String) -> Result<()>;

    /// All entries of a table in insertion order.
    ///
    /// A table that was never written is empty, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing medium cannot be read.
    fn list_all(&self, table: &str) -> Result<Vec<(String, String)>>;

    /// Apply every write of `batch` as one unit.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the batch cannot be persisted. In that
    /// case none of its writes are visible.
    fn apply(&self, batch: WriteBatch) -> Result<()>;

    /// Remove every entry of a table.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the change cannot be persisted.
    fn clear(&self, table: &str) -> Result<()>;
}
