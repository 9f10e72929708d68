//! Remaining slots per calendar date.
//!
//! Seeded once for a rolling window of upcoming dates and afterwards only
//! decremented by bookings. Dates are keyed by their ISO string
//! (`YYYY-MM-DD`), values are the JSON-encoded remaining count.

use crate::error::{BookingError, ConfigError};
use crate::storage::AVAILABILITY_TABLE;
use crate::types::AvailabilityEntry;
use chrono::{Days, NaiveDate};
use festival_kiosk_core::storage::{KeyValueStore, Result, StorageError, WriteBatch};
use rand::Rng;
use std::ops::RangeInclusive;
use std::sync::Arc;

/// Availability table access
#[derive(Clone)]
pub struct AvailabilityStore {
    kv: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for AvailabilityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityStore").finish_non_exhaustive()
    }
}

pub(crate) fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn decode_slots(raw: &str) -> Result<u32> {
    serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))
}

impl AvailabilityStore {
    /// Wrap a key-value store
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Seed `window_days` consecutive dates from `today` if the table is empty
    ///
    /// Each date draws its capacity uniformly from `capacity`. Returns
    /// `true` when rows were written, `false` when data already existed.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyWindow`] if `window_days` is 0
    /// - [`ConfigError::InvertedSlotRange`] if `capacity` is empty
    /// - [`BookingError::Storage`] if the table cannot be read or written
    pub fn seed_if_absent<R: Rng>(
        &self,
        today: NaiveDate,
        window_days: u32,
        capacity: RangeInclusive<u32>,
        rng: &mut R,
    ) -> std::result::Result<bool, BookingError> {
        if window_days == 0 {
            return Err(ConfigError::EmptyWindow.into());
        }
        if capacity.is_empty() {
            return Err(ConfigError::InvertedSlotRange {
                min: *capacity.start(),
                max: *capacity.end(),
            }
            .into());
        }
        if !self.kv.list_all(AVAILABILITY_TABLE)?.is_empty() {
            tracing::debug!("Availability already seeded");
            return Ok(false);
        }

        let mut batch = WriteBatch::new();
        for offset in 0..u64::from(window_days) {
            let Some(date) = today.checked_add_days(Days::new(offset)) else {
                break;
            };
            let slots = rng.gen_range(capacity.clone());
            batch = batch.put(AVAILABILITY_TABLE, date_key(date), slots.to_string());
        }

        let seeded = batch.len();
        if seeded == 0 {
            return Ok(false);
        }
        self.kv.apply(batch)?;
        tracing::info!(%today, days = seeded, "Seeded availability");
        Ok(true)
    }

    /// Remaining slots for `date`
    ///
    /// Dates outside the seeded window have 0 slots. Storage failures are
    /// logged and also read as 0, so the date is simply not offered.
    #[must_use]
    pub fn get_remaining(&self, date: NaiveDate) -> u32 {
        match self.remaining(date) {
            Ok(slots) => slots,
            Err(error) => {
                tracing::warn!(%date, %error, "Could not read availability");
                0
            },
        }
    }

    pub(crate) fn remaining(&self, date: NaiveDate) -> Result<u32> {
        self.kv
            .get(AVAILABILITY_TABLE, &date_key(date))?
            .map_or(Ok(0), |raw| decode_slots(&raw))
    }

    /// Take one slot from `date` on its own, outside a booking
    ///
    /// Bookings go through
    /// [`BookingStore::create_booking`](crate::bookings::BookingStore::create_booking),
    /// which folds [`Self::decrement_write`] into the ledger write.
    #[cfg(test)]
    pub(crate) fn decrement(&self, date: NaiveDate) -> Result<()> {
        let batch = self.decrement_write(WriteBatch::new(), date)?;
        if batch.is_empty() {
            return Ok(());
        }
        self.kv.apply(batch)
    }

    /// Append the decrement of `date` to `batch`
    ///
    /// Leaves the batch unchanged when `date` has no slots left.
    pub(crate) fn decrement_write(&self, batch: WriteBatch, date: NaiveDate) -> Result<WriteBatch> {
        let remaining = self.remaining(date)?;
        if remaining == 0 {
            return Ok(batch);
        }
        Ok(batch.put(
            AVAILABILITY_TABLE,
            date_key(date),
            (remaining - 1).to_string(),
        ))
    }

    /// Every seeded date, ordered by date
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the table cannot be read or holds a
    /// malformed row.
    pub fn entries(&self) -> Result<Vec<AvailabilityEntry>> {
        let mut entries = self
            .kv
            .list_all(AVAILABILITY_TABLE)?
            .into_iter()
            .map(|(key, raw)| {
                let date = NaiveDate::parse_from_str(&key, "%Y-%m-%d")
                    .map_err(|e| StorageError::Serialization(format!("{key}: {e}")))?;
                Ok(AvailabilityEntry {
                    date,
                    remaining_slots: decode_slots(&raw)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        entries.sort_by_key(|entry| entry.date);
        Ok(entries)
    }
}
