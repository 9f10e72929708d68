//! Booking ledger and the only writer of availability.
//!
//! A booking and the decrement of its date are written as one
//! [`WriteBatch`], so the ledger never holds a booking whose slot was not
//! taken.

use crate::availability::AvailabilityStore;
use crate::config::AvailabilityConfig;
use crate::error::BookingError;
use crate::storage::{AVAILABILITY_TABLE, BOOKINGS_TABLE};
use crate::types::{Booking, BookingId, Protocol};
use crate::validation::normalize;
use chrono::NaiveDate;
use festival_kiosk_core::environment::Clock;
use festival_kiosk_core::storage::{KeyValueStore, StorageError, WriteBatch};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// How protocol codes are checked against existing bookings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolPolicy {
    /// Accept whatever is drawn; collisions are possible
    #[default]
    Unchecked,
    /// Redraw on collision, giving up after `max_attempts` draws
    Unique {
        /// Draws before failing with [`BookingError::ProtocolExhausted`]
        max_attempts: u32,
    },
}

/// Booking ledger backed by a [`KeyValueStore`]
pub struct BookingStore {
    kv: Arc<dyn KeyValueStore>,
    availability: AvailabilityStore,
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
    protocol_policy: ProtocolPolicy,
}

impl std::fmt::Debug for BookingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingStore")
            .field("protocol_policy", &self.protocol_policy)
            .finish_non_exhaustive()
    }
}

fn decode_booking(raw: &str) -> Result<Booking, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))
}

impl BookingStore {
    /// Create a store over `kv`, seeding randomness from the OS
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            availability: AvailabilityStore::new(Arc::clone(&kv)),
            kv,
            clock,
            rng: Mutex::new(StdRng::from_entropy()),
            protocol_policy: ProtocolPolicy::default(),
        }
    }

    /// Replace the random source (deterministic tests)
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Set how protocol codes are checked for collisions
    #[must_use]
    pub const fn with_protocol_policy(mut self, policy: ProtocolPolicy) -> Self {
        self.protocol_policy = policy;
        self
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read access to the availability table
    #[must_use]
    pub const fn availability(&self) -> &AvailabilityStore {
        &self.availability
    }

    /// Seed availability from today if this is the first run
    ///
    /// Returns `true` when seeding happened.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Config`] for a zero window or an inverted slot range
    /// - [`BookingError::Storage`] if the availability table cannot be written
    pub fn initialize(&self, config: &AvailabilityConfig) -> Result<bool, BookingError> {
        let today = self.clock.today();
        self.availability.seed_if_absent(
            today,
            config.window_days,
            config.capacity_range(),
            &mut *self.rng(),
        )
    }

    /// Remove every booking and availability entry
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if either table cannot be cleared.
    pub fn reset(&self) -> Result<(), StorageError> {
        self.kv.clear(BOOKINGS_TABLE)?;
        self.kv.clear(AVAILABILITY_TABLE)?;
        tracing::warn!("Booking ledger and availability reset");
        Ok(())
    }

    /// Every booking in the order it was made
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the ledger cannot be read or decoded.
    pub fn list_bookings(&self) -> Result<Vec<Booking>, StorageError> {
        self.kv
            .list_all(BOOKINGS_TABLE)?
            .iter()
            .map(|(_, raw)| decode_booking(raw))
            .collect()
    }

    /// Whether a booking exists for `identifier`, compared by digits only
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the ledger cannot be read.
    pub fn has_identifier(&self, identifier: &str) -> Result<bool, StorageError> {
        let wanted = normalize(identifier);
        Ok(self
            .list_bookings()?
            .iter()
            .any(|booking| normalize(&booking.identifier) == wanted))
    }

    /// Look up a booking by its protocol code
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the ledger cannot be read.
    pub fn find_by_protocol(&self, protocol: &str) -> Result<Option<Booking>, StorageError> {
        Ok(self
            .list_bookings()?
            .into_iter()
            .find(|booking| booking.protocol.as_str() == protocol))
    }

    /// Draw a protocol code
    ///
    /// Not checked against existing bookings; see [`ProtocolPolicy`].
    #[must_use]
    pub fn generate_protocol(&self) -> Protocol {
        Protocol::generate(&mut *self.rng())
    }

    fn next_protocol(&self) -> Result<Protocol, BookingError> {
        let ProtocolPolicy::Unique { max_attempts } = self.protocol_policy else {
            return Ok(self.generate_protocol());
        };

        let taken: HashSet<Protocol> = self
            .list_bookings()?
            .into_iter()
            .map(|booking| booking.protocol)
            .collect();

        for _ in 0..max_attempts {
            let protocol = self.generate_protocol();
            if !taken.contains(&protocol) {
                return Ok(protocol);
            }
            tracing::debug!(%protocol, "Protocol collision, drawing again");
        }

        Err(BookingError::ProtocolExhausted {
            attempts: max_attempts,
        })
    }

    /// Record a booking for `date` and take one of its slots
    ///
    /// The identifier is stored normalised to its digits. Nothing is written
    /// unless every check passes.
    ///
    /// # Errors
    ///
    /// - [`BookingError::DuplicateIdentifier`] if the identifier already booked
    /// - [`BookingError::SlotUnavailable`] if `date` has no slots left
    /// - [`BookingError::ProtocolExhausted`] under [`ProtocolPolicy::Unique`]
    /// - [`BookingError::Storage`] if the write fails
    #[tracing::instrument(skip(self, name, identifier, email))]
    pub fn create_booking(
        &self,
        name: &str,
        identifier: &str,
        email: &str,
        date: NaiveDate,
    ) -> Result<Booking, BookingError> {
        if self.has_identifier(identifier)? {
            return Err(BookingError::DuplicateIdentifier);
        }

        let remaining = self.availability.remaining(date)?;
        if remaining == 0 {
            return Err(BookingError::SlotUnavailable { date });
        }

        let protocol = self.next_protocol()?;
        let now = self.clock.now();
        let booking = Booking {
            id: BookingId::generate(now, &mut *self.rng()),
            name: name.trim().to_string(),
            identifier: normalize(identifier),
            email: email.trim().to_string(),
            date,
            protocol,
            created_at: now,
        };

        let json = serde_json::to_string(&booking)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let batch = WriteBatch::new().put(BOOKINGS_TABLE, booking.id.as_str(), json);
        let batch = self.availability.decrement_write(batch, date)?;
        self.kv.apply(batch)?;

        metrics::counter!("kiosk.bookings.created").increment(1);
        tracing::info!(
            protocol = %booking.protocol,
            %date,
            remaining = remaining - 1,
            "Booking created"
        );

        Ok(booking)
    }
}
