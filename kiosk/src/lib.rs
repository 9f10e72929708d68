//! # Festival Kiosk
//!
//! Booking wizard for a winter festival's self-service kiosk.
//!
//! A visitor walks through four screens: a landing page, a week calendar of
//! dates with remaining slots, a form (name, identifier, phone, email), and
//! a confirmation carrying a `FIP-LL-NNNN` protocol code. After two minutes
//! without input the kiosk returns to the landing page and forgets what was
//! typed.
//!
//! ## Architecture
//!
//! - [`validation`]: identifier checksum, email and phone rules, formatting
//! - [`storage`]: [`KeyValueStore`](festival_kiosk_core::storage::KeyValueStore)
//!   backends (memory, JSON file)
//! - [`availability`]: remaining slots per date
//! - [`bookings`]: the booking ledger, sole writer of both tables
//! - [`workflow`]: the screen state machine as a reducer, including the
//!   idle timer
//! - [`calendar`], [`keyboard`]: presentation rules used by the workflow
//!
//! ## Example
//!
//! ```ignore
//! use festival_kiosk::{bookings::BookingStore, storage::InMemoryStore, workflow::*};
//! use festival_kiosk_core::environment::SystemClock;
//! use festival_kiosk_runtime::Store;
//!
//! let clock = Arc::new(SystemClock);
//! let bookings = Arc::new(BookingStore::new(Arc::new(InMemoryStore::new()), clock.clone()));
//! bookings.initialize(&config.availability)?;
//!
//! let env = WorkflowEnvironment::new(clock.clone(), bookings, config.workflow.idle_timeout());
//! let store = Store::new(WorkflowState::new(clock.today()), WorkflowReducer::new(), env);
//! store.send(WorkflowAction::Start).await?;
//! ```

pub mod availability;
pub mod bookings;
pub mod calendar;
pub mod config;
pub mod error;
pub mod keyboard;
pub mod storage;
pub mod types;
pub mod validation;
pub mod workflow;

pub use availability::AvailabilityStore;
pub use bookings::{BookingStore, ProtocolPolicy};
pub use config::Config;
pub use error::{BookingError, ConfigError, FieldError, ValidationError, WorkflowNotice};
pub use types::{AvailabilityEntry, Booking, BookingId, FormField, Protocol};
pub use workflow::{Step, WorkflowAction, WorkflowEnvironment, WorkflowReducer, WorkflowState};
