//! Error types for the booking kiosk.
//!
//! None of these are fatal: each is recovered by the visitor correcting a
//! field or choosing another date.

use crate::types::FormField;
use chrono::NaiveDate;
use festival_kiosk_core::storage::StorageError;
use thiserror::Error;

/// Errors from the booking store.
#[derive(Error, Debug)]
pub enum BookingError {
    /// A booking already exists for this identifier.
    #[error("identifier already has a booking")]
    DuplicateIdentifier,

    /// The date has no remaining slots (or was never seeded).
    #[error("no slots remaining for {date}")]
    SlotUnavailable {
        /// Requested visit date
        date: NaiveDate,
    },

    /// Unique protocol generation gave up after the configured attempts.
    #[error("could not generate an unused protocol after {attempts} attempts")]
    ProtocolExhausted {
        /// Attempts made
        attempts: u32,
    },

    /// Seeding parameters cannot produce any availability.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Field-level validation failures on the visitor form.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Name left blank
    #[error("name is required")]
    NameRequired,
    /// Name shorter than three characters after trimming
    #[error("name must have at least 3 characters")]
    NameTooShort,
    /// Identifier left blank
    #[error("identifier is required")]
    IdentifierRequired,
    /// Identifier failed length or checksum validation
    #[error("identifier is invalid")]
    IdentifierInvalid,
    /// Phone left blank
    #[error("phone is required")]
    PhoneRequired,
    /// Phone is not an 11-digit mobile number
    #[error("phone is invalid")]
    PhoneInvalid,
    /// Email left blank
    #[error("email is required")]
    EmailRequired,
    /// Email is not `local@domain.tld` shaped
    #[error("email is invalid")]
    EmailInvalid,
}

impl ValidationError {
    /// The form field this error belongs to
    #[must_use]
    pub const fn field(self) -> FormField {
        match self {
            Self::NameRequired | Self::NameTooShort => FormField::Name,
            Self::IdentifierRequired | Self::IdentifierInvalid => FormField::Identifier,
            Self::PhoneRequired | Self::PhoneInvalid => FormField::Phone,
            Self::EmailRequired | Self::EmailInvalid => FormField::Email,
        }
    }
}

/// Error shown next to a form field.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// The field's content is invalid
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The identifier already has a booking
    #[error("identifier already has a booking")]
    DuplicateIdentifier,
}

/// Error shown for the whole step rather than a single field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowNotice {
    /// Date has no remaining slots
    #[error("no slots remaining for {date}")]
    SlotUnavailable {
        /// Requested visit date
        date: NaiveDate,
    },

    /// Date lies before today
    #[error("{date} is in the past")]
    DateInPast {
        /// Requested visit date
        date: NaiveDate,
    },

    /// Storage failed while booking
    #[error("booking could not be saved: {0}")]
    Storage(String),
}

/// Invalid configuration values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Availability window must cover at least one day
    #[error("availability window must be at least one day")]
    EmptyWindow,

    /// Slot range is inverted
    #[error("minimum slots ({min}) exceeds maximum slots ({max})")]
    InvertedSlotRange {
        /// Configured minimum
        min: u32,
        /// Configured maximum
        max: u32,
    },

    /// Idle timeout must be positive
    #[error("idle timeout must be greater than zero")]
    ZeroIdleTimeout,

    /// Unique protocol generation needs at least one attempt
    #[error("protocol attempts must be greater than zero")]
    ZeroProtocolAttempts,

    /// Unknown storage backend name
    #[error("unknown storage backend '{0}' (expected 'memory' or 'file')")]
    UnknownBackend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_fields() {
        assert_eq!(ValidationError::NameTooShort.field(), FormField::Name);
        assert_eq!(ValidationError::IdentifierInvalid.field(), FormField::Identifier);
        assert_eq!(ValidationError::PhoneRequired.field(), FormField::Phone);
        assert_eq!(ValidationError::EmailInvalid.field(), FormField::Email);
    }

    #[test]
    fn field_error_displays_inner_message() {
        let error = FieldError::from(ValidationError::EmailInvalid);
        assert_eq!(error.to_string(), "email is invalid");
        assert_eq!(
            FieldError::DuplicateIdentifier.to_string(),
            "identifier already has a booking"
        );
    }

    #[test]
    fn storage_error_converts_into_booking_error() {
        let error: BookingError = StorageError::Io("disk full".to_string()).into();
        assert!(matches!(error, BookingError::Storage(_)));
        assert_eq!(error.to_string(), "I/O error: disk full");
    }
}
