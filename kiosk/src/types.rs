//! Domain types shared by the stores and the workflow.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Unique identifier of a booking: `BOOK-<unix millis>-<9 base-36 chars>`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    /// Generate an id from the creation time and a random suffix
    pub fn generate<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> Self {
        let suffix: String = (0..9)
            .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
            .collect();
        Self(format!("BOOK-{}-{suffix}", now.timestamp_millis()))
    }

    /// The id as stored
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Confirmation code shown to the visitor: `FIP-LL-NNNN`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Protocol(String);

impl Protocol {
    /// Draw two uppercase letters and four digits, each uniformly at random
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let mut code = String::with_capacity(11);
        code.push_str("FIP-");
        for _ in 0..2 {
            code.push(char::from(LETTERS[rng.gen_range(0..LETTERS.len())]));
        }
        code.push('-');
        for _ in 0..4 {
            code.push(char::from(b'0' + rng.gen_range(0..10_u8)));
        }
        Self(code)
    }

    /// Whether `code` has the `FIP-LL-NNNN` shape
    #[must_use]
    pub fn is_well_formed(code: &str) -> bool {
        let bytes = code.as_bytes();
        bytes.len() == 11
            && code.starts_with("FIP-")
            && bytes[4..6].iter().all(u8::is_ascii_uppercase)
            && bytes[6] == b'-'
            && bytes[7..].iter().all(u8::is_ascii_digit)
    }

    /// The code as shown to the visitor
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A confirmed booking. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Unique identifier
    pub id: BookingId,
    /// Visitor display name
    pub name: String,
    /// Identifier normalised to its 11 digits
    pub identifier: String,
    /// Contact address
    pub email: String,
    /// Visit date
    pub date: NaiveDate,
    /// Confirmation code
    pub protocol: Protocol,
    /// When the booking was recorded
    pub created_at: DateTime<Utc>,
}

/// Remaining slots for one calendar date
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityEntry {
    /// Calendar date
    pub date: NaiveDate,
    /// Bookable slots left
    pub remaining_slots: u32,
}

/// Fields of the visitor form
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FormField {
    /// Full name
    Name,
    /// National identifier
    Identifier,
    /// Mobile phone
    Phone,
    /// Email address
    Email,
}

impl FormField {
    /// All fields in display order
    pub const ALL: [Self; 4] = [Self::Name, Self::Identifier, Self::Phone, Self::Email];

    /// Parse the lowercase field name used by the terminal front end
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "identifier" | "id" => Some(Self::Identifier),
            "phone" => Some(Self::Phone),
            "email" => Some(Self::Email),
            _ => None,
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Name => "name",
            Self::Identifier => "identifier",
            Self::Phone => "phone",
            Self::Email => "email",
        };
        f.pad(label)
    }
}
