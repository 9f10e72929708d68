//! Configuration management for the kiosk.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::bookings::ProtocolPolicy;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Kiosk configuration loaded from environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where bookings and availability are kept
    pub storage: StorageConfig,
    /// How availability is seeded on first run
    pub availability: AvailabilityConfig,
    /// Visitor workflow behaviour
    pub workflow: WorkflowConfig,
    /// Protocol code generation
    pub protocol: ProtocolConfig,
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local, lost on exit
    Memory,
    /// JSON snapshot file
    #[default]
    File,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend to use
    pub backend: StorageBackend,
    /// Snapshot path for the file backend
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            path: PathBuf::from("festival-kiosk.json"),
        }
    }
}

/// Availability seeding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityConfig {
    /// Consecutive days seeded, starting today
    pub window_days: u32,
    /// Smallest capacity drawn per day
    pub min_slots: u32,
    /// Largest capacity drawn per day (inclusive)
    pub max_slots: u32,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            window_days: 60,
            min_slots: 10,
            max_slots: 50,
        }
    }
}

impl AvailabilityConfig {
    /// Capacity range each seeded day draws from
    #[must_use]
    pub const fn capacity_range(&self) -> RangeInclusive<u32> {
        self.min_slots..=self.max_slots
    }
}

/// Workflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Seconds of inactivity before the kiosk returns to the landing screen
    pub idle_timeout_secs: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 120,
        }
    }
}

impl WorkflowConfig {
    /// Idle timeout as a duration
    #[must_use]
    pub const fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

/// Protocol generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Regenerate codes that collide with an existing booking
    pub unique: bool,
    /// Attempts before giving up when `unique` is set
    pub max_attempts: u32,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            unique: false,
            max_attempts: 10,
        }
    }
}

impl ProtocolConfig {
    /// Policy handed to the booking store
    #[must_use]
    pub const fn policy(&self) -> ProtocolPolicy {
        if self.unique {
            ProtocolPolicy::Unique {
                max_attempts: self.max_attempts,
            }
        } else {
            ProtocolPolicy::Unchecked
        }
    }
}

fn parsed<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable numeric values fall back to their defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownBackend`] if `KIOSK_STORAGE_BACKEND` names an
    /// unknown backend.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let backend = match env::var("KIOSK_STORAGE_BACKEND") {
            Ok(name) => name.parse()?,
            Err(_) => defaults.storage.backend,
        };

        Ok(Self {
            storage: StorageConfig {
                backend,
                path: env::var("KIOSK_STORAGE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.path),
            },
            availability: AvailabilityConfig {
                window_days: parsed("KIOSK_WINDOW_DAYS", defaults.availability.window_days),
                min_slots: parsed("KIOSK_MIN_SLOTS", defaults.availability.min_slots),
                max_slots: parsed("KIOSK_MAX_SLOTS", defaults.availability.max_slots),
            },
            workflow: WorkflowConfig {
                idle_timeout_secs: parsed(
                    "KIOSK_IDLE_TIMEOUT_SECS",
                    defaults.workflow.idle_timeout_secs,
                ),
            },
            protocol: ProtocolConfig {
                unique: parsed("KIOSK_UNIQUE_PROTOCOLS", defaults.protocol.unique),
                max_attempts: parsed("KIOSK_PROTOCOL_ATTEMPTS", defaults.protocol.max_attempts),
            },
        })
    }

    /// Check values that would make the kiosk unusable
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.availability.window_days == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        if self.availability.min_slots > self.availability.max_slots {
            return Err(ConfigError::InvertedSlotRange {
                min: self.availability.min_slots,
                max: self.availability.max_slots,
            });
        }
        if self.workflow.idle_timeout_secs == 0 {
            return Err(ConfigError::ZeroIdleTimeout);
        }
        if self.protocol.unique && self.protocol.max_attempts == 0 {
            return Err(ConfigError::ZeroProtocolAttempts);
        }
        Ok(())
    }
}
