//! Inactivity timer for the visitor workflow.
//!
//! The timer itself never sleeps. Arming returns a generation number that
//! the reducer puts in a delayed `IdleTimeoutElapsed` action; when that
//! action comes back, [`IdleTimer::check`] decides whether it still counts.
//! Activity only moves the last-activity timestamp, so a delay that fires
//! early is re-scheduled for the time still missing.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Outcome of a delayed timeout check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleCheck {
    /// The timer was disarmed or re-armed since the delay was scheduled
    Stale,
    /// Activity happened meanwhile; wait this much longer
    Pending(Duration),
    /// No activity for the whole timeout
    Expired,
}

/// Cancellable inactivity timer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdleTimer {
    generation: u64,
    last_activity: Option<DateTime<Utc>>,
}

impl IdleTimer {
    /// Start counting from `now`; returns the generation to schedule
    pub fn arm(&mut self, now: DateTime<Utc>) -> u64 {
        self.generation += 1;
        self.last_activity = Some(now);
        self.generation
    }

    /// Stop the timer; outstanding delays become stale
    pub fn disarm(&mut self) {
        self.generation += 1;
        self.last_activity = None;
    }

    /// Record activity. No-op while disarmed.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if let Some(last) = self.last_activity.as_mut() {
            *last = now.max(*last);
        }
    }

    /// Whether a timeout is pending
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.last_activity.is_some()
    }

    /// Current generation
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Last recorded activity while armed
    #[must_use]
    pub const fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_activity
    }

    /// Judge a delay scheduled for `generation` that fired at `now`
    #[must_use]
    pub fn check(&self, generation: u64, now: DateTime<Utc>, timeout: Duration) -> IdleCheck {
        let Some(last) = self.last_activity else {
            return IdleCheck::Stale;
        };
        if generation != self.generation {
            return IdleCheck::Stale;
        }

        // A clock that went backwards counts as no time passed
        let idle = (now - last).to_std().unwrap_or(Duration::ZERO);
        match timeout.checked_sub(idle) {
            Some(remaining) if !remaining.is_zero() => IdleCheck::Pending(remaining),
            _ => IdleCheck::Expired,
        }
    }
}
