//! Week view for the date-selection step.

use crate::availability::AvailabilityStore;
use chrono::{Datelike, Days, NaiveDate};

/// Days shown at once
pub const DAYS_PER_WEEK: usize = 7;

/// One cell of the week view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    /// Calendar date
    pub date: NaiveDate,
    /// Slots left on that date
    pub remaining: u32,
    /// Whether the visitor may pick it: not before today and slots left
    pub selectable: bool,
}

/// The Sunday on or before `date`
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// The seven days from `start`
///
/// Days past the last representable date are omitted.
#[must_use]
pub fn week_view(
    start: NaiveDate,
    today: NaiveDate,
    availability: &AvailabilityStore,
) -> Vec<CalendarDay> {
    start
        .iter_days()
        .take(DAYS_PER_WEEK)
        .map(|date| {
            let remaining = availability.get_remaining(date);
            CalendarDay {
                date,
                remaining,
                selectable: date >= today && remaining > 0,
            }
        })
        .collect()
}
