//! State and actions of the visitor workflow.

use super::idle::IdleTimer;
use crate::availability::AvailabilityStore;
use crate::calendar::{self, CalendarDay};
use crate::error::{FieldError, WorkflowNotice};
use crate::keyboard::KeyboardLayout;
use crate::types::{Booking, FormField};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Screen the kiosk is showing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// Attract screen; the idle timer is off
    Landing,
    /// Week calendar
    DateSelection,
    /// Name, identifier, phone and email entry
    VisitorForm,
    /// Booking summary with its protocol code
    Confirmation,
}

/// Kind of input that counts as visitor activity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityKind {
    /// Mouse or pen movement and clicks
    Pointer,
    /// Physical key press
    Key,
    /// Scrolling
    Scroll,
    /// Touch screen contact
    Touch,
}

/// Contents of the visitor form as displayed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormData {
    /// Full name
    pub name: String,
    /// Identifier, formatted as typed
    pub identifier: String,
    /// Phone, formatted as typed
    pub phone: String,
    /// Email, lowercased
    pub email: String,
}

impl FormData {
    /// Current content of `field`
    #[must_use]
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Identifier => &self.identifier,
            FormField::Phone => &self.phone,
            FormField::Email => &self.email,
        }
    }

    pub(crate) fn get_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Identifier => &mut self.identifier,
            FormField::Phone => &mut self.phone,
            FormField::Email => &mut self.email,
        }
    }

    /// Whether every field is blank
    #[must_use]
    pub fn is_empty(&self) -> bool {
        FormField::ALL.iter().all(|&field| self.get(field).is_empty())
    }
}

/// State of one kiosk session
#[derive(Clone, Debug)]
pub struct WorkflowState {
    /// Current screen
    pub step: Step,
    /// Date chosen on the calendar
    pub selected_date: Option<NaiveDate>,
    /// Form contents
    pub form: FormData,
    /// Field receiving keyboard input
    pub active_field: Option<FormField>,
    /// Errors shown next to form fields
    pub errors: BTreeMap<FormField, FieldError>,
    /// Error shown for the whole screen
    pub notice: Option<WorkflowNotice>,
    /// Booking shown on the confirmation screen
    pub confirmation: Option<Booking>,
    /// First day (Sunday) of the visible calendar week
    pub week_start: NaiveDate,
    /// Inactivity timer
    pub idle: IdleTimer,
}

impl WorkflowState {
    /// Landing screen with the calendar on the week containing `today`
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            step: Step::Landing,
            selected_date: None,
            form: FormData::default(),
            active_field: None,
            errors: BTreeMap::new(),
            notice: None,
            confirmation: None,
            week_start: calendar::week_start(today),
            idle: IdleTimer::default(),
        }
    }

    /// Forget everything the visitor entered or was shown
    pub(crate) fn clear_session(&mut self, today: NaiveDate) {
        self.selected_date = None;
        self.clear_form();
        self.notice = None;
        self.confirmation = None;
        self.week_start = calendar::week_start(today);
    }

    pub(crate) fn clear_form(&mut self) {
        self.form = FormData::default();
        self.active_field = None;
        self.errors.clear();
    }

    /// The visible week
    #[must_use]
    pub fn calendar(&self, today: NaiveDate, availability: &AvailabilityStore) -> Vec<CalendarDay> {
        calendar::week_view(self.week_start, today, availability)
    }

    /// Keyboard to show, if a field is focused
    #[must_use]
    pub fn keyboard_layout(&self) -> Option<KeyboardLayout> {
        self.active_field.map(KeyboardLayout::for_field)
    }
}

/// Inputs to the workflow
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkflowAction {
    /// Leave the landing screen
    Start,
    /// Pick a date on the calendar
    SelectDate {
        /// Chosen date
        date: NaiveDate,
    },
    /// Return from the form to the calendar
    Back,
    /// Validate the form and book
    Submit,
    /// From the confirmation, book again
    NewBooking,
    /// From the confirmation, return to the landing screen
    GoHome,
    /// Show the earlier week
    PreviousWeek,
    /// Show the later week
    NextWeek,
    /// Direct keyboard input to a field
    FocusField {
        /// Field to edit
        field: FormField,
    },
    /// Hide the on-screen keyboard
    DismissKeyboard,
    /// On-screen key press on the focused field
    KeyPressed {
        /// Key pressed
        key: char,
    },
    /// Delete the last character of the focused field
    Backspace,
    /// Replace a field's content
    SetField {
        /// Field to replace
        field: FormField,
        /// New content, subject to the field's input rules
        value: String,
    },
    /// Activity that does not otherwise change the workflow
    UserActivity {
        /// What the visitor did
        kind: ActivityKind,
    },
    /// Delayed timer check scheduled when the timer was armed
    IdleTimeoutElapsed {
        /// Timer generation at scheduling time
        generation: u64,
    },
}

impl WorkflowAction {
    /// Whether this action comes from the visitor
    #[must_use]
    pub const fn is_user_input(&self) -> bool {
        !matches!(self, Self::IdleTimeoutElapsed { .. })
    }
}
