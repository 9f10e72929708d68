//! Reducer driving the visitor workflow.
//!
//! `Landing -> DateSelection -> VisitorForm -> Confirmation`, with the idle
//! timer armed while away from `Landing`. Bookings are written through the
//! environment's [`BookingStore`] during `Submit`; everything else only
//! reads.

use super::idle::IdleCheck;
use super::types::{Step, WorkflowAction, WorkflowState};
use crate::bookings::BookingStore;
use crate::error::{BookingError, FieldError, WorkflowNotice};
use crate::keyboard;
use crate::types::FormField;
use crate::validation::{validate_email, validate_identifier, validate_name, validate_phone};
use chrono::{Days, NaiveDate};
use festival_kiosk_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer, smallvec};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

type Effects = SmallVec<[Effect<WorkflowAction>; 4]>;

/// Environment dependencies for the workflow reducer
#[derive(Clone)]
pub struct WorkflowEnvironment {
    /// Time source for the idle timer and "today"
    pub clock: Arc<dyn Clock>,
    /// Booking ledger and availability
    pub bookings: Arc<BookingStore>,
    /// Inactivity before returning to the landing screen
    pub idle_timeout: Duration,
}

impl WorkflowEnvironment {
    /// Creates a new `WorkflowEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, bookings: Arc<BookingStore>, idle_timeout: Duration) -> Self {
        Self {
            clock,
            bookings,
            idle_timeout,
        }
    }
}

/// Reducer for the visitor workflow
#[derive(Clone, Debug, Default)]
pub struct WorkflowReducer;

impl WorkflowReducer {
    /// Creates a new `WorkflowReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn go_to(state: &mut WorkflowState, step: Step) {
        if state.step != step {
            tracing::debug!(from = ?state.step, to = ?step, "Workflow step");
            state.step = step;
        }
    }

    fn arm_idle_timer(state: &mut WorkflowState, env: &WorkflowEnvironment) -> Effects {
        let generation = state.idle.arm(env.clock.now());
        smallvec![Effect::delay(
            env.idle_timeout,
            WorkflowAction::IdleTimeoutElapsed { generation },
        )]
    }

    fn return_to_landing(state: &mut WorkflowState, env: &WorkflowEnvironment) {
        state.clear_session(env.clock.today());
        state.idle.disarm();
        Self::go_to(state, Step::Landing);
    }

    /// Checks a calendar pick against today and remaining slots
    fn validate_date(date: NaiveDate, env: &WorkflowEnvironment) -> Result<(), WorkflowNotice> {
        if date < env.clock.today() {
            return Err(WorkflowNotice::DateInPast { date });
        }
        if env.bookings.availability().get_remaining(date) == 0 {
            return Err(WorkflowNotice::SlotUnavailable { date });
        }
        Ok(())
    }

    /// Field errors for the current form, duplicate identifier included
    fn validate_form(
        state: &WorkflowState,
        env: &WorkflowEnvironment,
    ) -> Result<BTreeMap<FormField, FieldError>, WorkflowNotice> {
        let form = &state.form;
        let mut errors: BTreeMap<FormField, FieldError> = [
            validate_name(&form.name),
            validate_identifier(&form.identifier),
            validate_phone(&form.phone),
            validate_email(&form.email),
        ]
        .into_iter()
        .filter_map(Result::err)
        .map(|error| (error.field(), FieldError::from(error)))
        .collect();

        if !errors.contains_key(&FormField::Identifier)
            && env
                .bookings
                .has_identifier(&form.identifier)
                .map_err(|e| WorkflowNotice::Storage(e.to_string()))?
        {
            errors.insert(FormField::Identifier, FieldError::DuplicateIdentifier);
        }

        Ok(errors)
    }

    fn submit(state: &mut WorkflowState, env: &WorkflowEnvironment) {
        let Some(date) = state.selected_date else {
            return;
        };

        let errors = match Self::validate_form(state, env) {
            Ok(errors) => errors,
            Err(notice) => {
                state.notice = Some(notice);
                return;
            },
        };
        if !errors.is_empty() {
            tracing::debug!(fields = errors.len(), "Form rejected");
            state.errors = errors;
            return;
        }

        // Persistence is synchronous; the booking is committed before the
        // next action is reduced.
        let form = &state.form;
        match env
            .bookings
            .create_booking(&form.name, &form.identifier, &form.email, date)
        {
            Ok(booking) => {
                state.clear_form();
                state.notice = None;
                state.confirmation = Some(booking);
                Self::go_to(state, Step::Confirmation);
            },
            Err(BookingError::DuplicateIdentifier) => {
                state
                    .errors
                    .insert(FormField::Identifier, FieldError::DuplicateIdentifier);
            },
            Err(BookingError::SlotUnavailable { date }) => {
                state.notice = Some(WorkflowNotice::SlotUnavailable { date });
            },
            Err(
                error @ (BookingError::ProtocolExhausted { .. }
                | BookingError::Config(_)
                | BookingError::Storage(_)),
            ) => {
                tracing::warn!(%error, "Booking failed");
                state.notice = Some(WorkflowNotice::Storage(error.to_string()));
            },
        }
    }

    /// Rewrites `field` and clears its error
    fn edit(state: &mut WorkflowState, field: FormField, change: impl FnOnce(&str) -> String) {
        let value = state.form.get_mut(field);
        let next = change(value.as_str());
        *value = next;
        state.errors.remove(&field);
    }

    fn shift_week(state: &mut WorkflowState, forward: bool) {
        let week = Days::new(7);
        let shifted = if forward {
            state.week_start.checked_add_days(week)
        } else {
            state.week_start.checked_sub_days(week)
        };
        if let Some(start) = shifted {
            state.week_start = start;
        }
    }
}

impl Reducer for WorkflowReducer {
    type State = WorkflowState;
    type Action = WorkflowAction;
    type Environment = WorkflowEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if action.is_user_input() {
            state.idle.touch(env.clock.now());
        }

        match (state.step, action) {
            // ========== Navigation ==========
            (Step::Landing, WorkflowAction::Start) => {
                state.clear_session(env.clock.today());
                Self::go_to(state, Step::DateSelection);
                return Self::arm_idle_timer(state, env);
            },

            (Step::DateSelection, WorkflowAction::SelectDate { date }) => {
                match Self::validate_date(date, env) {
                    Ok(()) => {
                        state.selected_date = Some(date);
                        state.notice = None;
                        state.clear_form();
                        Self::go_to(state, Step::VisitorForm);
                    },
                    Err(notice) => state.notice = Some(notice),
                }
            },

            (Step::DateSelection, WorkflowAction::PreviousWeek) => Self::shift_week(state, false),
            (Step::DateSelection, WorkflowAction::NextWeek) => Self::shift_week(state, true),

            (Step::VisitorForm, WorkflowAction::Back) => {
                state.clear_form();
                state.notice = None;
                Self::go_to(state, Step::DateSelection);
            },

            (Step::VisitorForm, WorkflowAction::Submit) => Self::submit(state, env),

            (Step::Confirmation, WorkflowAction::NewBooking) => {
                state.clear_session(env.clock.today());
                Self::go_to(state, Step::DateSelection);
            },

            (Step::Confirmation, WorkflowAction::GoHome) => Self::return_to_landing(state, env),

            // ========== Form input ==========
            (Step::VisitorForm, WorkflowAction::FocusField { field }) => {
                state.active_field = Some(field);
            },

            (Step::VisitorForm, WorkflowAction::DismissKeyboard) => state.active_field = None,

            (Step::VisitorForm, WorkflowAction::KeyPressed { key }) => {
                if let Some(field) = state.active_field {
                    Self::edit(state, field, |current| keyboard::press_key(field, current, key));
                }
            },

            (Step::VisitorForm, WorkflowAction::Backspace) => {
                if let Some(field) = state.active_field {
                    Self::edit(state, field, |current| keyboard::backspace(field, current));
                }
            },

            (Step::VisitorForm, WorkflowAction::SetField { field, value }) => {
                Self::edit(state, field, |_| keyboard::sanitize(field, &value));
            },

            // ========== Idle timer ==========
            (_, WorkflowAction::IdleTimeoutElapsed { generation }) => {
                match state
                    .idle
                    .check(generation, env.clock.now(), env.idle_timeout)
                {
                    IdleCheck::Stale => {},
                    IdleCheck::Pending(remaining) => {
                        return smallvec![Effect::delay(
                            remaining,
                            WorkflowAction::IdleTimeoutElapsed { generation },
                        )];
                    },
                    IdleCheck::Expired => {
                        tracing::warn!(step = ?state.step, "Idle timeout, returning to landing");
                        Self::return_to_landing(state, env);
                    },
                }
            },

            (_, WorkflowAction::UserActivity { .. }) => {},

            (step, action) => {
                tracing::debug!(?step, ?action, "Action ignored in this step");
            },
        }

        SmallVec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AvailabilityConfig;
    use crate::error::ValidationError;
    use crate::keyboard::KeyboardLayout;
    use crate::storage::InMemoryStore;
    use crate::types::Protocol;
    use crate::workflow::ActivityKind;
    use festival_kiosk_testing::{ManualClock, ReducerTest, assertions, test_time};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const TIMEOUT: Duration = Duration::from_secs(120);

    struct Fixture {
        clock: ManualClock,
        env: WorkflowEnvironment,
    }

    fn fixture(slots: u32) -> Fixture {
        let clock = ManualClock::new(test_time());
        let bookings = BookingStore::new(Arc::new(InMemoryStore::new()), Arc::new(clock.clone()))
            .with_rng(StdRng::seed_from_u64(5));
        bookings
            .initialize(&AvailabilityConfig {
                window_days: 30,
                min_slots: slots,
                max_slots: slots,
            })
            .unwrap();
        let env = WorkflowEnvironment::new(Arc::new(clock.clone()), Arc::new(bookings), TIMEOUT);
        Fixture { clock, env }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn today() -> NaiveDate {
        day(16)
    }

    fn drive(env: &WorkflowEnvironment, actions: Vec<WorkflowAction>) -> WorkflowState {
        let reducer = WorkflowReducer::new();
        let mut state = WorkflowState::new(env.clock.today());
        for action in actions {
            let _ = reducer.reduce(&mut state, action, env);
        }
        state
    }

    fn set(field: FormField, value: &str) -> WorkflowAction {
        WorkflowAction::SetField {
            field,
            value: value.to_string(),
        }
    }

    fn on_form() -> Vec<WorkflowAction> {
        vec![
            WorkflowAction::Start,
            WorkflowAction::SelectDate { date: day(20) },
        ]
    }

    fn filled_form() -> Vec<WorkflowAction> {
        let mut actions = on_form();
        actions.extend([
            set(FormField::Name, "Ana Silva"),
            set(FormField::Identifier, "52998224725"),
            set(FormField::Phone, "11987654321"),
            set(FormField::Email, "Ana@Example.com"),
        ]);
        actions
    }

    fn confirmed() -> Vec<WorkflowAction> {
        let mut actions = filled_form();
        actions.push(WorkflowAction::Submit);
        actions
    }

    // ========== Navigation ==========

    #[test]
    fn start_opens_calendar_and_arms_timer() {
        let Fixture { env, .. } = fixture(5);

        ReducerTest::new(WorkflowReducer::new())
            .with_env(env)
            .given_state(WorkflowState::new(today()))
            .when_action(WorkflowAction::Start)
            .then_state(|state| {
                assert_eq!(state.step, Step::DateSelection);
                assert_eq!(state.week_start, day(11));
                assert!(state.idle.is_armed());
            })
            .then_effects(|effects| {
                let delayed = assertions::delayed_actions(effects);
                assert_eq!(
                    delayed,
                    vec![(TIMEOUT, &WorkflowAction::IdleTimeoutElapsed { generation: 1 })]
                );
            })
            .run();
    }

    #[test]
    fn selecting_an_open_date_shows_the_form() {
        let Fixture { env, .. } = fixture(5);
        let state = drive(&env, vec![WorkflowAction::Start]);

        ReducerTest::new(WorkflowReducer::new())
            .with_env(env)
            .given_state(state)
            .when_action(WorkflowAction::SelectDate { date: day(20) })
            .then_state(|state| {
                assert_eq!(state.step, Step::VisitorForm);
                assert_eq!(state.selected_date, Some(day(20)));
                assert!(state.notice.is_none());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn full_date_cannot_be_selected() {
        let Fixture { env, .. } = fixture(1);
        env.bookings.availability().decrement(day(20)).unwrap();
        let state = drive(&env, vec![WorkflowAction::Start]);

        ReducerTest::new(WorkflowReducer::new())
            .with_env(env)
            .given_state(state)
            .when_action(WorkflowAction::SelectDate { date: day(20) })
            .then_state(|state| {
                assert_eq!(state.step, Step::DateSelection);
                assert_eq!(state.selected_date, None);
                assert_eq!(
                    state.notice,
                    Some(WorkflowNotice::SlotUnavailable { date: day(20) })
                );
            })
            .run();
    }

    #[test]
    fn past_and_unseeded_dates_cannot_be_selected() {
        let Fixture { env, .. } = fixture(5);

        let state = drive(
            &env,
            vec![
                WorkflowAction::Start,
                WorkflowAction::SelectDate { date: day(15) },
            ],
        );
        assert_eq!(state.step, Step::DateSelection);
        assert_eq!(state.notice, Some(WorkflowNotice::DateInPast { date: day(15) }));

        let far = today().checked_add_days(Days::new(45)).unwrap();
        let state = drive(
            &env,
            vec![WorkflowAction::Start, WorkflowAction::SelectDate { date: far }],
        );
        assert_eq!(state.step, Step::DateSelection);
        assert_eq!(state.notice, Some(WorkflowNotice::SlotUnavailable { date: far }));
    }

    #[test]
    fn landing_ignores_everything_but_start() {
        let Fixture { env, .. } = fixture(5);

        let state = drive(
            &env,
            vec![
                WorkflowAction::SelectDate { date: day(20) },
                WorkflowAction::Submit,
                WorkflowAction::GoHome,
                WorkflowAction::KeyPressed { key: '1' },
            ],
        );

        assert_eq!(state.step, Step::Landing);
        assert!(!state.idle.is_armed());
        assert!(state.form.is_empty());
    }

    #[test]
    fn back_returns_to_calendar_and_drops_the_form() {
        let Fixture { env, .. } = fixture(5);
        let mut actions = filled_form();
        actions.push(WorkflowAction::Back);

        let state = drive(&env, actions);

        assert_eq!(state.step, Step::DateSelection);
        assert!(state.form.is_empty());
        assert!(state.idle.is_armed());
    }

    #[test]
    fn week_navigation() {
        let Fixture { env, .. } = fixture(5);

        let state = drive(
            &env,
            vec![
                WorkflowAction::Start,
                WorkflowAction::NextWeek,
                WorkflowAction::NextWeek,
                WorkflowAction::PreviousWeek,
            ],
        );
        assert_eq!(state.week_start, day(18));

        let calendar = state.calendar(today(), env.bookings.availability());
        assert_eq!(calendar.len(), 7);
        assert!(calendar.iter().all(|d| d.selectable && d.remaining == 5));
    }

    // ========== Submit ==========

    #[test]
    fn invalid_form_stays_put_with_field_errors() {
        let Fixture { env, .. } = fixture(5);
        let mut actions = on_form();
        actions.extend([
            set(FormField::Name, "Al"),
            set(FormField::Identifier, "11111111111"),
            set(FormField::Email, "ana@"),
        ]);
        let state = drive(&env, actions);

        ReducerTest::new(WorkflowReducer::new())
            .with_env(env.clone())
            .given_state(state)
            .when_action(WorkflowAction::Submit)
            .then_state(move |state| {
                assert_eq!(state.step, Step::VisitorForm);
                assert_eq!(
                    state.errors.get(&FormField::Name),
                    Some(&FieldError::Invalid(ValidationError::NameTooShort))
                );
                assert_eq!(
                    state.errors.get(&FormField::Identifier),
                    Some(&FieldError::Invalid(ValidationError::IdentifierInvalid))
                );
                assert_eq!(
                    state.errors.get(&FormField::Phone),
                    Some(&FieldError::Invalid(ValidationError::PhoneRequired))
                );
                assert_eq!(
                    state.errors.get(&FormField::Email),
                    Some(&FieldError::Invalid(ValidationError::EmailInvalid))
                );
                assert_eq!(state.form.name, "Al");
                assert!(env.bookings.list_bookings().unwrap().is_empty());
            })
            .run();
    }

    #[test]
    fn valid_form_books_and_confirms() {
        let Fixture { env, .. } = fixture(5);
        let state = drive(&env, filled_form());

        ReducerTest::new(WorkflowReducer::new())
            .with_env(env.clone())
            .given_state(state)
            .when_action(WorkflowAction::Submit)
            .then_state(move |state| {
                assert_eq!(state.step, Step::Confirmation);
                assert!(state.form.is_empty());
                assert!(state.errors.is_empty());

                let booking = state.confirmation.as_ref().unwrap();
                assert_eq!(booking.date, day(20));
                assert_eq!(booking.identifier, "52998224725");
                assert_eq!(booking.email, "ana@example.com");
                assert!(Protocol::is_well_formed(booking.protocol.as_str()));

                assert_eq!(env.bookings.availability().get_remaining(day(20)), 4);
                assert_eq!(env.bookings.list_bookings().unwrap().len(), 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn duplicate_identifier_is_a_field_error() {
        let Fixture { env, .. } = fixture(5);
        env.bookings
            .create_booking("Ana Silva", "52998224725", "ana@example.com", day(18))
            .unwrap();

        let mut actions = filled_form();
        actions.push(WorkflowAction::Submit);
        let state = drive(&env, actions);

        assert_eq!(state.step, Step::VisitorForm);
        assert_eq!(
            state.errors.get(&FormField::Identifier),
            Some(&FieldError::DuplicateIdentifier)
        );
        assert_eq!(env.bookings.list_bookings().unwrap().len(), 1);
    }

    #[test]
    fn date_filled_up_meanwhile_is_a_notice() {
        let Fixture { env, .. } = fixture(1);
        let state = drive(&env, filled_form());
        env.bookings
            .create_booking("Bruno Lima", "11144477735", "bruno@example.com", day(20))
            .unwrap();

        ReducerTest::new(WorkflowReducer::new())
            .with_env(env)
            .given_state(state)
            .when_action(WorkflowAction::Submit)
            .then_state(|state| {
                assert_eq!(state.step, Step::VisitorForm);
                assert_eq!(
                    state.notice,
                    Some(WorkflowNotice::SlotUnavailable { date: day(20) })
                );
                assert_eq!(state.form.name, "Ana Silva");
            })
            .run();
    }

    #[test]
    fn new_booking_starts_over_with_timer_running() {
        let Fixture { env, .. } = fixture(5);
        let mut actions = confirmed();
        actions.push(WorkflowAction::NewBooking);

        let state = drive(&env, actions);

        assert_eq!(state.step, Step::DateSelection);
        assert!(state.confirmation.is_none());
        assert!(state.selected_date.is_none());
        assert!(state.idle.is_armed());
        assert_eq!(state.idle.generation(), 1);
    }

    #[test]
    fn go_home_disarms_timer() {
        let Fixture { env, .. } = fixture(5);
        let mut actions = confirmed();
        actions.push(WorkflowAction::GoHome);

        let state = drive(&env, actions);

        assert_eq!(state.step, Step::Landing);
        assert!(state.confirmation.is_none());
        assert!(!state.idle.is_armed());
    }

    // ========== Keyboard ==========

    #[test]
    fn typing_into_focused_field() {
        let Fixture { env, .. } = fixture(5);
        let mut actions = on_form();
        actions.push(WorkflowAction::FocusField {
            field: FormField::Identifier,
        });
        actions.extend("5299822472".chars().map(|key| WorkflowAction::KeyPressed { key }));
        let state = drive(&env, actions);

        assert_eq!(state.form.identifier, "529.982.247-2");
        assert_eq!(state.keyboard_layout(), Some(KeyboardLayout::Numeric));

        ReducerTest::new(WorkflowReducer::new())
            .with_env(env)
            .given_state(state)
            .when_action(WorkflowAction::Backspace)
            .then_state(|state| assert_eq!(state.form.identifier, "529.982.247"))
            .run();
    }

    #[test]
    fn editing_clears_that_fields_error() {
        let Fixture { env, .. } = fixture(5);
        let mut actions = on_form();
        actions.extend([
            WorkflowAction::Submit,
            WorkflowAction::FocusField {
                field: FormField::Email,
            },
            WorkflowAction::KeyPressed { key: 'A' },
        ]);

        let state = drive(&env, actions);

        assert_eq!(state.form.email, "a");
        assert!(!state.errors.contains_key(&FormField::Email));
        assert!(state.errors.contains_key(&FormField::Name));
        assert_eq!(state.keyboard_layout(), Some(KeyboardLayout::Text));
    }

    #[test]
    fn keys_without_focus_are_ignored() {
        let Fixture { env, .. } = fixture(5);
        let mut actions = on_form();
        actions.extend([
            WorkflowAction::KeyPressed { key: 'x' },
            WorkflowAction::FocusField {
                field: FormField::Name,
            },
            WorkflowAction::DismissKeyboard,
            WorkflowAction::KeyPressed { key: 'y' },
        ]);

        let state = drive(&env, actions);

        assert!(state.form.is_empty());
        assert_eq!(state.keyboard_layout(), None);
    }

    // ========== Idle timer ==========

    #[test]
    fn idle_form_returns_to_landing_and_discards_input() {
        let Fixture { clock, env } = fixture(5);
        let state = drive(&env, filled_form());
        clock.advance(TIMEOUT);

        ReducerTest::new(WorkflowReducer::new())
            .with_env(env.clone())
            .given_state(state)
            .when_action(WorkflowAction::IdleTimeoutElapsed { generation: 1 })
            .then_state(move |state| {
                assert_eq!(state.step, Step::Landing);
                assert!(state.form.is_empty());
                assert!(state.selected_date.is_none());
                assert!(!state.idle.is_armed());
                assert!(env.bookings.list_bookings().unwrap().is_empty());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn activity_reschedules_for_the_remaining_time() {
        let Fixture { clock, env } = fixture(5);
        let reducer = WorkflowReducer::new();
        let mut state = drive(&env, vec![WorkflowAction::Start]);

        clock.advance(Duration::from_secs(100));
        let _ = reducer.reduce(
            &mut state,
            WorkflowAction::UserActivity {
                kind: ActivityKind::Touch,
            },
            &env,
        );
        clock.advance(Duration::from_secs(20));

        ReducerTest::new(reducer)
            .with_env(env)
            .given_state(state)
            .when_action(WorkflowAction::IdleTimeoutElapsed { generation: 1 })
            .then_state(|state| assert_eq!(state.step, Step::DateSelection))
            .then_effects(|effects| {
                let delayed = assertions::delayed_actions(effects);
                assert_eq!(
                    delayed,
                    vec![(
                        Duration::from_secs(100),
                        &WorkflowAction::IdleTimeoutElapsed { generation: 1 }
                    )]
                );
            })
            .run();
    }

    #[test]
    fn timeout_from_a_previous_session_is_ignored() {
        let Fixture { clock, env } = fixture(5);
        let mut actions = confirmed();
        actions.extend([WorkflowAction::GoHome, WorkflowAction::Start]);
        let state = drive(&env, actions);
        clock.advance(TIMEOUT);

        ReducerTest::new(WorkflowReducer::new())
            .with_env(env)
            .given_state(state)
            .when_action(WorkflowAction::IdleTimeoutElapsed { generation: 1 })
            .then_state(|state| {
                assert_eq!(state.step, Step::DateSelection);
                assert_eq!(state.idle.generation(), 3);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn timeout_on_landing_is_ignored() {
        let Fixture { clock, env } = fixture(5);
        clock.advance(TIMEOUT * 2);

        ReducerTest::new(WorkflowReducer::new())
            .with_env(env)
            .given_state(WorkflowState::new(today()))
            .when_action(WorkflowAction::IdleTimeoutElapsed { generation: 0 })
            .then_state(|state| assert_eq!(state.step, Step::Landing))
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
