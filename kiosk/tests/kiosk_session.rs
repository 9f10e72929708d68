//! End-to-end kiosk sessions run through the `Store` runtime.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use festival_kiosk::config::AvailabilityConfig;
use festival_kiosk::storage::InMemoryStore;
use festival_kiosk::workflow::ActivityKind;
use festival_kiosk::{
    BookingStore, FieldError, FormField, Protocol, Step, WorkflowAction, WorkflowEnvironment,
    WorkflowReducer, WorkflowState,
};
use festival_kiosk_core::environment::{Clock, SystemClock};
use festival_kiosk_runtime::Store;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;

type KioskStore = Store<WorkflowState, WorkflowAction, WorkflowEnvironment, WorkflowReducer>;

fn kiosk(idle_timeout: Duration) -> KioskStore {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let bookings = BookingStore::new(Arc::new(InMemoryStore::new()), Arc::clone(&clock))
        .with_rng(StdRng::seed_from_u64(11));
    bookings
        .initialize(&AvailabilityConfig {
            window_days: 14,
            min_slots: 5,
            max_slots: 5,
        })
        .unwrap();

    let env = WorkflowEnvironment::new(Arc::clone(&clock), Arc::new(bookings), idle_timeout);
    Store::new(WorkflowState::new(clock.today()), WorkflowReducer::new(), env)
}

fn set(field: FormField, value: &str) -> WorkflowAction {
    WorkflowAction::SetField {
        field,
        value: value.to_string(),
    }
}

async fn send_all(store: &KioskStore, actions: Vec<WorkflowAction>) {
    for action in actions {
        store.send(action).await.unwrap();
    }
}

async fn fill_form(store: &KioskStore, identifier: &str) {
    let tomorrow = store.environment().clock.today().succ_opt().unwrap();
    send_all(
        store,
        vec![
            WorkflowAction::SelectDate { date: tomorrow },
            set(FormField::Name, "Ana Silva"),
            set(FormField::Identifier, identifier),
            set(FormField::Phone, "11 98765-4321"),
            set(FormField::Email, "ana@example.com"),
        ],
    )
    .await;
}

#[tokio::test]
async fn visitor_books_then_starts_over() {
    let store = kiosk(Duration::from_secs(120));
    let tomorrow = store.environment().clock.today().succ_opt().unwrap();

    store.send(WorkflowAction::Start).await.unwrap();
    fill_form(&store, "529.982.247-25").await;
    store.send(WorkflowAction::Submit).await.unwrap();

    let (step, booking) = store
        .state(|s| (s.step, s.confirmation.clone()))
        .await;
    assert_eq!(step, Step::Confirmation);
    let booking = booking.expect("confirmed booking");
    assert!(Protocol::is_well_formed(booking.protocol.as_str()));
    assert_eq!(booking.date, tomorrow);

    let bookings = &store.environment().bookings;
    assert_eq!(bookings.availability().get_remaining(tomorrow), 4);
    assert_eq!(bookings.list_bookings().unwrap(), vec![booking]);

    // Same visitor again
    store.send(WorkflowAction::NewBooking).await.unwrap();
    fill_form(&store, "52998224725").await;
    store.send(WorkflowAction::Submit).await.unwrap();

    let (step, error) = store
        .state(|s| (s.step, s.errors.get(&FormField::Identifier).copied()))
        .await;
    assert_eq!(step, Step::VisitorForm);
    assert_eq!(error, Some(FieldError::DuplicateIdentifier));
    assert_eq!(bookings.list_bookings().unwrap().len(), 1);
    assert_eq!(bookings.availability().get_remaining(tomorrow), 4);

    store.send(WorkflowAction::Back).await.unwrap();
    assert_eq!(store.state(|s| s.step).await, Step::DateSelection);
}

#[tokio::test]
async fn idle_kiosk_returns_to_landing() {
    let store = kiosk(Duration::from_millis(50));

    store.send(WorkflowAction::Start).await.unwrap();
    fill_form(&store, "11144477735").await;
    assert_eq!(store.state(|s| s.step).await, Step::VisitorForm);

    tokio::time::sleep(Duration::from_millis(300)).await;

    let state = store.state(Clone::clone).await;
    assert_eq!(state.step, Step::Landing);
    assert!(state.form.is_empty());
    assert!(state.selected_date.is_none());
    assert!(!state.idle.is_armed());
    assert!(store.environment().bookings.list_bookings().unwrap().is_empty());
}

#[tokio::test]
async fn activity_keeps_the_session_alive() {
    let store = kiosk(Duration::from_millis(200));

    store.send(WorkflowAction::Start).await.unwrap();
    for _ in 0..5 {
        tokio::time::sleep(Duration::from_millis(80)).await;
        store
            .send(WorkflowAction::UserActivity {
                kind: ActivityKind::Pointer,
            })
            .await
            .unwrap();
    }

    assert_eq!(store.state(|s| s.step).await, Step::DateSelection);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(store.state(|s| s.step).await, Step::Landing);
}

#[tokio::test]
async fn going_home_cancels_the_pending_timeout() {
    let store = kiosk(Duration::from_millis(400));

    store.send(WorkflowAction::Start).await.unwrap();
    fill_form(&store, "39053344705").await;
    store.send(WorkflowAction::Submit).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    store.send(WorkflowAction::GoHome).await.unwrap();
    store.send(WorkflowAction::Start).await.unwrap();

    // The first session's delay fires in here and must be ignored
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(store.state(|s| s.step).await, Step::DateSelection);
    assert_eq!(store.state(|s| s.idle.generation()).await, 3);
}
