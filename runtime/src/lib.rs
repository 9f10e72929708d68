//! # Festival Kiosk Runtime
//!
//! Runtime for the kiosk's reducers.
//!
//! This crate provides the [`Store`] that serialises actions through a
//! reducer and executes the effects it returns.
//!
//! ## Core Components
//!
//! - **Store**: Owns the state, runs the reducer, executes effects
//! - **Effect Executor**: Turns effect descriptions into spawned tasks that
//!   feed actions back into the store
//!
//! ## Example
//!
//! ```ignore
//! use festival_kiosk_runtime::Store;
//!
//! let store = Store::new(WorkflowState::new(today), WorkflowReducer::new(), env);
//!
//! store.send(WorkflowAction::Start).await?;
//! let step = store.state(|s| s.step).await;
//! ```

use festival_kiosk_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// Delayed actions that fire after shutdown are dropped with this error.
        #[error("Store is shutting down")]
        ShutdownInProgress,
    }
}

pub use error::StoreError;
pub use store::Store;

/// Guard that decrements an atomic counter on drop
struct PendingGuard(Arc<AtomicUsize>);

impl PendingGuard {
    fn new(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicUsize, Effect, Ordering, PendingGuard, Reducer, RwLock, StoreError,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`, readers never observe a half-applied action)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// Cloning a store is cheap; clones share state and environment.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Starts the returned effects
        ///
        /// `send()` returns once effects are started, not when they finish.
        /// Concurrent `send()` calls serialise at the reducer.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.commands.total").increment(1);

            let effects = {
                let mut state = self.state.write().await;
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();
                self.reducer
                    .reduce(&mut *state, action, &self.environment)
            };

            tracing::trace!("Reducer returned {} effects", effects.len());
            for effect in effects {
                self.execute_effect(effect);
            }

            Ok(())
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let step = store.state(|s| s.step).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Shared environment
        #[must_use]
        pub fn environment(&self) -> &E {
            &self.environment
        }

        /// Number of effects still running (delays not yet fired)
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::SeqCst)
        }

        /// Stop accepting actions
        ///
        /// Pending delayed actions still fire but are rejected when they
        /// try to re-enter the store.
        pub fn shutdown(&self) {
            tracing::info!(pending = self.pending_effects(), "Store shutting down");
            self.shutdown.store(true, Ordering::Release);
        }

        /// Execute an effect
        ///
        /// - `None`: No-op
        /// - `Delay`: Waits for duration on a spawned task, then sends the action
        /// - `Parallel`: Executes each effect independently
        fn execute_effect(&self, effect: Effect<A>) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Delay { duration, action } => {
                    tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);

                    let guard = PendingGuard::new(&self.pending_effects);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;
                        tokio::time::sleep(duration).await;
                        if let Err(error) = store.send(*action).await {
                            tracing::debug!(%error, "Delayed action dropped");
                        }
                    });
                },
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect);
                    }
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use festival_kiosk_core::{SmallVec, smallvec};
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct TestState {
        value: i32,
        ticks: u32,
    }

    #[derive(Debug, Clone)]
    enum TestAction {
        Add(i32),
        ScheduleTick(Duration),
        Tick,
        Fanout,
    }

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut TestState,
            action: TestAction,
            _env: &(),
        ) -> SmallVec<[Effect<TestAction>; 4]> {
            match action {
                TestAction::Add(n) => {
                    state.value += n;
                    smallvec![Effect::None]
                },
                TestAction::ScheduleTick(duration) => {
                    smallvec![Effect::delay(duration, TestAction::Tick)]
                },
                TestAction::Tick => {
                    state.ticks += 1;
                    SmallVec::new()
                },
                TestAction::Fanout => smallvec![Effect::merge(vec![
                    Effect::delay(Duration::from_millis(5), TestAction::Add(1)),
                    Effect::delay(Duration::from_millis(5), TestAction::Add(10)),
                ])],
            }
        }
    }

    #[tokio::test]
    async fn send_applies_reducer() {
        let store = Store::new(TestState::default(), TestReducer, ());

        store.send(TestAction::Add(2)).await.unwrap();
        store.send(TestAction::Add(3)).await.unwrap();

        assert_eq!(store.state(|s| s.value).await, 5);
    }

    #[tokio::test]
    async fn delay_feeds_action_back() {
        let store = Store::new(TestState::default(), TestReducer, ());

        store
            .send(TestAction::ScheduleTick(Duration::from_millis(20)))
            .await
            .unwrap();
        assert_eq!(store.state(|s| s.ticks).await, 0);
        assert_eq!(store.pending_effects(), 1);

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(store.state(|s| s.ticks).await, 1);
        assert_eq!(store.pending_effects(), 0);
    }

    #[tokio::test]
    async fn parallel_runs_every_effect() {
        let store = Store::new(TestState::default(), TestReducer, ());

        store.send(TestAction::Fanout).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(store.state(|s| s.value).await, 11);
    }

    #[tokio::test]
    async fn shutdown_rejects_actions() {
        let store = Store::new(TestState::default(), TestReducer, ());
        store.shutdown();

        let result = store.send(TestAction::Add(1)).await;

        assert_eq!(result, Err(StoreError::ShutdownInProgress));
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = Store::new(TestState::default(), TestReducer, ());
        let other = store.clone();

        other.send(TestAction::Add(4)).await.unwrap();

        assert_eq!(store.state(|s| s.value).await, 4);
    }
}
