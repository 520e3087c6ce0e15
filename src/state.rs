//! Caller-owned request state
//!
//! A [`StateMachine`] holds the current [`RequestState`] of one submission
//! entry point. Every transition replaces the state wholesale, notifies the
//! registered observers, and for terminal states runs the completion callback.

use crate::types::RequestState;

/// Completion callback, run once with the terminal state
pub type CompletionCallback<D> = Box<dyn FnOnce(&RequestState<D>) + Send>;

/// Observer trait for state transitions
///
/// Implement this to render state as it changes:
/// - CLI implementations can drive a spinner
/// - UI bindings can push the state into their own store
pub trait StateObserver<D>: Send + Sync {
    /// Called after every transition, including Loading
    fn on_state(&self, state: &RequestState<D>);
}

/// No-op observer
pub struct NoopObserver;

impl<D> StateObserver<D> for NoopObserver {
    fn on_state(&self, _state: &RequestState<D>) {}
}

/// State container with explicit "apply and notify" transitions
pub struct StateMachine<D> {
    state: RequestState<D>,
    observers: Vec<Box<dyn StateObserver<D>>>,
}

impl<D> Default for StateMachine<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> StateMachine<D> {
    /// Start in `Idle`
    pub const fn new() -> Self {
        Self {
            state: RequestState::Idle,
            observers: Vec::new(),
        }
    }

    /// Current state
    pub const fn state(&self) -> &RequestState<D> {
        &self.state
    }

    /// Register an observer for subsequent transitions
    pub fn observe(&mut self, observer: impl StateObserver<D> + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Replace the state and notify observers
    ///
    /// If the new state is terminal and a callback is pending, the callback is
    /// taken and run after the update, so it fires at most once.
    pub fn apply(&mut self, state: RequestState<D>, on_complete: &mut Option<CompletionCallback<D>>) {
        self.state = state;
        for observer in &self.observers {
            observer.on_state(&self.state);
        }

        if self.state.is_terminal()
            && let Some(callback) = on_complete.take()
        {
            callback(&self.state);
        }
    }
}

impl<D: std::fmt::Debug> std::fmt::Debug for StateMachine<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::{Arc, Mutex};

    struct Recorder(Arc<Mutex<Vec<RequestState<u32>>>>);

    impl StateObserver<u32> for Recorder {
        fn on_state(&self, state: &RequestState<u32>) {
            self.0.lock().unwrap().push(state.clone());
        }
    }

    #[test]
    fn test_loading_does_not_fire_callback() {
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let mut callback: Option<CompletionCallback<u32>> = Some(Box::new(move |_| {
            *counter.lock().unwrap() += 1;
        }));

        let mut machine = StateMachine::new();
        machine.apply(RequestState::Loading { data: 1 }, &mut callback);
        assert_eq!(*calls.lock().unwrap(), 0);
        assert!(callback.is_some());

        machine.apply(RequestState::Success { data: 1 }, &mut callback);
        assert_eq!(*calls.lock().unwrap(), 1);
        assert!(callback.is_none());
    }

    #[test]
    fn test_callback_fires_once_across_terminal_states() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut callback: Option<CompletionCallback<u32>> = Some(Box::new(move |state| {
            sink.lock().unwrap().push(state.clone());
        }));

        let mut machine = StateMachine::new();
        machine.apply(
            RequestState::Error {
                error: Error::RateLimited,
                data: 7,
            },
            &mut callback,
        );
        machine.apply(RequestState::Success { data: 7 }, &mut callback);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![RequestState::Error {
                error: Error::RateLimited,
                data: 7
            }]
        );
    }

    #[test]
    fn test_observers_see_every_transition() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut machine = StateMachine::new();
        machine.observe(Recorder(Arc::clone(&log)));

        machine.apply(RequestState::Loading { data: 3 }, &mut None);
        machine.apply(RequestState::Success { data: 3 }, &mut None);

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                RequestState::Loading { data: 3 },
                RequestState::Success { data: 3 }
            ]
        );
        assert_eq!(machine.state(), &RequestState::Success { data: 3 });
    }
}
