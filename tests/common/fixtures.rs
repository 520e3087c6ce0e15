//! Test fixtures

use serde_json::Value;
use std::sync::{Arc, Mutex};
use tofu_forms::state::{CompletionCallback, StateObserver};
use tofu_forms::{FormData, FormSnapshot, InjectedData, RequestState};

/// The two-field form used throughout the tests
pub fn joe_bloggs_form() -> FormSnapshot {
    FormSnapshot::new()
        .field("name", "Joe Bloggs")
        .field("email", "joe.bloggs@example.com")
}

/// Payload expected from [`joe_bloggs_form`] plus `extra` injected pairs
pub fn expected_form_data(extra: &[(&str, &str)]) -> FormData {
    let mut data = FormData::new();
    data.append("name", "Joe Bloggs");
    data.append("email", "joe.bloggs@example.com");
    for (key, value) in extra {
        data.append(*key, *value);
    }
    data
}

/// Injected data from a JSON object literal
pub fn injected(value: Value) -> InjectedData {
    value
        .as_object()
        .cloned()
        .expect("injected fixture must be a JSON object")
}

/// Completion callback that records every state it is called with
pub fn callback_spy<D: Clone + Send + 'static>()
-> (Option<CompletionCallback<D>>, Arc<Mutex<Vec<RequestState<D>>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let callback: CompletionCallback<D> = Box::new(move |state: &RequestState<D>| {
        sink.lock().unwrap().push(state.clone());
    });
    (Some(callback), calls)
}

/// Observer recording the full state stream
#[derive(Clone, Default)]
pub struct StateLog<D> {
    states: Arc<Mutex<Vec<RequestState<D>>>>,
}

#[allow(dead_code)]
impl<D: Clone> StateLog<D> {
    /// States observed so far
    pub fn states(&self) -> Vec<RequestState<D>> {
        self.states.lock().unwrap().clone()
    }
}

impl<D: Clone + Send> StateObserver<D> for StateLog<D> {
    fn on_state(&self, state: &RequestState<D>) {
        self.states.lock().unwrap().push(state.clone());
    }
}
