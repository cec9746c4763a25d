//! Shared test doubles for the client integration tests

use futures::future::BoxFuture;
use orchestration_client::{Method, Result, Transport};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

/// Transport double recording every call and answering `{"ok": 1}`
///
/// Clones share the call log, so a clone can be handed to the client
/// while the test keeps the original for assertions.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<(String, String, Option<Value>)>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(method, uri, body)` triple seen so far, in call order
    pub fn calls(&self) -> Vec<(String, String, Option<Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn send<'a>(
        &'a self,
        method: Method,
        uri: &'a str,
        body: Option<Value>,
    ) -> BoxFuture<'a, Result<Value>> {
        Box::pin(async move {
            self.calls
                .lock()
                .unwrap()
                .push((method.to_string(), uri.to_string(), body));
            Ok(json!({"ok": 1}))
        })
    }
}
