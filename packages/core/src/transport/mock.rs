//! Scripted transport for deterministic testing.
//!
//! Responses are scripted per `(method, path)`. Each scripted route answers
//! with its queued responses in order; the last one keeps answering once the
//! queue is down to it. Every request is recorded, including those that fail.
//!
//! ## Usage
//!
//! ```rust
//! use notesync_core::transport::{Method, MockTransport, Request, Transport};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let transport = MockTransport::new();
//! transport.respond(Method::Get, "/api/notebooks", json!({ "notebooks": [] }));
//!
//! let body = transport.send(Request::get("/api/notebooks")).await.unwrap();
//! assert_eq!(body["notebooks"], json!([]));
//! assert_eq!(transport.call_count(Method::Get, "/api/notebooks"), 1);
//! # });
//! ```

use crate::transport::{Method, Request, Transport, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

type Route = (Method, String);

/// Transport that answers from a script and records every request.
#[derive(Clone, Default)]
pub struct MockTransport {
    script: Arc<Mutex<HashMap<Route, VecDeque<Result<Value, TransportError>>>>>,
    call_log: Arc<Mutex<Vec<Request>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn enqueue(&self, method: Method, path: &str, outcome: Result<Value, TransportError>) {
        self.script
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .entry((method, path.to_string()))
            .or_default()
            .push_back(outcome);
    }

    /// Queue a successful response for a route
    pub fn respond(&self, method: Method, path: &str, body: Value) -> &Self {
        self.enqueue(method, path, Ok(body));
        self
    }

    /// Queue a failure for a route
    pub fn fail(&self, method: Method, path: &str, error: TransportError) -> &Self {
        self.enqueue(method, path, Err(error));
        self
    }

    /// All requests received so far, oldest first
    pub fn calls(&self) -> Vec<Request> {
        self.call_log
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Requests received for one route
    pub fn calls_to(&self, method: Method, path: &str) -> Vec<Request> {
        self.calls()
            .into_iter()
            .filter(|req| req.method == method && req.path == path)
            .collect()
    }

    pub fn call_count(&self, method: Method, path: &str) -> usize {
        self.calls_to(method, path).len()
    }

    /// Most recent request, if any
    pub fn last_call(&self) -> Option<Request> {
        self.calls().pop()
    }

    /// Forget recorded requests (the script is kept)
    pub fn clear_calls(&self) {
        self.call_log
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clear();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: Request) -> Result<Value, TransportError> {
        self.call_log
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(request.clone());

        let mut script = self.script.lock().unwrap_or_else(|p| p.into_inner());
        let queue = script
            .get_mut(&(request.method, request.path.clone()))
            .filter(|queue| !queue.is_empty())
            .ok_or_else(|| TransportError::NotScripted {
                method: request.method.to_string(),
                path: request.path.clone(),
            })?;

        if queue.len() > 1 {
            queue
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Network("empty script".into())))
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(TransportError::Network("empty script".into())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_queued_responses_then_last_repeats() {
        let transport = MockTransport::new();
        transport
            .respond(Method::Get, "/x", json!(1))
            .respond(Method::Get, "/x", json!(2));

        assert_eq!(transport.send(Request::get("/x")).await.unwrap(), json!(1));
        assert_eq!(transport.send(Request::get("/x")).await.unwrap(), json!(2));
        assert_eq!(transport.send(Request::get("/x")).await.unwrap(), json!(2));
        assert_eq!(transport.call_count(Method::Get, "/x"), 3);
    }

    #[tokio::test]
    async fn test_unscripted_route_fails_and_is_recorded() {
        let transport = MockTransport::new();

        let err = transport.send(Request::get("/nothing")).await.unwrap_err();

        assert!(matches!(err, TransportError::NotScripted { .. }));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let transport = MockTransport::new();
        transport.fail(Method::Post, "/boom", TransportError::status(500, "down"));

        let err = transport
            .send(Request::post("/boom", json!({})))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(500));
    }
}
