//! Transport Abstraction
//!
//! The sync service never talks HTTP directly. It hands a [`Request`] to a
//! [`Transport`] and gets JSON back. This module defines that seam:
//!
//! - `Transport` - the async request capability the sync service consumes
//! - `HttpTransport` - `reqwest` implementation against a notes server
//! - `MockTransport` - scripted implementation for tests and demos
//!
//! Only success/failure matters to the sync layer; status codes beyond that are
//! carried in [`TransportError`] for the caller's benefit.

mod error;
mod http;
pub mod mock;

pub use error::TransportError;
pub use http::{form_fields, HttpTransport};
pub use mock::MockTransport;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// HTTP verbs used by the notes API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a request body goes on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyEncoding {
    #[default]
    Json,
    /// Multipart form, nested objects flattened to dotted field names
    Form,
}

/// One request to the notes server
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Absolute path, e.g. `/api/notes/42`
    pub path: String,
    pub body: Option<Value>,
    pub encoding: BodyEncoding,
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            encoding: BodyEncoding::Json,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
            encoding: BodyEncoding::Json,
        }
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Patch,
            path: path.into(),
            body: Some(body),
            encoding: BodyEncoding::Json,
        }
    }

    /// Send the body as a multipart form instead of JSON
    pub fn as_form(mut self) -> Self {
        self.encoding = BodyEncoding::Form;
        self
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Request capability consumed by the sync service
///
/// Implementations must be `Send + Sync` so a service can be shared across
/// tasks. A successful call returns the decoded JSON body (`Value::Null` for
/// an empty body).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Value, TransportError>;
}
