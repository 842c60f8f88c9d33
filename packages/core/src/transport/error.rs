//! Transport Error Types

use thiserror::Error;

/// Failures of a single request/response exchange.
///
/// These reach the caller of the sync service unchanged; the sync layer never
/// retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request never produced an HTTP response (connect, timeout, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not valid JSON
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// A scripted transport received a request nobody scripted
    #[error("No response scripted for {method} {path}")]
    NotScripted { method: String, path: String },
}

impl TransportError {
    /// Create a status error
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of the failure, when the server produced one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => TransportError::status(status.as_u16(), err.to_string()),
            None if err.is_decode() => TransportError::Decode(err.to_string()),
            None => TransportError::Network(err.to_string()),
        }
    }
}
