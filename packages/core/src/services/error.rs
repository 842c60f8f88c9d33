//! Service Layer Error Types
//!
//! This module defines the errors surfaced by the sync service. Transport
//! failures pass through unchanged; the remaining variants describe conditions
//! the sync layer itself detects.

use crate::transport::TransportError;
use thiserror::Error;

/// Sync operation errors
#[derive(Error, Debug)]
pub enum SyncError {
    /// The request failed; nothing was merged and no undo entry was recorded
    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    /// Undo was requested with nothing to reverse
    #[error("Nothing to undo")]
    EmptyUndoStack,

    /// The response did not have the shape the operation expects
    #[error("Unexpected response for {operation}: {message}")]
    UnexpectedResponse { operation: String, message: String },

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SyncError {
    /// Create an unexpected response error
    pub fn unexpected_response(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this is the empty-undo condition (UI disables the control)
    pub fn is_empty_undo_stack(&self) -> bool {
        matches!(self, SyncError::EmptyUndoStack)
    }

    /// Whether the request itself failed
    pub fn is_transport(&self) -> bool {
        matches!(self, SyncError::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
