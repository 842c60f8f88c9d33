//! NoteSync Core Client Layer
//!
//! This crate keeps a client-side copy of a hierarchical note/link graph in
//! step with the notes server, optimistically and per session.
//!
//! # Architecture
//!
//! - **Normalized Store**: records keyed by identifier, replaced wholesale by fresher copies
//! - **Recursive Review Loading**: review envelopes are walked to any depth
//! - **Undo History**: text edits and deletions can be reversed, most recent first
//! - **Injected Transport**: the network is a trait; HTTP is one implementation
//!
//! # Modules
//!
//! - [`models`] - Records exchanged with the server (Note, Link, review envelopes, ...)
//! - [`store`] - Entity store and change events
//! - [`services`] - SyncService, UndoHistory, review loader
//! - [`transport`] - Transport trait, reqwest and scripted implementations
//! - [`config`] - Client configuration

pub mod config;
pub mod models;
pub mod services;
pub mod store;
pub mod transport;

// Re-export commonly used types
pub use config::ClientConfig;
pub use models::*;
pub use services::{SyncError, SyncService, UndoHistory, UndoOutcome};
pub use store::{EntityStore, StoreEvent};
pub use transport::{HttpTransport, MockTransport, Transport, TransportError};
