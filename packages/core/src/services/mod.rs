//! Sync Services
//!
//! This module contains the client-side synchronization logic:
//!
//! - `SyncService` - the operation set the UI calls (request, merge, undo bookkeeping)
//! - `UndoHistory` - LIFO stack of reversible actions
//! - `review_loader` - recursive loading of review envelopes into the store
//!
//! Services coordinate between the transport and the entity store, which
//! know nothing about each other.

pub mod error;
mod passthrough;
pub mod review_loader;
pub mod sync_service;
pub mod undo_history;

pub use error::{Result, SyncError};
pub use review_loader::{collect_notes, load_review_point_viewed_by_user};
pub use sync_service::{SyncService, UndoOutcome};
pub use undo_history::UndoHistory;
