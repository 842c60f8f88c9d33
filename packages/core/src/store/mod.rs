//! Entity Store Layer
//!
//! This module holds the client-side cache of server records:
//!
//! - `EntityStore` - normalized, last-write-wins tables keyed by identifier
//! - `StoreEvent` - change notifications for the UI layer
//!
//! The store knows nothing about the network; the sync service feeds it.

mod entity_store;
pub mod events;

pub use entity_store::{EntityStore, EntityTable, Stored, DEFAULT_EVENT_CHANNEL_CAPACITY};
pub use events::StoreEvent;
