//! Store Events
//!
//! This module defines the events the entity store emits whenever its contents
//! change. They follow the observer pattern, allowing the UI layer to re-render
//! without coupling to the sync service.
//!
//! # Architecture
//!
//! Events are emitted using tokio's broadcast channel, allowing multiple
//! subscribers to receive notifications.
//!
//! # Event Flow
//!
//! 1. The sync service receives a server response
//! 2. The response is merged into the entity store
//! 3. The store emits one event per merge, before the merge call returns
//! 4. Subscribers receive the event (already queued when the service call resolves)

use crate::models::{Comment, Link, Note, Notebook, User};

/// Events emitted by the entity store
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// Notes were inserted or replaced
    NotesLoaded(Vec<Note>),

    /// A note was removed after a delete acknowledgement
    NoteRemoved { id: String },

    /// Links were inserted or replaced
    LinksLoaded(Vec<Link>),

    /// A link was removed after a delete acknowledgement
    LinkRemoved { id: String },

    /// Comments were inserted or replaced
    CommentsLoaded(Vec<Comment>),

    /// The notebook listing was replaced
    NotebooksLoaded(Vec<Notebook>),

    /// The signed-in user changed
    CurrentUserChanged(Option<User>),

    /// The feature toggle changed
    FeatureToggleChanged(bool),
}

impl StoreEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &str {
        match self {
            StoreEvent::NotesLoaded(_) => "notes:loaded",
            StoreEvent::NoteRemoved { .. } => "note:removed",
            StoreEvent::LinksLoaded(_) => "links:loaded",
            StoreEvent::LinkRemoved { .. } => "link:removed",
            StoreEvent::CommentsLoaded(_) => "comments:loaded",
            StoreEvent::NotebooksLoaded(_) => "notebooks:loaded",
            StoreEvent::CurrentUserChanged(_) => "user:changed",
            StoreEvent::FeatureToggleChanged(_) => "feature-toggle:changed",
        }
    }
}
