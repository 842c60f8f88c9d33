//! Data Models
//!
//! This module contains the records exchanged with the notes server:
//!
//! - `Note`, `Link`, `Comment`, `Notebook`, `User` - note graph records
//! - `ReviewPointViewedByUser` and friends - recursive review envelopes
//! - `UndoEntry` - reversible user actions
//! - Response bodies decoded by the sync service

mod note;
mod responses;
mod review;
mod undo;

pub use note::{Comment, Entity, Link, Note, Notebook, TextContent, User};
pub use responses::{CurrentUserInfo, NotebooksResponse, NotesBundle};
pub use review::{
    LinkViewedByUser, NoteWithPosition, RepetitionForUser, ReviewPoint, ReviewPointViewedByUser,
};
pub use undo::UndoEntry;
