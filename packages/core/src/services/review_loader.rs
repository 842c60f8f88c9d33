//! Review Graph Loader
//!
//! Walks a review envelope and feeds every note it names into the entity store.
//!
//! # Traversal
//!
//! For an envelope (or any `NoteWithPosition`, which is treated the same way):
//!
//! 1. its note, when present
//! 2. if a link traversal is present: the source side, then the target side,
//!    each walked recursively
//!
//! A missing field at any depth ends that branch. The structure is an owned
//! tree, so the walk always terminates; merging the same envelope twice leaves
//! the store unchanged.

use crate::models::{LinkViewedByUser, Note, NoteWithPosition, ReviewPointViewedByUser};
use crate::store::EntityStore;

/// Notes named anywhere in the envelope, in traversal order.
pub fn collect_notes(envelope: &ReviewPointViewedByUser) -> Vec<Note> {
    let mut notes = Vec::new();
    if let Some(ref position) = envelope.note_with_position {
        collect_from_position(position, &mut notes);
    }
    if let Some(ref link) = envelope.link_viewed_by_user {
        collect_from_link(link, &mut notes);
    }
    notes
}

fn collect_from_position(position: &NoteWithPosition, out: &mut Vec<Note>) {
    if let Some(ref note) = position.note {
        out.push(note.clone());
    }
    if let Some(ref link) = position.link_viewed_by_user {
        collect_from_link(link, out);
    }
}

fn collect_from_link(link: &LinkViewedByUser, out: &mut Vec<Note>) {
    if let Some(ref source) = link.source_note_with_position {
        collect_from_position(source, out);
    }
    if let Some(ref target) = link.target_note_with_position {
        collect_from_position(target, out);
    }
}

/// Merge every note of an optional envelope into the store.
///
/// Returns how many notes were merged (duplicates counted each time seen).
pub fn load_review_point_viewed_by_user(
    store: &EntityStore,
    envelope: Option<&ReviewPointViewedByUser>,
) -> usize {
    let Some(envelope) = envelope else {
        return 0;
    };

    let notes = collect_notes(envelope);
    let count = notes.len();
    tracing::debug!("review envelope named {} note(s)", count);
    store.load_notes(notes);
    count
}
