//! Normalized Entity Store
//!
//! In-memory cache of everything the server has told this session about the
//! note graph: notes, links, comments, the notebook listing, the signed-in user
//! and the feature toggle.
//!
//! # Merge Semantics
//!
//! Records are keyed by identifier. Merging a record replaces any record with
//! the same identifier wholesale; fields are never reconciled individually, so
//! the last response to arrive wins. Records leave the store only through an
//! explicit delete acknowledgement, never through eviction.
//!
//! # Notification
//!
//! Every non-empty merge emits a [`StoreEvent`] on a broadcast channel before
//! the merge call returns. A caller awaiting a sync operation therefore sees an
//! already-updated store, and subscribers already have the event queued.
//!
//! # Locking
//!
//! State sits behind a `std::sync::Mutex`. Merges never suspend, so the lock is
//! never held across an `.await`.

use crate::models::{Comment, Entity, Link, Note, Notebook, User};
use crate::store::events::StoreEvent;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;

/// Default broadcast capacity for store events
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 128;

/// Records of one kind, keyed by identifier.
#[derive(Debug, Clone)]
pub struct EntityTable<T: Entity> {
    records: HashMap<String, T>,
}

impl<T: Entity> Default for EntityTable<T> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
        }
    }
}

impl<T: Entity> EntityTable<T> {
    /// Replace-or-insert each record in order; later duplicates win
    pub fn merge(&mut self, records: impl IntoIterator<Item = T>) {
        for record in records {
            self.records.insert(record.entity_id().to_string(), record);
        }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.get(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        self.records.remove(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }
}

/// All tables of one session.
#[doc(hidden)]
#[derive(Debug, Default)]
pub struct Tables {
    notes: EntityTable<Note>,
    links: EntityTable<Link>,
    comments: EntityTable<Comment>,
    notebooks: Vec<Notebook>,
    current_user: Option<User>,
    feature_toggle: bool,
}

/// A record kind the store keeps a table for.
///
/// Lets callers write `store.merge(notes)` / `store.get::<Note>(id)` generically.
pub trait Stored: Entity {
    #[doc(hidden)]
    fn table(tables: &mut Tables) -> &mut EntityTable<Self>;

    /// Event announcing that these records were merged
    fn loaded_event(records: Vec<Self>) -> StoreEvent;
}

impl Stored for Note {
    fn table(tables: &mut Tables) -> &mut EntityTable<Self> {
        &mut tables.notes
    }

    fn loaded_event(records: Vec<Self>) -> StoreEvent {
        StoreEvent::NotesLoaded(records)
    }
}

impl Stored for Link {
    fn table(tables: &mut Tables) -> &mut EntityTable<Self> {
        &mut tables.links
    }

    fn loaded_event(records: Vec<Self>) -> StoreEvent {
        StoreEvent::LinksLoaded(records)
    }
}

impl Stored for Comment {
    fn table(tables: &mut Tables) -> &mut EntityTable<Self> {
        &mut tables.comments
    }

    fn loaded_event(records: Vec<Self>) -> StoreEvent {
        StoreEvent::CommentsLoaded(records)
    }
}

/// Session-scoped normalized store of server records
pub struct EntityStore {
    tables: Mutex<Tables>,

    /// Broadcast channel for store events
    event_tx: broadcast::Sender<StoreEvent>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CHANNEL_CAPACITY)
    }
}

impl EntityStore {
    /// Create an empty store whose event channel buffers `event_capacity` events
    pub fn new(event_capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(event_capacity.max(1));
        Self {
            tables: Mutex::new(Tables::default()),
            event_tx,
        }
    }

    /// Subscribe to store events
    ///
    /// # Examples
    ///
    /// ```
    /// # use notesync_core::store::{EntityStore, StoreEvent};
    /// # use notesync_core::models::Note;
    /// let store = EntityStore::default();
    /// let mut rx = store.subscribe();
    ///
    /// store.load_notes(vec![Note::new("A", None, "X")]);
    ///
    /// match rx.try_recv().unwrap() {
    ///     StoreEvent::NotesLoaded(notes) => assert_eq!(notes[0].id, "A"),
    ///     other => panic!("unexpected event {:?}", other),
    /// }
    /// ```
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }

    /// Ignores errors if no subscribers
    fn emit_event(&self, event: StoreEvent) {
        tracing::trace!("store event {}", event.event_type());
        let _ = self.event_tx.send(event);
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Merge records of any stored kind
    ///
    /// Each record replaces the record with the same identifier, or is
    /// inserted if none exists. Empty input is a no-op and emits nothing.
    pub fn merge<T: Stored>(&self, records: Vec<T>) {
        if records.is_empty() {
            return;
        }
        {
            let mut tables = self.lock();
            T::table(&mut tables).merge(records.iter().cloned());
        }
        tracing::debug!("merged {} record(s)", records.len());
        self.emit_event(T::loaded_event(records));
    }

    /// Current record with this identifier, if any
    pub fn get<T: Stored>(&self, id: &str) -> Option<T> {
        let mut tables = self.lock();
        T::table(&mut tables).get(id).cloned()
    }

    /// Number of records of this kind
    pub fn count<T: Stored>(&self) -> usize {
        let mut tables = self.lock();
        T::table(&mut tables).len()
    }

    pub fn load_notes(&self, notes: Vec<Note>) {
        self.merge(notes);
    }

    pub fn load_links(&self, links: Vec<Link>) {
        self.merge(links);
    }

    pub fn load_comments(&self, comments: Vec<Comment>) {
        self.merge(comments);
    }

    pub fn get_note(&self, id: &str) -> Option<Note> {
        self.get::<Note>(id)
    }

    pub fn get_link(&self, id: &str) -> Option<Link> {
        self.get::<Link>(id)
    }

    pub fn get_comment(&self, id: &str) -> Option<Comment> {
        self.get::<Comment>(id)
    }

    /// Remove a note after the server acknowledged its deletion
    pub fn remove_note(&self, id: &str) -> Option<Note> {
        let removed = self.lock().notes.remove(id);
        if removed.is_some() {
            self.emit_event(StoreEvent::NoteRemoved { id: id.to_string() });
        }
        removed
    }

    /// Remove a link after the server acknowledged its deletion
    pub fn remove_link(&self, id: &str) -> Option<Link> {
        let removed = self.lock().links.remove(id);
        if removed.is_some() {
            self.emit_event(StoreEvent::LinkRemoved { id: id.to_string() });
        }
        removed
    }

    /// Cached children of a note, ordered by identifier
    pub fn children_of(&self, parent_id: &str) -> Vec<Note> {
        let tables = self.lock();
        let mut children: Vec<Note> = tables
            .notes
            .values()
            .filter(|note| note.parent_id.as_deref() == Some(parent_id))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.id.cmp(&b.id));
        children
    }

    /// Cached links with either end at this note, ordered by identifier
    pub fn links_of(&self, note_id: &str) -> Vec<Link> {
        let tables = self.lock();
        let mut links: Vec<Link> = tables
            .links
            .values()
            .filter(|link| link.touches(note_id))
            .cloned()
            .collect();
        links.sort_by(|a, b| a.id.cmp(&b.id));
        links
    }

    /// Cached comments on this note, ordered by identifier
    pub fn comments_of(&self, note_id: &str) -> Vec<Comment> {
        let tables = self.lock();
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|comment| comment.note_id == note_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.id.cmp(&b.id));
        comments
    }

    /// Replace the notebook listing wholesale
    pub fn set_notebooks(&self, notebooks: Vec<Notebook>) {
        self.lock().notebooks = notebooks.clone();
        self.emit_event(StoreEvent::NotebooksLoaded(notebooks));
    }

    pub fn notebooks(&self) -> Vec<Notebook> {
        self.lock().notebooks.clone()
    }

    pub fn set_current_user(&self, user: Option<User>) {
        self.lock().current_user = user.clone();
        self.emit_event(StoreEvent::CurrentUserChanged(user));
    }

    pub fn current_user(&self) -> Option<User> {
        self.lock().current_user.clone()
    }

    pub fn set_feature_toggle(&self, enabled: bool) {
        self.lock().feature_toggle = enabled;
        self.emit_event(StoreEvent::FeatureToggleChanged(enabled));
    }

    pub fn feature_toggle(&self) -> bool {
        self.lock().feature_toggle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, title: &str) -> Note {
        Note::new(id, None, title)
    }

    #[test]
    fn test_last_merge_wins() {
        let store = EntityStore::default();

        store.load_notes(vec![note("A", "X")]);
        store.load_notes(vec![note("A", "Y")]);

        assert_eq!(store.get_note("A").unwrap().title, "Y");
        assert_eq!(store.count::<Note>(), 1);
    }

    #[test]
    fn test_merge_replaces_instead_of_patching() {
        let store = EntityStore::default();

        store.load_notes(vec![note("A", "X").with_description("long body")]);
        store.load_notes(vec![note("A", "X")]);

        // The second copy had no description, so none survives
        assert_eq!(store.get_note("A").unwrap().description, "");
    }

    #[test]
    fn test_duplicates_within_one_batch_keep_the_later_copy() {
        let store = EntityStore::default();

        store.load_notes(vec![note("A", "first"), note("B", "b"), note("A", "second")]);

        assert_eq!(store.get_note("A").unwrap().title, "second");
        assert_eq!(store.count::<Note>(), 2);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = EntityStore::default();
        assert!(store.get_note("nope").is_none());
        assert!(store.get_link("nope").is_none());
        assert!(store.get_comment("nope").is_none());
    }

    #[test]
    fn test_merge_emits_event_synchronously() {
        let store = EntityStore::default();
        let mut rx = store.subscribe();

        store.load_notes(vec![note("A", "X")]);

        match rx.try_recv().unwrap() {
            StoreEvent::NotesLoaded(notes) => assert_eq!(notes, vec![note("A", "X")]),
            other => panic!("Expected NotesLoaded, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_merge_emits_nothing() {
        let store = EntityStore::default();
        let mut rx = store.subscribe();

        store.load_notes(vec![]);

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_remove_note_only_emits_when_present() {
        let store = EntityStore::default();
        store.load_notes(vec![note("A", "X")]);
        let mut rx = store.subscribe();

        assert!(store.remove_note("missing").is_none());
        assert!(rx.try_recv().is_err());

        assert!(store.remove_note("A").is_some());
        assert!(matches!(
            rx.try_recv().unwrap(),
            StoreEvent::NoteRemoved { id } if id == "A"
        ));
        assert!(store.get_note("A").is_none());
    }

    #[test]
    fn test_children_links_and_comments_lookup() {
        let store = EntityStore::default();
        store.load_notes(vec![
            Note::new("root", None, "Root"),
            Note::new("c2", Some("root".into()), "Two"),
            Note::new("c1", Some("root".into()), "One"),
            Note::new("other", Some("elsewhere".into()), "Other"),
        ]);
        store.load_links(vec![Link::new("L1", "c1", "c2"), Link::new("L2", "other", "x")]);
        store.load_comments(vec![Comment {
            id: "K1".into(),
            note_id: "c1".into(),
            content: "nice".into(),
            created_at: None,
        }]);

        let children: Vec<String> = store.children_of("root").into_iter().map(|n| n.id).collect();
        assert_eq!(children, vec!["c1", "c2"]);
        assert_eq!(store.links_of("c2").len(), 1);
        assert_eq!(store.comments_of("c1")[0].content, "nice");
        assert!(store.comments_of("c2").is_empty());
    }

    #[test]
    fn test_session_singletons() {
        let store = EntityStore::default();
        assert!(!store.feature_toggle());
        assert!(store.current_user().is_none());

        store.set_feature_toggle(true);
        store.set_notebooks(vec![Notebook {
            id: "1".into(),
            head_note_id: Some("A".into()),
            skip_review_entirely: false,
        }]);

        assert!(store.feature_toggle());
        assert_eq!(store.notebooks().len(), 1);
    }
}
