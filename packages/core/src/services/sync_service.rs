//! Sync Service - Stored Operations
//!
//! This module provides the operation set the UI layer calls. Every operation
//! has the same shape:
//!
//! 1. Issue exactly one request through the [`Transport`]
//! 2. Decode the response completely
//! 3. Merge the records it carries into the [`EntityStore`]
//! 4. Record an [`UndoEntry`] when the operation is reversible
//! 5. Return the decoded response
//!
//! A failed request or an undecodable response returns before step 3, so the
//! store and the undo history are left exactly as they were.
//!
//! # Session Scope
//!
//! A `SyncService` owns one session: its own store and undo history, shared
//! by clones of the service. Nothing is global; tests and concurrent sessions
//! each construct their own.
//!
//! # Concurrency
//!
//! Suspension happens only while a request is in flight. Responses merge in
//! the order they complete. Two in-flight edits of the same note are not
//! coalesced; whichever response lands last wins.

use crate::config::ClientConfig;
use crate::models::{
    Comment, CurrentUserInfo, Note, NotebooksResponse, NotesBundle, RepetitionForUser,
    ReviewPointViewedByUser, TextContent, UndoEntry, User,
};
use crate::services::error::{Result, SyncError};
use crate::services::review_loader::load_review_point_viewed_by_user;
use crate::services::undo_history::UndoHistory;
use crate::store::{EntityStore, StoreEvent};
use crate::transport::{HttpTransport, Request, Transport};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::broadcast;

/// What an undo did
#[derive(Debug, Clone, PartialEq)]
pub enum UndoOutcome {
    /// A text edit was reverted; the note as the server now has it
    Edit(Note),

    /// A deletion was reverted; whatever the server restored
    Delete(NotesBundle),
}

/// Session-scoped synchronization facade
#[derive(Clone)]
pub struct SyncService {
    transport: Arc<dyn Transport>,

    store: Arc<EntityStore>,

    undo_history: Arc<UndoHistory>,
}

impl SyncService {
    /// Create a session with an empty store and undo history
    ///
    /// # Examples
    ///
    /// ```
    /// # use notesync_core::services::SyncService;
    /// # use notesync_core::transport::MockTransport;
    /// # use std::sync::Arc;
    /// let service = SyncService::new(Arc::new(MockTransport::new()));
    /// assert!(service.peek_undo().unwrap_err().is_empty_undo_stack());
    /// ```
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            store: Arc::new(EntityStore::default()),
            undo_history: Arc::new(UndoHistory::new()),
        }
    }

    /// Create a session sized by configuration
    pub fn with_config(transport: Arc<dyn Transport>, config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            transport,
            store: Arc::new(EntityStore::new(config.event_channel_capacity)),
            undo_history: Arc::new(UndoHistory::with_capacity(config.undo_capacity)),
        })
    }

    /// Create a session talking HTTP to the configured server
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config)?;
        Self::with_config(Arc::new(transport), config)
    }

    /// The session's entity store
    pub fn store(&self) -> &Arc<EntityStore> {
        &self.store
    }

    /// The session's undo history
    pub fn undo_history(&self) -> &Arc<UndoHistory> {
        &self.undo_history
    }

    /// Subscribe to store change events
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.store.subscribe()
    }

    pub(crate) async fn send(&self, request: Request) -> Result<Value> {
        tracing::debug!("sync request {}", request);
        match self.transport.send(request).await {
            Ok(body) => Ok(body),
            Err(err) => {
                tracing::debug!("sync request failed: {}", err);
                Err(err.into())
            }
        }
    }

    /// Merge the notes and links of a bundle
    fn load_bundle(&self, bundle: &NotesBundle) {
        self.store.load_notes(bundle.notes.clone());
        self.store.load_links(bundle.links.clone());
    }

    //
    // NOTES
    //

    /// Create a child note under `parent_id`
    pub async fn create_note(&self, parent_id: &str, data: Value) -> Result<NotesBundle> {
        let body = self
            .send(Request::post(format!("/api/notes/{}/create", parent_id), data).as_form())
            .await?;
        let bundle: NotesBundle = decode_or_default("create_note", body)?;
        self.load_bundle(&bundle);
        Ok(bundle)
    }

    /// Update note settings other than its text
    pub async fn update_note(&self, note_id: &str, data: Value) -> Result<Note> {
        let body = self
            .send(
                Request::patch(format!("/api/notes/{}", note_id), without_updated_at(data))
                    .as_form(),
            )
            .await?;
        let note: Note = decode("update_note", body)?;
        self.store.load_notes(vec![note.clone()]);
        Ok(note)
    }

    /// Update a note's title/description and record the edit for undo
    ///
    /// The prior text is taken from the store. An edit of a note the store has
    /// never seen cannot be reverted, so it is applied without an undo entry.
    pub async fn update_text_content(&self, note_id: &str, text: TextContent) -> Result<Note> {
        let prior = self.store.get_note(note_id).map(|note| note.text_content());
        let note = self.update_text_content_without_undo(note_id, &text).await?;

        match prior {
            Some(prior_text_content) => {
                self.undo_history
                    .push(UndoEntry::edit(note_id, prior_text_content));
            }
            None => {
                tracing::warn!(
                    "edited note {} was not cached; edit is not undoable",
                    note_id
                );
            }
        }
        Ok(note)
    }

    async fn update_text_content_without_undo(
        &self,
        note_id: &str,
        text: &TextContent,
    ) -> Result<Note> {
        let data = serde_json::to_value(text)
            .map_err(|e| SyncError::unexpected_response("update_text_content", e.to_string()))?;
        let body = self
            .send(Request::patch(format!("/api/text_content/{}", note_id), data).as_form())
            .await?;
        let note: Note = decode("update_text_content", body)?;
        self.store.load_notes(vec![note.clone()]);
        Ok(note)
    }

    /// Delete a note and record the deletion for undo
    pub async fn delete_note(&self, note_id: &str) -> Result<Value> {
        let body = self
            .send(Request::post(format!("/api/notes/{}/delete", note_id), json!({})))
            .await?;
        self.store.remove_note(note_id);
        self.undo_history.push(UndoEntry::delete(note_id));
        Ok(body)
    }

    /// Fetch a note with all of its descendants
    pub async fn get_note_with_descendants(&self, note_id: &str) -> Result<NotesBundle> {
        let body = self
            .send(Request::get(format!("/api/notes/{}/overview", note_id)))
            .await?;
        let bundle: NotesBundle = decode_or_default("get_note_with_descendants", body)?;
        self.load_bundle(&bundle);
        Ok(bundle)
    }

    /// Fetch a note with its direct children
    pub async fn get_note_and_children(&self, note_id: &str) -> Result<NotesBundle> {
        let body = self
            .send(Request::get(format!("/api/notes/{}", note_id)))
            .await?;
        let bundle: NotesBundle = decode_or_default("get_note_and_children", body)?;
        self.load_bundle(&bundle);
        Ok(bundle)
    }

    //
    // LINKS
    //

    pub async fn create_link(
        &self,
        source_id: &str,
        target_id: &str,
        data: Value,
    ) -> Result<NotesBundle> {
        let body = self
            .send(Request::post(
                format!("/api/links/create/{}/{}", source_id, target_id),
                data,
            ))
            .await?;
        let bundle: NotesBundle = decode_or_default("create_link", body)?;
        self.load_bundle(&bundle);
        Ok(bundle)
    }

    pub async fn update_link(&self, link_id: &str, data: Value) -> Result<NotesBundle> {
        let body = self
            .send(Request::post(format!("/api/links/{}", link_id), data))
            .await?;
        let bundle: NotesBundle = decode_or_default("update_link", body)?;
        self.load_bundle(&bundle);
        Ok(bundle)
    }

    /// Delete a link; the returned notes are merged, the link removed
    pub async fn delete_link(&self, link_id: &str) -> Result<NotesBundle> {
        let body = self
            .send(Request::post(format!("/api/links/{}/delete", link_id), json!({})))
            .await?;
        let bundle: NotesBundle = decode_or_default("delete_link", body)?;
        self.store.remove_link(link_id);
        self.load_bundle(&bundle);
        Ok(bundle)
    }

    //
    // COMMENTS
    //

    pub async fn add_comment(&self, note_id: &str, data: Value) -> Result<Comment> {
        let body = self
            .send(Request::post(
                format!("/api/comments/{}/add", note_id),
                without_updated_at(data),
            ))
            .await?;
        let comment: Comment = decode("add_comment", body)?;
        self.store.load_comments(vec![comment.clone()]);
        Ok(comment)
    }

    //
    // NOTEBOOKS AND USER
    //

    pub async fn get_notebooks(&self) -> Result<NotebooksResponse> {
        let body = self.send(Request::get("/api/notebooks")).await?;
        let response: NotebooksResponse = decode_or_default("get_notebooks", body)?;
        self.store.set_notebooks(response.notebooks.clone());
        Ok(response)
    }

    /// Create a notebook, in a circle when `circle_id` is given
    ///
    /// The response is returned as-is; callers refresh the listing.
    pub async fn create_notebook(&self, circle_id: Option<&str>, data: Value) -> Result<Value> {
        let path = match circle_id {
            Some(circle_id) => format!("/api/circles/{}/notebooks", circle_id),
            None => "/api/notebooks/create".to_string(),
        };
        self.send(Request::post(path, data).as_form()).await
    }

    pub async fn get_current_user_info(&self) -> Result<CurrentUserInfo> {
        let body = self.send(Request::get("/api/user/current-user-info")).await?;
        let info: CurrentUserInfo = decode_or_default("get_current_user_info", body)?;
        self.store.set_current_user(info.user.clone());
        Ok(info)
    }

    pub async fn create_user(&self, data: Value) -> Result<User> {
        let body = self.send(Request::post("/api/user", data).as_form()).await?;
        let user: User = decode("create_user", body)?;
        self.store.set_current_user(Some(user.clone()));
        Ok(user)
    }

    pub async fn update_user(&self, user_id: &str, data: Value) -> Result<User> {
        let body = self
            .send(Request::patch(format!("/api/user/{}", user_id), data).as_form())
            .await?;
        let user: User = decode("update_user", body)?;
        self.store.set_current_user(Some(user.clone()));
        Ok(user)
    }

    //
    // FEATURE TOGGLE
    //

    pub async fn get_feature_toggle(&self) -> Result<bool> {
        let body = self
            .send(Request::get("/api/testability/feature_toggle"))
            .await?;
        let enabled: bool = decode("get_feature_toggle", body)?;
        self.store.set_feature_toggle(enabled);
        Ok(enabled)
    }

    /// Write the toggle, then read it back
    ///
    /// Issues two requests: the write response is not trusted to carry the
    /// new state, so the stored toggle comes from the follow-up read.
    pub async fn set_feature_toggle(&self, enabled: bool) -> Result<bool> {
        self.send(Request::post(
            "/api/testability/feature_toggle",
            json!({ "enabled": enabled }),
        ))
        .await?;
        self.get_feature_toggle().await
    }

    //
    // REVIEWS
    //

    /// Next note to review for the first time, if any
    pub async fn get_one_initial_review(&self) -> Result<Option<ReviewPointViewedByUser>> {
        let body = self.send(Request::get("/api/reviews/initial")).await?;
        let envelope: Option<ReviewPointViewedByUser> = decode("get_one_initial_review", body)?;
        load_review_point_viewed_by_user(&self.store, envelope.as_ref());
        Ok(envelope)
    }

    pub async fn do_initial_review(&self, data: Value) -> Result<Option<ReviewPointViewedByUser>> {
        let body = self.send(Request::post("/api/reviews", data)).await?;
        let envelope: Option<ReviewPointViewedByUser> = decode("do_initial_review", body)?;
        load_review_point_viewed_by_user(&self.store, envelope.as_ref());
        Ok(envelope)
    }

    pub async fn self_evaluate(
        &self,
        review_point_id: &str,
        data: Value,
    ) -> Result<RepetitionForUser> {
        let body = self
            .send(Request::post(
                format!("/api/reviews/{}/self-evaluate", review_point_id),
                data,
            ))
            .await?;
        let repetition: RepetitionForUser = decode_or_default("self_evaluate", body)?;
        load_review_point_viewed_by_user(
            &self.store,
            repetition.review_point_viewed_by_user.as_ref(),
        );
        Ok(repetition)
    }

    pub async fn get_next_review_item(&self) -> Result<RepetitionForUser> {
        let body = self.send(Request::get("/api/reviews/repeat")).await?;
        let repetition: RepetitionForUser = decode_or_default("get_next_review_item", body)?;
        load_review_point_viewed_by_user(
            &self.store,
            repetition.review_point_viewed_by_user.as_ref(),
        );
        Ok(repetition)
    }

    //
    // UNDO
    //

    /// The action the next undo would reverse
    pub fn peek_undo(&self) -> Result<UndoEntry> {
        self.undo_history.peek()
    }

    /// Reverse the most recent reversible action
    ///
    /// The entry leaves the history before the reversal request is sent and
    /// does not come back if that request fails.
    pub async fn undo(&self) -> Result<UndoOutcome> {
        let entry = self.undo_history.pop()?;
        tracing::info!("undo {} of note {}", entry.kind(), entry.note_id());

        match entry {
            UndoEntry::Edit {
                note_id,
                prior_text_content,
            } => {
                let note = self
                    .update_text_content_without_undo(&note_id, &prior_text_content)
                    .await?;
                Ok(UndoOutcome::Edit(note))
            }
            UndoEntry::Delete { note_id } => {
                let body = self
                    .send(Request::patch(
                        format!("/api/notes/{}/undo-delete", note_id),
                        json!({}),
                    ))
                    .await?;
                let bundle: NotesBundle = decode_or_default("undo_delete", body)?;
                self.load_bundle(&bundle);

                if bundle.first_note().is_some_and(Note::is_root) {
                    if let Err(err) = self.get_notebooks().await {
                        tracing::warn!("notebook refresh after undo-delete failed: {}", err);
                    }
                }
                Ok(UndoOutcome::Delete(bundle))
            }
        }
    }
}

/// Decode a response body into the shape an operation expects
fn decode<T: DeserializeOwned>(operation: &str, body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|e| SyncError::unexpected_response(operation, e.to_string()))
}

/// Like [`decode`], but an empty (`null`) body decodes to the default value
fn decode_or_default<T: DeserializeOwned + Default>(operation: &str, body: Value) -> Result<T> {
    if body.is_null() {
        return Ok(T::default());
    }
    decode(operation, body)
}

/// Drop a client-side `updatedAt` before sending; the server owns it
fn without_updated_at(mut data: Value) -> Value {
    if let Value::Object(ref mut map) = data {
        map.remove("updatedAt");
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_updated_at() {
        let data = without_updated_at(json!({ "title": "t", "updatedAt": "2024-01-01" }));
        assert_eq!(data, json!({ "title": "t" }));
        assert_eq!(without_updated_at(json!(null)), json!(null));
    }

    #[test]
    fn test_decode_or_default_accepts_null() {
        let bundle: NotesBundle = decode_or_default("op", Value::Null).unwrap();
        assert!(bundle.notes.is_empty());
    }

    #[test]
    fn test_decode_reports_operation() {
        let err = decode::<Note>("update_note", json!({ "title": "no id" })).unwrap_err();
        match err {
            SyncError::UnexpectedResponse { operation, .. } => assert_eq!(operation, "update_note"),
            other => panic!("Expected UnexpectedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_with_config_rejects_invalid_config() {
        let config = ClientConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let transport = Arc::new(crate::transport::MockTransport::new());
        assert!(matches!(
            SyncService::with_config(transport, &config),
            Err(SyncError::Config(_))
        ));
    }
}
