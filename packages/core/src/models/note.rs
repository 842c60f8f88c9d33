//! Note Graph Records
//!
//! This module defines the records the server hands back for the note graph:
//! notes, links between notes, comments, notebooks and the signed-in user.
//!
//! # Identity
//!
//! Every record that lives in the entity store implements [`Entity`], which
//! exposes the identifier the store keys it by. Records are never patched
//! field-by-field: a fresher copy with the same identifier replaces the old one.
//!
//! # Wire Format
//!
//! The server speaks camelCase JSON. Identifiers are accepted either as strings
//! or as integers (the server uses numeric primary keys), and are normalized to
//! `String` on the way in.
//!
//! # Examples
//!
//! ```rust
//! use notesync_core::models::Note;
//! use serde_json::json;
//!
//! let note: Note = serde_json::from_value(json!({
//!     "id": 42,
//!     "parentId": null,
//!     "title": "Rust ownership",
//! }))
//! .unwrap();
//!
//! assert_eq!(note.id, "42");
//! assert!(note.is_root());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A record the entity store can hold, keyed by its identifier.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Identifier the store keys this record by
    fn entity_id(&self) -> &str;
}

/// Accepts `"42"` or `42` and yields `"42"`.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

/// Same as [`deserialize_id`] for nullable references.
pub(crate) fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(
        Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }),
    )
}

/// The user-editable part of a note.
///
/// This is what a text edit sends to the server, and what an undo of that edit
/// sends back.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,
}

impl TextContent {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// A note in the hierarchical note graph.
///
/// # Fields
///
/// - `id`: Unique identifier
/// - `parent_id`: Parent note (`None` means this note is a notebook head / root)
/// - `title`: Note title
/// - `description`: Free-form text content
/// - `updated_at`: Server-side modification timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub parent_id: Option<String>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Create a note with empty description and no timestamp
    pub fn new(id: impl Into<String>, parent_id: Option<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id,
            title: title.into(),
            description: String::new(),
            updated_at: None,
        }
    }

    /// Builder-style description setter
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Root notes head a notebook and have no parent
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Snapshot of the editable text of this note
    pub fn text_content(&self) -> TextContent {
        TextContent {
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }
}

impl Entity for Note {
    fn entity_id(&self) -> &str {
        &self.id
    }
}

/// A typed link from one note to another.
///
/// Fields the client does not interpret (link type details, perspective flags)
/// are kept verbatim in `payload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(deserialize_with = "deserialize_id")]
    pub source_id: String,

    #[serde(deserialize_with = "deserialize_id")]
    pub target_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,

    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Link {
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            link_type: None,
            payload: Map::new(),
        }
    }

    /// Whether either end of this link is the given note
    pub fn touches(&self, note_id: &str) -> bool {
        self.source_id == note_id || self.target_id == note_id
    }
}

impl Entity for Link {
    fn entity_id(&self) -> &str {
        &self.id
    }
}

/// A comment attached to a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(deserialize_with = "deserialize_id")]
    pub note_id: String,

    #[serde(default)]
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Comment {
    fn entity_id(&self) -> &str {
        &self.id
    }
}

/// A notebook as listed on the notebooks page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub head_note_id: Option<String>,

    #[serde(default)]
    pub skip_review_entirely: bool,
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_identifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_new_notes_count: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_intervals: Option<String>,
}
