//! Response Bodies
//!
//! Shapes of the server responses the sync layer decodes before merging.
//! Fields the client only passes through are kept in `extra`.

use crate::models::note::{Link, Note, Notebook, User};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Any response that carries notes (and possibly links) to merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesBundle {
    #[serde(default)]
    pub notes: Vec<Note>,

    #[serde(default)]
    pub links: Vec<Link>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NotesBundle {
    pub fn new(notes: Vec<Note>) -> Self {
        Self {
            notes,
            ..Default::default()
        }
    }

    /// First note of the bundle (the restored note for undo-delete)
    pub fn first_note(&self) -> Option<&Note> {
        self.notes.first()
    }
}

/// Response of the notebooks listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotebooksResponse {
    #[serde(default)]
    pub notebooks: Vec<Notebook>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of the current-user-info endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserInfo {
    #[serde(default)]
    pub user: Option<User>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
