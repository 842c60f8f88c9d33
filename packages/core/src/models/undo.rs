//! Undo Entries
//!
//! An undo entry records one user action that the client knows how to reverse.

use crate::models::note::TextContent;
use serde::{Deserialize, Serialize};

/// A reversible user action.
///
/// Serialized internally tagged (`{"kind":"edit",...}`) so the UI can show
/// what the next undo will do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UndoEntry {
    /// A text edit; undoing it writes `prior_text_content` back
    #[serde(rename = "edit", rename_all = "camelCase")]
    Edit {
        note_id: String,
        prior_text_content: TextContent,
    },

    /// A note deletion; undoing it asks the server to restore the note
    #[serde(rename = "delete", rename_all = "camelCase")]
    Delete { note_id: String },
}

impl UndoEntry {
    pub fn edit(note_id: impl Into<String>, prior_text_content: TextContent) -> Self {
        Self::Edit {
            note_id: note_id.into(),
            prior_text_content,
        }
    }

    pub fn delete(note_id: impl Into<String>) -> Self {
        Self::Delete {
            note_id: note_id.into(),
        }
    }

    /// The note this entry would act on
    pub fn note_id(&self) -> &str {
        match self {
            UndoEntry::Edit { note_id, .. } | UndoEntry::Delete { note_id } => note_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            UndoEntry::Edit { .. } => "edit",
            UndoEntry::Delete { .. } => "delete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The UI reads the `kind` tag flat alongside the entry fields.
    #[test]
    fn test_undo_entry_serialization_contract() {
        let entry = UndoEntry::edit("N1", TextContent::new("Hello", ""));
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["kind"], "edit");
        assert_eq!(json["noteId"], "N1");
        assert_eq!(json["priorTextContent"]["title"], "Hello");

        let json = serde_json::to_value(UndoEntry::delete("N2")).unwrap();
        assert_eq!(json["kind"], "delete");
        assert_eq!(json["noteId"], "N2");
    }

    #[test]
    fn test_accessors() {
        let entry = UndoEntry::delete("N2");
        assert_eq!(entry.note_id(), "N2");
        assert_eq!(entry.kind(), "delete");
    }
}
