//! Review Point Envelopes
//!
//! The review endpoints describe "the current review point and how the user
//! last viewed it". When the review point was reached through a link, the
//! payload carries a [`LinkViewedByUser`] whose two sides are again
//! [`NoteWithPosition`] values, and each side may carry its own
//! `linkViewedByUser`. The nesting depth is decided by the server.
//!
//! Every field is optional: a missing or `null` field at any depth simply means
//! there is nothing further to load.

use crate::models::note::{deserialize_id, deserialize_optional_id, Note};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A unit of spaced-repetition review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPoint {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub note_id: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub link_id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A note plus its position in the notebook, possibly reached through a link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteWithPosition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<Note>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_position: Option<Value>,

    #[serde(
        default,
        alias = "linkViewedbyUser",
        skip_serializing_if = "Option::is_none"
    )]
    pub link_viewed_by_user: Option<Box<LinkViewedByUser>>,
}

/// How the user traversed a link: the link plus both of its ends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkViewedByUser {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_note_with_position: Option<Box<NoteWithPosition>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_note_with_position: Option<Box<NoteWithPosition>>,
}

/// The review envelope returned by the review endpoints.
///
/// Counters and other fields the client only displays are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPointViewedByUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_point: Option<ReviewPoint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_with_position: Option<NoteWithPosition>,

    #[serde(
        default,
        alias = "linkViewedbyUser",
        skip_serializing_if = "Option::is_none"
    )]
    pub link_viewed_by_user: Option<LinkViewedByUser>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of the repetition endpoints, which wrap the envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepetitionForUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_point_viewed_by_user: Option<ReviewPointViewedByUser>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NoteWithPosition {
    pub fn of(note: Note) -> Self {
        Self {
            note: Some(note),
            ..Default::default()
        }
    }

    /// Attach the link traversal that led to this note
    pub fn reached_via(mut self, link: LinkViewedByUser) -> Self {
        self.link_viewed_by_user = Some(Box::new(link));
        self
    }
}

impl LinkViewedByUser {
    pub fn between(id: impl Into<String>, source: NoteWithPosition, target: NoteWithPosition) -> Self {
        Self {
            id: Some(id.into()),
            source_note_with_position: Some(Box::new(source)),
            target_note_with_position: Some(Box::new(target)),
        }
    }
}
