//! Threaded comment records.
//!
//! # Invariants
//! - `id` is stable once assigned and is the merge key.
//! - Soft delete flips `type` to `"deleted"`; the record stays in its list.
//! - `resolved` absent means the thread is open.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Comment category shown to reviewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentType {
    Logic,
    Notification,
    /// Rendered as "Note" in the prototype.
    #[serde(alias = "note")]
    Comment,
    Question,
    Design,
    Deleted,
}

/// One comment pinned to a node or scroll zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Serialized as `type`; hand-written data sometimes omits it.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CommentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Plain-text body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Rich-text delta produced by the editor, stored opaquely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quill: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_zone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Comment {
    /// Creates an open comment with the given id and body.
    pub fn new(id: impl Into<String>, kind: CommentType, body: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            kind: Some(kind),
            x: None,
            y: None,
            comment: Some(body.into()),
            quill: None,
            user: None,
            updated_on: None,
            resolved: None,
            file: None,
            name: None,
            parent: None,
            scroll_zone: None,
            extra: Map::new(),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.kind == Some(CommentType::Deleted)
    }

    pub fn soft_delete(&mut self) {
        self.kind = Some(CommentType::Deleted);
    }
}
