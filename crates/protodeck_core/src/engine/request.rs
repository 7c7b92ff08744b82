//! Mutation request payloads.
//!
//! Each request bundles the addressing tuple with the fields the mutation
//! overwrites. Field names follow the document schema so a route layer can
//! deserialize them directly, but nothing here assumes a transport.

use super::address::AddressFields;
use crate::model::comment::CommentType;
use crate::model::hotspot::HotspotType;
use crate::model::node::NodeStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Geometry shared by hotspot requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub w: Option<f64>,
    #[serde(default)]
    pub h: Option<f64>,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            w: Some(w),
            h: Some(h),
        }
    }
}

/// Create or overwrite a unique hotspot (or a registry master).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotRequest {
    #[serde(flatten)]
    pub address: AddressFields,
    /// Required for updates; generated on add when absent.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: HotspotType,
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// Place or remove an instance of a global master.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalHotspotRequest {
    #[serde(flatten)]
    pub address: AddressFields,
    /// Registry key of the master definition.
    pub hotspot_name: String,
}

/// Create or overwrite a comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    #[serde(flatten)]
    pub address: AddressFields,
    /// Required for updates; generated on add when absent.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: CommentType,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    pub comment: String,
    #[serde(default)]
    pub quill: Option<Value>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub resolved: Option<bool>,
}

/// Soft-delete a comment by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentKey {
    #[serde(flatten)]
    pub address: AddressFields,
    pub id: String,
}

/// Overwrite a node's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    #[serde(flatten)]
    pub address: AddressFields,
    pub status: NodeStatus,
}

/// Overwrite a node's drawer visibility and title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawerRequest {
    #[serde(flatten)]
    pub address: AddressFields,
    pub show_in_drawer: bool,
    /// Required when `show_in_drawer` is true.
    #[serde(default)]
    pub title: Option<String>,
}
