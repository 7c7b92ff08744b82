//! Slide nodes, scroll zones and layers.
//!
//! # Responsibility
//! - Model one screen (or one overlay item) and its nested regions.
//! - Expose the [`Form`] seam shared by nodes and scroll zones, which are
//!   the two places hotspots and comments can be attached.
//!
//! # Invariants
//! - `id` and `name` are immutable after creation.
//! - `drawer_info` is only meaningful while `show_in_drawer == Some(true)`;
//!   it may linger stale after the flag is cleared.
//! - Scroll zones are addressed by `id` alone.

use super::comment::Comment;
use super::hotspot::Hotspot;
use super::DELETED;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Completeness of a screen as shown by the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeStatus {
    #[serde(rename = "notStarted", alias = "not-started")]
    NotStarted,
    #[serde(rename = "conceptual")]
    Conceptual,
    #[serde(
        rename = "inProgress",
        alias = "in-progress",
        alias = "design-in-progress"
    )]
    InProgress,
    #[serde(rename = "approved")]
    Approved,
    #[serde(rename = "onHold", alias = "on-hold")]
    OnHold,
}

/// Navigation drawer entry for a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawerInfo {
    pub title: String,
    /// Owning module name; derived, never caller supplied.
    #[serde(default)]
    pub group: String,
}

/// A static image layer floating inside a scroll zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotspots: Option<Vec<Hotspot>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Scrollable sub-region of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollZone {
    /// Addressing key, also used as the zone's display name.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_img_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<Layer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotspots: Option<Vec<Hotspot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScrollZone {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            x: None,
            y: None,
            w: None,
            h: None,
            img: None,
            max_img_width: None,
            layers: None,
            hotspots: None,
            comments: None,
            extra: Map::new(),
        }
    }
}

/// One screen, or one item nested in an overlay entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Must equal the node's key in the owning module.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Slide image path; older exports spell the key `image`.
    #[serde(
        rename = "img",
        alias = "image",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    /// Tombstone marker; `Some("deleted")` once removed upstream.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_drawer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawer_info: Option<DrawerInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotspots: Option<Vec<Hotspot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_zones: Option<Vec<ScrollZone>>,
    /// Set on overlay items only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Overlay entry name; a relation, not ownership.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// Creates an empty node with the given identity.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            image: None,
            kind: None,
            status: None,
            show_in_drawer: None,
            drawer_info: None,
            hotspots: None,
            comments: None,
            scroll_zones: None,
            file: None,
            parent: None,
            extra: Map::new(),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.kind.as_deref() == Some(DELETED)
    }

    pub fn soft_delete(&mut self) {
        self.kind = Some(DELETED.to_string());
    }

    /// Identity used when reconciling two copies of the same node.
    ///
    /// Slides carry a GUID; legacy overlay items only carry a name.
    pub fn merge_key(&self) -> Option<&str> {
        match self.id.as_deref() {
            Some(id) => Some(id),
            None if !self.name.is_empty() => Some(self.name.as_str()),
            None => None,
        }
    }

    pub fn scroll_zone_mut(&mut self, zone_id: &str) -> Option<&mut ScrollZone> {
        self.scroll_zones
            .as_mut()
            .and_then(|zones| zones.iter_mut().find(|zone| zone.id == zone_id))
    }
}

/// A resolved mutation target that owns hotspot and comment lists.
///
/// Implemented by [`Node`] and [`ScrollZone`].
pub trait Form {
    fn hotspots(&self) -> &[Hotspot];
    fn comments(&self) -> &[Comment];
    /// Existing hotspot list, if the form has one.
    fn hotspots_mut(&mut self) -> Option<&mut Vec<Hotspot>>;
    /// Existing comment list, if the form has one.
    fn comments_mut(&mut self) -> Option<&mut Vec<Comment>>;
    /// Hotspot list, created empty when absent.
    fn hotspots_entry(&mut self) -> &mut Vec<Hotspot>;
    /// Comment list, created empty when absent.
    fn comments_entry(&mut self) -> &mut Vec<Comment>;
}

macro_rules! impl_form {
    ($ty:ty) => {
        impl Form for $ty {
            fn hotspots(&self) -> &[Hotspot] {
                self.hotspots.as_deref().unwrap_or_default()
            }

            fn comments(&self) -> &[Comment] {
                self.comments.as_deref().unwrap_or_default()
            }

            fn hotspots_mut(&mut self) -> Option<&mut Vec<Hotspot>> {
                self.hotspots.as_mut()
            }

            fn comments_mut(&mut self) -> Option<&mut Vec<Comment>> {
                self.comments.as_mut()
            }

            fn hotspots_entry(&mut self) -> &mut Vec<Hotspot> {
                self.hotspots.get_or_insert_with(Vec::new)
            }

            fn comments_entry(&mut self) -> &mut Vec<Comment> {
                self.comments.get_or_insert_with(Vec::new)
            }
        }
    };
}

impl_form!(Node);
impl_form!(ScrollZone);
