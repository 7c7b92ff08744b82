//! Hotspot records.
//!
//! A hotspot is either *unique* (own id, geometry and link) or an *instance*
//! of a global master (`type = "global"`, `name` points into the registry).
//!
//! # Invariants
//! - Unique hotspots are soft-deleted with `type = "deleted"`.
//! - Global instances are soft-deleted with `state = "deleted"`.

use super::DELETED;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Interaction kind of a hotspot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HotspotType {
    #[serde(rename = "click")]
    Click,
    #[serde(rename = "hover")]
    Hover,
    /// Opens an overlay panel.
    #[serde(rename = "overlay")]
    Overlay,
    #[serde(rename = "external")]
    External,
    #[serde(rename = "newWindow")]
    NewWindow,
    /// Instance of a master stored in the global registry.
    #[serde(rename = "global")]
    Global,
    /// Soft-deleted unique hotspot.
    #[serde(rename = "deleted")]
    Deleted,
}

impl HotspotType {
    /// Wire name as persisted in documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Hover => "hover",
            Self::Overlay => "overlay",
            Self::External => "external",
            Self::NewWindow => "newWindow",
            Self::Global => "global",
            Self::Deleted => "deleted",
        }
    }
}

/// One hotspot as stored in a node, scroll zone, layer or the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Serialized as `type`; hand-written data sometimes omits it.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<HotspotType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Owning node name for unique hotspots, master name for global instances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_zone: Option<String>,
    /// Lifecycle marker; `"deleted"` tombstones a global instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Hotspot {
    /// Creates a unique hotspot with the given id and no geometry.
    pub fn unique(id: impl Into<String>, kind: HotspotType) -> Self {
        Self {
            id: Some(id.into()),
            kind: Some(kind),
            x: None,
            y: None,
            w: None,
            h: None,
            link: None,
            file: None,
            name: None,
            parent: None,
            scroll_zone: None,
            state: None,
            extra: Map::new(),
        }
    }

    /// Creates an instance referencing the global master `master`.
    ///
    /// Instances carry no geometry or link; those live on the master.
    pub fn global_instance(master: impl Into<String>) -> Self {
        let mut hotspot = Self::unique(String::new(), HotspotType::Global);
        hotspot.id = None;
        hotspot.name = Some(master.into());
        hotspot
    }

    pub fn is_global(&self) -> bool {
        self.kind == Some(HotspotType::Global)
    }

    /// Returns whether either tombstone marker is set.
    pub fn is_deleted(&self) -> bool {
        self.kind == Some(HotspotType::Deleted) || self.state.as_deref() == Some(DELETED)
    }

    /// Applies the tombstone that matches this hotspot's flavour.
    pub fn soft_delete(&mut self) {
        if self.is_global() {
            self.state = Some(DELETED.to_string());
        } else {
            self.kind = Some(HotspotType::Deleted);
        }
    }
}
