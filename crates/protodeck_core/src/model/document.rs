//! Whole-document shapes and their selection by module name.
//!
//! # Responsibility
//! - Model the three persisted shapes: slide modules, the overlay module and
//!   the global hotspot registry.
//! - Parse raw JSON into the shape implied by a module name.
//!
//! # Invariants
//! - Key order inside every mapping is preserved.
//! - A slide node's non-empty `name` must equal its key.

use super::hotspot::Hotspot;
use super::node::Node;
use super::{DELETED, GLOBAL_FILE, OVERLAY_FILE};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// Named slide document: node name -> node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Module {
    pub nodes: IndexMap<String, Node>,
}

/// Initial placement of an overlay panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub w: f64,
    #[serde(default)]
    pub h: f64,
}

/// Floating panel holding its own nested nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Node>>,
    /// Tombstone marker used by reconciliation.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Overlay {
    pub fn item_mut(&mut self, item_name: &str) -> Option<&mut Node> {
        self.items
            .iter_mut()
            .flatten()
            .find(|item| item.name == item_name)
    }

    pub fn is_deleted(&self) -> bool {
        self.kind.as_deref() == Some(DELETED)
    }

    pub fn soft_delete(&mut self) {
        self.kind = Some(DELETED.to_string());
    }
}

/// Overlay document: overlay name -> overlay entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayModule {
    pub overlays: IndexMap<String, Overlay>,
}

/// Global hotspot registry: master name -> master definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalRegistry {
    pub masters: IndexMap<String, Hotspot>,
}

/// Shape of a persisted document, derived from its module name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Slides,
    Overlay,
    Global,
}

impl DocumentKind {
    /// Selects the document shape stored under `module`.
    pub fn for_module(module: &str) -> Self {
        match module {
            OVERLAY_FILE => Self::Overlay,
            GLOBAL_FILE => Self::Global,
            _ => Self::Slides,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slides => "slides",
            Self::Overlay => "overlay",
            Self::Global => "global",
        }
    }
}

/// Schema violation found while interpreting a loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentError(pub String);

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for DocumentError {}

/// One loaded document of any shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    Slides(Module),
    Overlay(OverlayModule),
    Global(GlobalRegistry),
}

impl Document {
    /// Creates an empty document of the given shape.
    pub fn empty(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Slides => Self::Slides(Module::default()),
            DocumentKind::Overlay => Self::Overlay(OverlayModule::default()),
            DocumentKind::Global => Self::Global(GlobalRegistry::default()),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Slides(_) => DocumentKind::Slides,
            Self::Overlay(_) => DocumentKind::Overlay,
            Self::Global(_) => DocumentKind::Global,
        }
    }

    /// Parses raw JSON bytes as the shape `kind`, then validates it.
    pub fn from_slice(kind: DocumentKind, bytes: &[u8]) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|err| DocumentError(format!("invalid json: {err}")))?;
        Self::from_value(kind, value)
    }

    /// Interprets a JSON value as the shape `kind`, then validates it.
    pub fn from_value(kind: DocumentKind, value: Value) -> Result<Self, DocumentError> {
        let document = match kind {
            DocumentKind::Slides => serde_json::from_value(value).map(Self::Slides),
            DocumentKind::Overlay => serde_json::from_value(value).map(Self::Overlay),
            DocumentKind::Global => serde_json::from_value(value).map(Self::Global),
        }
        .map_err(|err| {
            DocumentError(format!("document does not match {} schema: {err}", kind.as_str()))
        })?;
        document.validate()?;
        Ok(document)
    }

    /// Serializes to compact JSON bytes.
    pub fn to_vec(&self) -> Result<Vec<u8>, DocumentError> {
        serde_json::to_vec(self).map_err(|err| DocumentError(format!("serialize failed: {err}")))
    }

    /// Checks structural invariants serde cannot express.
    pub fn validate(&self) -> Result<(), DocumentError> {
        match self {
            Self::Slides(module) => {
                for (key, node) in &module.nodes {
                    if !node.name.is_empty() && node.name != *key {
                        return Err(DocumentError(format!(
                            "node `{key}` carries mismatched name `{}`",
                            node.name
                        )));
                    }
                }
            }
            Self::Overlay(module) => {
                for (key, overlay) in &module.overlays {
                    if !overlay.name.is_empty() && overlay.name != *key {
                        return Err(DocumentError(format!(
                            "overlay `{key}` carries mismatched name `{}`",
                            overlay.name
                        )));
                    }
                }
            }
            Self::Global(_) => {}
        }
        Ok(())
    }

    pub fn as_slides(&self) -> Option<&Module> {
        match self {
            Self::Slides(module) => Some(module),
            _ => None,
        }
    }

    pub fn as_overlay(&self) -> Option<&OverlayModule> {
        match self {
            Self::Overlay(module) => Some(module),
            _ => None,
        }
    }
}
