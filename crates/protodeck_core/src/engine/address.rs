//! Addressing tuples and their tagged, pre-resolved form.
//!
//! Callers hand over a flat `{file, name, itemName?, parent?, scrollZone?}`
//! tuple. It is classified exactly once into an [`Address`], so mutation
//! sites never re-inspect which optional fields happen to be present.
//!
//! # Invariants
//! - `file == "global"` always addresses the global registry.
//! - `file == "overlay"` always addresses an item nested in an overlay entry.
//! - Empty strings are treated as absent.

use super::error::{EngineError, EngineResult, Missing};
use crate::model::{GLOBAL_FILE, OVERLAY_FILE};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Flat addressing fields as received from the route layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFields {
    /// Module name.
    pub file: String,
    /// Node name; the overlay entry name when `item_name` is given.
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    /// Overlay entry name when `name` already names the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_zone: Option<String>,
}

impl AddressFields {
    /// Addresses a node (or the registry entry `name` when `file` is global).
    pub fn node(file: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Addresses `item` inside overlay entry `overlay`.
    pub fn overlay_item(overlay: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            file: OVERLAY_FILE.to_string(),
            name: overlay.into(),
            item_name: Some(item.into()),
            ..Self::default()
        }
    }

    /// Narrows this address to the scroll zone `zone_id`.
    pub fn in_scroll_zone(mut self, zone_id: impl Into<String>) -> Self {
        self.scroll_zone = Some(zone_id.into());
        self
    }

    /// Classifies the tuple into a tagged address.
    ///
    /// Overlay items are accepted in two spellings: `{name: overlay,
    /// itemName: item}` from the prototype UI, and `{parent: overlay,
    /// name: item}` as written on stored hotspots and comments.
    pub fn classify(&self) -> EngineResult<Address> {
        let file = self.file.trim();
        if file.is_empty() {
            return Err(EngineError::not_found(Missing::Module, self));
        }
        let name = non_empty(Some(self.name.as_str()));

        if file == GLOBAL_FILE {
            let name = name.ok_or_else(|| EngineError::not_found(Missing::GlobalHotspot, self))?;
            return Ok(Address::Global {
                name: name.to_string(),
                fields: self.clone(),
            });
        }

        let target = if file == OVERLAY_FILE {
            match (
                non_empty(self.item_name.as_deref()),
                non_empty(self.parent.as_deref()),
                name,
            ) {
                (Some(item), _, Some(overlay)) => FormTarget::OverlayItem {
                    overlay: overlay.to_string(),
                    item: item.to_string(),
                },
                (None, Some(overlay), Some(item)) => FormTarget::OverlayItem {
                    overlay: overlay.to_string(),
                    item: item.to_string(),
                },
                (_, _, None) => return Err(EngineError::not_found(Missing::Overlay, self)),
                (None, None, Some(_)) => {
                    return Err(EngineError::not_found(Missing::OverlayItem, self))
                }
            }
        } else {
            let name = name.ok_or_else(|| EngineError::not_found(Missing::Node, self))?;
            FormTarget::Node {
                name: name.to_string(),
            }
        };

        Ok(Address::Form(FormAddress {
            module: file.to_string(),
            target,
            scroll_zone: non_empty(self.scroll_zone.as_deref()).map(str::to_string),
            fields: self.clone(),
        }))
    }

    /// Classifies the tuple, rejecting registry addresses.
    pub fn form_address(&self) -> EngineResult<FormAddress> {
        match self.classify()? {
            Address::Form(address) => Ok(address),
            Address::Global { .. } => Err(EngineError::InvalidRequest(format!(
                "global registry entries are not forms: {self}"
            ))),
        }
    }
}

impl Display for AddressFields {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "file={} name={}", self.file, self.name)?;
        if let Some(item) = &self.item_name {
            write!(f, " item_name={item}")?;
        }
        if let Some(parent) = &self.parent {
            write!(f, " parent={parent}")?;
        }
        if let Some(zone) = &self.scroll_zone {
            write!(f, " scroll_zone={zone}")?;
        }
        Ok(())
    }
}

/// Node-level target of a form address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    /// Slide keyed by name in a slide module.
    Node { name: String },
    /// Item nested under an overlay entry.
    OverlayItem { overlay: String, item: String },
}

/// Fully classified address of a node or one of its scroll zones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormAddress {
    pub module: String,
    pub target: FormTarget,
    pub scroll_zone: Option<String>,
    fields: AddressFields,
}

impl FormAddress {
    /// Caller-supplied tuple, kept for diagnostics.
    pub fn fields(&self) -> &AddressFields {
        &self.fields
    }

    /// Addressing written onto entities created at this address.
    ///
    /// Overlay entities point at the nested item (`name`) and its overlay
    /// (`parent`) rather than at the overlay entry.
    pub fn entity_addressing(&self) -> EntityAddressing {
        let (name, parent) = match &self.target {
            FormTarget::Node { name } => (name.clone(), None),
            FormTarget::OverlayItem { overlay, item } => (item.clone(), Some(overlay.clone())),
        };
        EntityAddressing {
            file: self.module.clone(),
            name,
            parent,
            scroll_zone: self.scroll_zone.clone(),
        }
    }
}

/// Addressing fields stamped onto hotspots and comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityAddressing {
    pub file: String,
    pub name: String,
    pub parent: Option<String>,
    pub scroll_zone: Option<String>,
}

/// Classified address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    Form(FormAddress),
    /// Master definition in the global registry.
    Global { name: String, fields: AddressFields },
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
