//! Path resolution from a classified address to a mutable sub-entity.
//!
//! # Invariants
//! - Every missing hop fails with `NotFound` carrying the caller's tuple;
//!   there is no fallback location and no default object.
//! - Node-level resolution never narrows into scroll zones.

use super::address::{AddressFields, FormAddress, FormTarget};
use super::error::{EngineError, EngineResult, Missing};
use crate::model::document::{Document, GlobalRegistry};
use crate::model::hotspot::Hotspot;
use crate::model::node::{Form, Node};

/// Resolves the node (or overlay item) named by `address`.
///
/// The scroll-zone part of the address is ignored.
pub fn resolve_node<'a>(
    document: &'a mut Document,
    address: &FormAddress,
) -> EngineResult<&'a mut Node> {
    let fields = address.fields();
    let kind = document.kind();
    match (document, &address.target) {
        (Document::Slides(module), FormTarget::Node { name }) => module
            .nodes
            .get_mut(name)
            .ok_or_else(|| EngineError::not_found(Missing::Node, fields)),
        (Document::Overlay(module), FormTarget::OverlayItem { overlay, item }) => module
            .overlays
            .get_mut(overlay)
            .ok_or_else(|| EngineError::not_found(Missing::Overlay, fields))?
            .item_mut(item)
            .ok_or_else(|| EngineError::not_found(Missing::OverlayItem, fields)),
        _ => Err(EngineError::Malformed(format!(
            "{} document cannot hold {fields}",
            kind.as_str()
        ))),
    }
}

/// Resolves the form named by `address`: the node, or the scroll zone
/// inside it when the address carries one.
pub fn resolve_form<'a>(
    document: &'a mut Document,
    address: &FormAddress,
) -> EngineResult<&'a mut dyn Form> {
    let node = resolve_node(document, address)?;
    match address.scroll_zone.as_deref() {
        None => Ok(node as &mut dyn Form),
        Some(zone_id) => node
            .scroll_zone_mut(zone_id)
            .map(|zone| zone as &mut dyn Form)
            .ok_or_else(|| EngineError::not_found(Missing::ScrollZone, address.fields())),
    }
}

/// Resolves a master definition in the global registry.
pub fn resolve_master<'a>(
    document: &'a mut Document,
    name: &str,
    fields: &AddressFields,
) -> EngineResult<&'a mut Hotspot> {
    match document {
        Document::Global(GlobalRegistry { masters }) => masters
            .get_mut(name)
            .ok_or_else(|| EngineError::not_found_key(Missing::GlobalHotspot, fields, name)),
        other => Err(EngineError::Malformed(format!(
            "{} document is not the global registry",
            other.kind().as_str()
        ))),
    }
}
