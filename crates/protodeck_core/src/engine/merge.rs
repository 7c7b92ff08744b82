//! Reconciliation of an externally edited copy into the live document.
//!
//! # Responsibility
//! - Merge an incoming document into the existing one node by node.
//! - Report whether the merge changed anything.
//!
//! # Invariants
//! - Hotspots follow the incoming copy wholesale ("new wins").
//! - Comments are merged by id and existing comments are never overwritten
//!   ("existing wins"); a human-authored comment is never dropped.
//! - Nodes missing from the incoming copy are tombstoned, never removed.
//! - Content conflicts are always resolved by the rules above, never reported.

use super::error::{EngineError, EngineResult};
use crate::model::comment::Comment;
use crate::model::document::{Document, GlobalRegistry, Module, OverlayModule};
use crate::model::hotspot::{Hotspot, HotspotType};
use crate::model::node::{Node, ScrollZone};
use indexmap::IndexMap;
use log::debug;
use std::collections::HashSet;

/// Result of a merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// The existing document with the incoming changes applied.
    pub document: Document,
    /// `false` when the merge left the existing document as it was.
    pub changed: bool,
}

/// Merges `incoming` into `existing`.
///
/// Both documents must have the same shape; a mismatch means one of them was
/// loaded from the wrong source and is reported as `Malformed`.
pub fn merge_documents(existing: Document, incoming: Document) -> EngineResult<MergeOutcome> {
    let before = existing.clone();
    let document = match (existing, incoming) {
        (Document::Slides(mut live), Document::Slides(edited)) => {
            merge_modules(&mut live, edited);
            Document::Slides(live)
        }
        (Document::Overlay(mut live), Document::Overlay(edited)) => {
            merge_overlays(&mut live, edited);
            Document::Overlay(live)
        }
        (Document::Global(mut live), Document::Global(edited)) => {
            merge_registries(&mut live, edited);
            Document::Global(live)
        }
        (live, edited) => {
            return Err(EngineError::Malformed(format!(
                "cannot merge a {} document into a {} document",
                edited.kind().as_str(),
                live.kind().as_str()
            )))
        }
    };
    let changed = document != before;
    Ok(MergeOutcome { document, changed })
}

/// Merges slide modules keyed by node id.
pub fn merge_modules(existing: &mut Module, incoming: Module) {
    merge_node_map(&mut existing.nodes, incoming.nodes);
}

/// Merges overlay modules: entries by name, nested items by node rules.
pub fn merge_overlays(existing: &mut OverlayModule, incoming: OverlayModule) {
    let mut incoming = incoming.overlays;
    for (key, overlay) in existing.overlays.iter_mut() {
        match incoming.shift_remove(key) {
            None => {
                debug!("event=merge_overlay_missing module=merge overlay={key}");
                overlay.soft_delete();
                for item in overlay.items.iter_mut().flatten() {
                    item.soft_delete();
                }
            }
            Some(edited) => {
                if edited.location.is_some() {
                    overlay.location = edited.location;
                }
                let items = edited.items.unwrap_or_default();
                if overlay.items.is_some() || !items.is_empty() {
                    merge_node_list(overlay.items.get_or_insert_with(Vec::new), items);
                }
            }
        }
    }
    for (key, overlay) in incoming {
        debug!("event=merge_overlay_added module=merge overlay={key}");
        existing.overlays.insert(key, overlay);
    }
}

/// Merges registries: masters by id, incoming copy wins for matches.
pub fn merge_registries(existing: &mut GlobalRegistry, incoming: GlobalRegistry) {
    let mut consumed = HashSet::new();
    for master in existing.masters.values_mut() {
        let matched = incoming
            .masters
            .iter()
            .rev()
            .find(|(_, edited)| edited.id.is_some() && edited.id == master.id);
        match matched {
            None => master.kind = Some(HotspotType::Deleted),
            Some((key, edited)) => {
                let was_deleted = master.kind == Some(HotspotType::Deleted);
                *master = edited.clone();
                if was_deleted {
                    master.kind = Some(HotspotType::Deleted);
                }
                consumed.insert(key.clone());
            }
        }
    }
    for (key, master) in incoming.masters {
        if !consumed.contains(&key) {
            existing.masters.insert(key, master);
        }
    }
}

fn merge_node_map(existing: &mut IndexMap<String, Node>, incoming: IndexMap<String, Node>) {
    let incoming: Vec<(String, Node)> = incoming.into_iter().collect();
    let consumed = {
        let edited: Vec<&Node> = incoming.iter().map(|(_, node)| node).collect();
        reconcile_nodes(existing.values_mut(), &edited)
    };
    for (index, (key, node)) in incoming.into_iter().enumerate() {
        if !consumed.contains(&index) {
            debug!("event=merge_node_added module=merge node={key}");
            existing.insert(key, node);
        }
    }
}

fn merge_node_list(existing: &mut Vec<Node>, incoming: Vec<Node>) {
    let consumed = {
        let edited: Vec<&Node> = incoming.iter().collect();
        reconcile_nodes(existing.iter_mut(), &edited)
    };
    for (index, node) in incoming.into_iter().enumerate() {
        if !consumed.contains(&index) {
            existing.push(node);
        }
    }
}

/// Applies matching incoming nodes onto existing ones and tombstones the
/// rest. Returns the indices of incoming nodes that found a match.
fn reconcile_nodes<'a>(
    existing: impl Iterator<Item = &'a mut Node>,
    incoming: &[&Node],
) -> HashSet<usize> {
    let mut consumed = HashSet::new();
    for node in existing {
        let matched = node.merge_key().and_then(|key| {
            incoming
                .iter()
                .enumerate()
                .rev()
                .find(|(_, edited)| edited.merge_key() == Some(key))
        });
        match matched {
            None => {
                debug!("event=merge_node_missing module=merge node={}", node.name);
                node.soft_delete();
            }
            Some((index, edited)) => {
                merge_node(node, edited);
                consumed.insert(index);
            }
        }
    }
    consumed
}

fn merge_node(existing: &mut Node, incoming: &Node) {
    if existing.image != incoming.image {
        existing.image = incoming.image.clone();
    }

    match incoming.show_in_drawer {
        Some(true) => {
            existing.show_in_drawer = Some(true);
            existing.drawer_info = incoming.drawer_info.clone();
        }
        Some(false) => existing.show_in_drawer = Some(false),
        None => {}
    }

    if let Some(hotspots) = &incoming.hotspots {
        let lost = existing
            .hotspots
            .as_deref()
            .map_or(0, |kept| hotspots_lost_by_merge(kept, hotspots).len());
        if lost > 0 {
            debug!(
                "event=merge_hotspots_replaced module=merge node={} lost={}",
                existing.name, lost
            );
        }
        existing.hotspots = Some(hotspots.clone());
    }

    merge_comments(&mut existing.comments, incoming.comments.as_deref());
    merge_scroll_zones(existing, incoming.scroll_zones.as_deref());
}

fn merge_scroll_zones(existing: &mut Node, incoming: Option<&[ScrollZone]>) {
    let incoming = match incoming {
        Some(zones) if !zones.is_empty() => zones,
        _ => return,
    };

    let has_zones = existing
        .scroll_zones
        .as_ref()
        .is_some_and(|zones| !zones.is_empty());
    if !has_zones {
        existing.scroll_zones = Some(incoming.to_vec());
        return;
    }

    let zones = existing.scroll_zones.get_or_insert_with(Vec::new);

    for edited in incoming {
        match zones.iter_mut().find(|zone| zone.id == edited.id) {
            None => zones.push(edited.clone()),
            Some(zone) => merge_zone(zone, edited),
        }
    }
}

fn merge_zone(existing: &mut ScrollZone, incoming: &ScrollZone) {
    if let Some(hotspots) = &incoming.hotspots {
        existing.hotspots = Some(hotspots.clone());
    }
    merge_comments(&mut existing.comments, incoming.comments.as_deref());
}

/// Appends incoming comments whose id is not already present.
fn merge_comments(existing: &mut Option<Vec<Comment>>, incoming: Option<&[Comment]>) {
    let incoming = match incoming {
        Some(comments) if !comments.is_empty() => comments,
        _ => return,
    };

    let comments = existing.get_or_insert_with(Vec::new);
    for comment in incoming {
        if !comments.iter().any(|kept| kept.id == comment.id) {
            comments.push(comment.clone());
        }
    }
}

/// Hotspot lists are replaced wholesale, so a live edit made between export
/// and import is lost. Exposed for callers that want to warn about it.
pub fn hotspots_lost_by_merge<'a>(
    existing: &'a [Hotspot],
    incoming: &[Hotspot],
) -> Vec<&'a Hotspot> {
    existing
        .iter()
        .filter(|hotspot| !incoming.contains(hotspot))
        .collect()
}
