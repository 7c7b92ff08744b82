//! One-shot normalization of a whole document.
//!
//! Assigns missing GUIDs and rewrites the addressing fields carried by
//! hotspots and comments so every entity can be located from its own
//! fields. It is also the migration path for legacy overlay items that
//! stored their name in `id`.
//!
//! # Invariants
//! - Existing ids are never replaced.
//! - Global instances are left as they are; they are addressed by name.
//! - Running the pass twice is a no-op the second time.

use crate::identity::IdGenerator;
use crate::model::comment::Comment;
use crate::model::document::{Document, GlobalRegistry, Module, OverlayModule};
use crate::model::hotspot::Hotspot;
use crate::model::node::Node;
use crate::model::OVERLAY_FILE;

/// Overlay comments once stored the item under `itemName` with `name`
/// pointing at the overlay; `name`/`parent` replace it.
const LEGACY_ITEM_NAME: &str = "itemName";

/// Counts of what a normalization pass rewrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub ids_assigned: usize,
    pub legacy_items_migrated: usize,
}

/// Normalizes `document`, stored under module name `file`.
pub fn normalize_document(
    document: &mut Document,
    file: &str,
    ids: &dyn IdGenerator,
) -> NormalizeReport {
    let mut pass = Pass {
        ids,
        report: NormalizeReport::default(),
    };
    match document {
        Document::Slides(module) => pass.slides(module, file),
        Document::Overlay(module) => pass.overlays(module),
        Document::Global(registry) => pass.registry(registry),
    }
    pass.report
}

struct Pass<'g> {
    ids: &'g dyn IdGenerator,
    report: NormalizeReport,
}

/// Addressing stamped on entities below one node.
struct Stamp<'s> {
    file: &'s str,
    name: &'s str,
    parent: Option<&'s str>,
}

impl Pass<'_> {
    fn slides(&mut self, module: &mut Module, file: &str) {
        for (key, node) in module.nodes.iter_mut() {
            node.name = key.clone();
            self.ensure_id(&mut node.id);
            let name = node.name.clone();
            self.node_children(
                node,
                &Stamp {
                    file,
                    name: &name,
                    parent: None,
                },
            );
        }
    }

    fn overlays(&mut self, module: &mut OverlayModule) {
        for (key, overlay) in module.overlays.iter_mut() {
            overlay.name = key.clone();
            for item in overlay.items.iter_mut().flatten() {
                if item.name.is_empty() {
                    if let Some(legacy) = item.id.take() {
                        item.name = legacy;
                        self.report.legacy_items_migrated += 1;
                    }
                }
                item.file = Some(OVERLAY_FILE.to_string());
                item.parent = Some(key.clone());
                let name = item.name.clone();
                self.node_children(
                    item,
                    &Stamp {
                        file: OVERLAY_FILE,
                        name: &name,
                        parent: Some(key.as_str()),
                    },
                );
            }
        }
    }

    fn registry(&mut self, registry: &mut GlobalRegistry) {
        for master in registry.masters.values_mut() {
            self.ensure_id(&mut master.id);
        }
    }

    fn node_children(&mut self, node: &mut Node, stamp: &Stamp<'_>) {
        for hotspot in node.hotspots.iter_mut().flatten() {
            self.hotspot(hotspot, stamp, None);
        }
        for comment in node.comments.iter_mut().flatten() {
            self.comment(comment, stamp, None);
        }
        for zone in node.scroll_zones.iter_mut().flatten() {
            let zone_id = zone.id.clone();
            for hotspot in zone.hotspots.iter_mut().flatten() {
                self.hotspot(hotspot, stamp, Some(&zone_id));
            }
            for comment in zone.comments.iter_mut().flatten() {
                self.comment(comment, stamp, Some(&zone_id));
            }
        }
    }

    fn hotspot(&mut self, hotspot: &mut Hotspot, stamp: &Stamp<'_>, zone: Option<&str>) {
        if hotspot.is_global() {
            return;
        }
        self.ensure_id(&mut hotspot.id);
        hotspot.file = Some(stamp.file.to_string());
        hotspot.name = Some(stamp.name.to_string());
        hotspot.parent = stamp.parent.map(str::to_string);
        if let Some(zone) = zone {
            hotspot.scroll_zone = Some(zone.to_string());
        }
    }

    fn comment(&mut self, comment: &mut Comment, stamp: &Stamp<'_>, zone: Option<&str>) {
        self.ensure_id(&mut comment.id);
        comment.file = Some(stamp.file.to_string());
        comment.name = Some(stamp.name.to_string());
        comment.parent = stamp.parent.map(str::to_string);
        comment.extra.remove(LEGACY_ITEM_NAME);
        if let Some(zone) = zone {
            comment.scroll_zone = Some(zone.to_string());
        }
    }

    fn ensure_id(&mut self, id: &mut Option<String>) {
        if id.as_deref().map_or(true, str::is_empty) {
            *id = Some(self.ids.next_id());
            self.report.ids_assigned += 1;
        }
    }
}
