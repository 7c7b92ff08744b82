//! Point mutations over a loaded document.
//!
//! # Responsibility
//! - Create, update and soft-delete hotspots and comments at a resolved form.
//! - Update node status and drawer metadata.
//!
//! # Invariants
//! - Resolve first, mutate second: an `Err` return leaves the document as it was.
//! - Soft delete is monotonic; updates never clear a tombstone.
//! - Nothing is ever removed from a collection.

use super::address::{Address, AddressFields, FormAddress};
use super::error::{EngineError, EngineResult, Missing};
use super::request::{
    CommentKey, CommentRequest, DrawerRequest, GlobalHotspotRequest, HotspotRequest,
    StatusRequest,
};
use super::resolve::{resolve_form, resolve_master, resolve_node};
use crate::identity::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::model::comment::{Comment, CommentType};
use crate::model::document::Document;
use crate::model::hotspot::{Hotspot, HotspotType};
use crate::model::node::{DrawerInfo, Form, Node, ScrollZone};
use crate::model::DELETED;
use std::sync::Arc;

/// Applies point mutations using injected id and time sources.
#[derive(Clone)]
pub struct MutationEngine {
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl Default for MutationEngine {
    fn default() -> Self {
        Self::new(Arc::new(UuidGenerator), Arc::new(SystemClock))
    }
}

impl MutationEngine {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { ids, clock }
    }

    pub fn ids(&self) -> &dyn IdGenerator {
        self.ids.as_ref()
    }

    /// Appends a unique hotspot to the addressed form and returns its id.
    ///
    /// The hotspot list is created when the form has none. Overlay hotspots
    /// are stamped with the nested item's addressing.
    pub fn add_hotspot(
        &self,
        document: &mut Document,
        request: &HotspotRequest,
    ) -> EngineResult<String> {
        ensure_unique_kind(request.kind)?;
        let address = request.address.form_address()?;
        let form = resolve_form(document, &address)?;

        let id = self.id_or_new(request.id.as_deref());
        let stamp = address.entity_addressing();
        let mut hotspot = Hotspot::unique(id.clone(), request.kind);
        hotspot.x = request.rect.x;
        hotspot.y = request.rect.y;
        hotspot.w = request.rect.w;
        hotspot.h = request.rect.h;
        hotspot.link = request.link.clone();
        hotspot.state = request.state.clone();
        hotspot.file = Some(stamp.file);
        hotspot.name = Some(stamp.name);
        hotspot.parent = stamp.parent;
        hotspot.scroll_zone = stamp.scroll_zone;

        form.hotspots_entry().push(hotspot);
        Ok(id)
    }

    /// Appends `{type: "global", name}` to the addressed form.
    ///
    /// The master's geometry is not copied.
    pub fn add_global_hotspot(
        &self,
        document: &mut Document,
        request: &GlobalHotspotRequest,
    ) -> EngineResult<()> {
        let master = required_name(&request.hotspot_name, &request.address)?;
        let address = request.address.form_address()?;
        let form = resolve_form(document, &address)?;
        form.hotspots_entry().push(Hotspot::global_instance(master));
        Ok(())
    }

    /// Overwrites geometry, link, type and (when supplied) state of a hotspot.
    ///
    /// With `file == "global"` the registry master `name` is updated.
    /// Otherwise the hotspot is looked up by id in the named scroll zone
    /// (when the address carries one), then the node's own list, then every
    /// other zone. A stale zone in the address never hides the hotspot.
    pub fn update_hotspot(
        &self,
        document: &mut Document,
        request: &HotspotRequest,
    ) -> EngineResult<()> {
        ensure_unique_kind(request.kind)?;
        let hotspot = match request.address.classify()? {
            Address::Global { name, fields } => resolve_master(document, &name, &fields)?,
            Address::Form(address) => {
                let id = request
                    .id
                    .as_deref()
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| EngineError::not_found(Missing::Hotspot, &request.address))?;
                find_hotspot(document, &address, id)?
            }
        };
        overwrite_hotspot(hotspot, request);
        Ok(())
    }

    /// Tombstones a global instance by master name with `state = "deleted"`.
    ///
    /// Only the addressed scope is searched: the named scroll zone, or the
    /// form's own list. Sibling zones are never consulted.
    pub fn delete_global_hotspot(
        &self,
        document: &mut Document,
        request: &GlobalHotspotRequest,
    ) -> EngineResult<()> {
        let master = required_name(&request.hotspot_name, &request.address)?;
        let address = request.address.form_address()?;
        let form = resolve_form(document, &address)?;
        let not_found =
            || EngineError::not_found_key(Missing::GlobalHotspot, &request.address, master);
        let hotspots = form.hotspots_mut().ok_or_else(not_found)?;

        let is_instance =
            |hotspot: &Hotspot| hotspot.is_global() && hotspot.name.as_deref() == Some(master);
        let position = hotspots
            .iter()
            .position(|hotspot| is_instance(hotspot) && !hotspot.is_deleted())
            .or_else(|| hotspots.iter().position(|hotspot| is_instance(hotspot)))
            .ok_or_else(not_found)?;
        hotspots[position].state = Some(DELETED.to_string());
        Ok(())
    }

    /// Appends a comment to the addressed form and returns its id.
    pub fn add_comment(
        &self,
        document: &mut Document,
        request: &CommentRequest,
    ) -> EngineResult<String> {
        if request.kind == CommentType::Deleted {
            return Err(EngineError::InvalidRequest(
                "a new comment cannot start deleted".to_string(),
            ));
        }
        let address = request.address.form_address()?;
        let form = resolve_form(document, &address)?;

        let id = self.id_or_new(request.id.as_deref());
        let stamp = address.entity_addressing();
        let mut comment = Comment::new(id.clone(), request.kind, request.comment.trim());
        comment.x = request.x;
        comment.y = request.y;
        comment.quill = request.quill.clone();
        comment.user = request.user.clone();
        comment.resolved = request.resolved;
        comment.updated_on = Some(self.clock.now());
        comment.file = Some(stamp.file);
        comment.name = Some(stamp.name);
        comment.parent = stamp.parent;
        comment.scroll_zone = stamp.scroll_zone;

        form.comments_entry().push(comment);
        Ok(id)
    }

    /// Overwrites a comment's content and refreshes `updatedOn`.
    pub fn update_comment(
        &self,
        document: &mut Document,
        request: &CommentRequest,
    ) -> EngineResult<()> {
        let id = request
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| EngineError::not_found(Missing::Comment, &request.address))?;
        let address = request.address.form_address()?;
        let comment = find_comment(document, &address, id)?;

        let was_deleted = comment.is_deleted();
        comment.x = request.x;
        comment.y = request.y;
        comment.comment = Some(request.comment.trim().to_string());
        if request.quill.is_some() {
            comment.quill = request.quill.clone();
        }
        comment.kind = Some(request.kind);
        comment.user = request.user.clone();
        if request.resolved.is_some() {
            comment.resolved = request.resolved;
        }
        if was_deleted {
            comment.soft_delete();
        }
        comment.updated_on = Some(self.clock.now());
        Ok(())
    }

    /// Tombstones a comment with `type = "deleted"`.
    pub fn delete_comment(
        &self,
        document: &mut Document,
        request: &CommentKey,
    ) -> EngineResult<()> {
        let address = request.address.form_address()?;
        find_comment(document, &address, &request.id)?.soft_delete();
        Ok(())
    }

    /// Overwrites the node's status. Scroll-zone fields are ignored.
    pub fn update_status(
        &self,
        document: &mut Document,
        request: &StatusRequest,
    ) -> EngineResult<()> {
        let address = request.address.form_address()?;
        resolve_node(document, &address)?.status = Some(request.status);
        Ok(())
    }

    /// Overwrites drawer visibility; a shown node also gets a fresh title.
    ///
    /// The drawer group is the owning module. Hiding a node leaves its
    /// drawer info in place.
    pub fn update_drawer(
        &self,
        document: &mut Document,
        request: &DrawerRequest,
    ) -> EngineResult<()> {
        let address = request.address.form_address()?;
        let title = match (request.show_in_drawer, request.title.as_deref()) {
            (true, Some(title)) => Some(title.trim().to_string()),
            (true, None) => {
                return Err(EngineError::InvalidRequest(format!(
                    "drawer title required to show {}",
                    request.address
                )))
            }
            (false, _) => None,
        };

        let node: &mut Node = resolve_node(document, &address)?;
        node.show_in_drawer = Some(request.show_in_drawer);
        if let Some(title) = title {
            node.drawer_info = Some(DrawerInfo {
                title,
                group: address.module.clone(),
            });
        }
        Ok(())
    }

    fn id_or_new(&self, requested: Option<&str>) -> String {
        match requested {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => self.ids.next_id(),
        }
    }
}

fn ensure_unique_kind(kind: HotspotType) -> EngineResult<()> {
    if kind == HotspotType::Global {
        return Err(EngineError::InvalidRequest(
            "global instances are placed by name, not as unique hotspots".to_string(),
        ));
    }
    Ok(())
}

fn required_name<'r>(name: &'r str, address: &AddressFields) -> EngineResult<&'r str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EngineError::not_found(Missing::GlobalHotspot, address));
    }
    Ok(trimmed)
}

fn overwrite_hotspot(hotspot: &mut Hotspot, request: &HotspotRequest) {
    let was_deleted = hotspot.kind == Some(HotspotType::Deleted);
    let state_deleted = hotspot.state.as_deref() == Some(DELETED);

    hotspot.x = request.rect.x;
    hotspot.y = request.rect.y;
    hotspot.w = request.rect.w;
    hotspot.h = request.rect.h;
    hotspot.link = request.link.clone();
    hotspot.kind = Some(request.kind);
    if request.state.is_some() {
        hotspot.state = request.state.clone();
    }

    if was_deleted {
        hotspot.kind = Some(HotspotType::Deleted);
    }
    if state_deleted {
        hotspot.state = Some(DELETED.to_string());
    }
}

fn find_hotspot<'a>(
    document: &'a mut Document,
    address: &FormAddress,
    id: &str,
) -> EngineResult<&'a mut Hotspot> {
    let fields = address.fields();
    let not_found = || EngineError::not_found_key(Missing::Hotspot, fields, id);
    let matches = |hotspot: &&mut Hotspot| hotspot.id.as_deref() == Some(id);
    let preferred = address.scroll_zone.as_deref();

    let node = resolve_node(document, address)?;
    let (named, others): (Vec<&mut ScrollZone>, Vec<&mut ScrollZone>) = node
        .scroll_zones
        .iter_mut()
        .flatten()
        .partition(|zone| Some(zone.id.as_str()) == preferred);
    let zone_hotspots = |zone: &'a mut ScrollZone| zone.hotspots.iter_mut().flatten();

    named
        .into_iter()
        .flat_map(zone_hotspots)
        .chain(node.hotspots.iter_mut().flatten())
        .chain(others.into_iter().flat_map(zone_hotspots))
        .find(matches)
        .ok_or_else(not_found)
}

fn find_comment<'a>(
    document: &'a mut Document,
    address: &FormAddress,
    id: &str,
) -> EngineResult<&'a mut Comment> {
    let form = resolve_form(document, address)?;
    form.comments_mut()
        .and_then(|comments| {
            comments
                .iter_mut()
                .find(|comment| comment.id.as_deref() == Some(id))
        })
        .ok_or_else(|| EngineError::not_found_key(Missing::Comment, address.fields(), id))
}

#[cfg(test)]
mod tests {
    use super::MutationEngine;
    use crate::engine::address::AddressFields;
    use crate::engine::request::{HotspotRequest, Rect};
    use crate::model::document::{Document, DocumentKind};
    use crate::model::hotspot::HotspotType;
    use serde_json::json;

    #[test]
    fn add_hotspot_rejects_global_kind_without_touching_document() {
        let mut document = Document::from_value(
            DocumentKind::Slides,
            json!({"s1": {"id": "1", "name": "s1"}}),
        )
        .unwrap();
        let before = document.clone();
        let request = HotspotRequest {
            address: AddressFields::node("issue", "s1"),
            id: None,
            kind: HotspotType::Global,
            rect: Rect::default(),
            link: None,
            state: None,
        };
        assert!(MutationEngine::default()
            .add_hotspot(&mut document, &request)
            .is_err());
        assert_eq!(document, before);
    }
}
