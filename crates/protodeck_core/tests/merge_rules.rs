use protodeck_core::{merge_documents, Document, DocumentKind, EngineError, HotspotType, Node};
use serde_json::{json, Value};

fn slides(value: Value) -> Document {
    Document::from_value(DocumentKind::Slides, value).unwrap()
}

fn item<'a>(items: &'a Option<Vec<Node>>, name: &str) -> &'a Node {
    items
        .iter()
        .flatten()
        .find(|item| item.name == name)
        .unwrap()
}

fn merged(existing: Value, incoming: Value) -> (Value, bool) {
    let outcome = merge_documents(slides(existing), slides(incoming)).unwrap();
    (serde_json::to_value(&outcome.document).unwrap(), outcome.changed)
}

#[test]
fn comments_keep_existing_and_hotspots_follow_incoming() {
    let (document, changed) = merged(
        json!({"slide1": {"id": "1", "comments": [{"id": "c1", "comment": "a"}], "hotspots": []}}),
        json!({"slide1": {
            "id": "1",
            "comments": [{"id": "c1", "comment": "b"}, {"id": "c2", "comment": "c"}],
            "hotspots": [{"id": "h1"}]
        }}),
    );
    assert!(changed);
    assert_eq!(
        document["slide1"]["comments"],
        json!([{"id": "c1", "comment": "a"}, {"id": "c2", "comment": "c"}])
    );
    assert_eq!(document["slide1"]["hotspots"], json!([{"id": "h1"}]));
}

#[test]
fn existing_comment_body_is_never_overwritten() {
    let (document, _) = merged(
        json!({"s": {"id": "1", "comments": [{"id": "c1", "type": "logic", "comment": "keep"}]}}),
        json!({"s": {"id": "1", "comments": [{"id": "c1", "type": "design", "comment": "overwrite"}]}}),
    );
    assert_eq!(document["s"]["comments"][0]["comment"], "keep");
    assert_eq!(document["s"]["comments"][0]["type"], "logic");
    assert_eq!(document["s"]["comments"].as_array().unwrap().len(), 1);
}

#[test]
fn hotspots_are_replaced_wholesale() {
    let (document, _) = merged(
        json!({"s": {"id": "1", "hotspots": [{"id": "hA", "type": "click", "x": 1.0}]}}),
        json!({"s": {"id": "1", "hotspots": [{"id": "hB", "type": "hover", "x": 2.0}]}}),
    );
    assert_eq!(
        document["s"]["hotspots"],
        json!([{"id": "hB", "type": "hover", "x": 2.0}])
    );
}

#[test]
fn absent_hotspots_leave_existing_list() {
    let (document, changed) = merged(
        json!({"s": {"id": "1", "hotspots": [{"id": "hA", "type": "click"}]}}),
        json!({"s": {"id": "1"}}),
    );
    assert!(!changed);
    assert_eq!(document["s"]["hotspots"], json!([{"id": "hA", "type": "click"}]));
}

#[test]
fn node_missing_from_incoming_is_tombstoned() {
    let (document, changed) = merged(
        json!({"x": {"id": "1", "name": "x"}, "y": {"id": "2", "name": "y"}}),
        json!({"y": {"id": "2", "name": "y"}}),
    );
    assert!(changed);
    assert_eq!(document["x"]["type"], "deleted");
    assert!(document["y"].get("type").is_none());
}

#[test]
fn disjoint_additions_union_and_repeat_is_noop() {
    let existing = json!({"a": {"id": "1", "name": "a", "comments": [{"id": "c1", "comment": "x"}]}});
    let incoming = json!({
        "a": {"id": "1", "name": "a", "comments": [{"id": "c1", "comment": "x"}, {"id": "c2", "comment": "y"}]},
        "b": {"id": "2", "name": "b"}
    });
    let first = merge_documents(slides(existing), slides(incoming.clone())).unwrap();
    assert!(first.changed);
    let value = serde_json::to_value(&first.document).unwrap();
    assert_eq!(value["a"]["comments"].as_array().unwrap().len(), 2);
    assert_eq!(value["b"]["id"], "2");

    let second = merge_documents(first.document.clone(), slides(incoming)).unwrap();
    assert!(!second.changed);
    assert_eq!(second.document, first.document);
}

#[test]
fn nodes_match_by_id_not_by_key_order() {
    let (document, _) = merged(
        json!({"a": {"id": "1", "name": "a", "img": "old.png"}, "b": {"id": "2", "name": "b"}}),
        json!({"b": {"id": "2", "name": "b"}, "a": {"id": "1", "name": "a", "img": "new.png"}}),
    );
    let keys: Vec<_> = document.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(document["a"]["img"], "new.png");
}

#[test]
fn drawer_visibility_follows_incoming_flag() {
    let existing = json!({
        "shown": {"id": "1", "showInDrawer": true, "drawerInfo": {"title": "Old", "group": "issue"}},
        "hidden": {"id": "2", "showInDrawer": true, "drawerInfo": {"title": "Keep", "group": "issue"}},
        "untouched": {"id": "3", "showInDrawer": true, "drawerInfo": {"title": "Same", "group": "issue"}}
    });
    let incoming = json!({
        "shown": {"id": "1", "showInDrawer": true, "drawerInfo": {"title": "New", "group": "issue"}},
        "hidden": {"id": "2", "showInDrawer": false},
        "untouched": {"id": "3"}
    });
    let (document, _) = merged(existing, incoming);
    assert_eq!(document["shown"]["drawerInfo"]["title"], "New");
    assert_eq!(document["hidden"]["showInDrawer"], false);
    assert_eq!(document["hidden"]["drawerInfo"]["title"], "Keep");
    assert_eq!(document["untouched"]["showInDrawer"], true);
    assert_eq!(document["untouched"]["drawerInfo"]["title"], "Same");
}

#[test]
fn scroll_zones_merge_by_id_and_append_new_ones() {
    let (document, _) = merged(
        json!({"s": {"id": "1", "scrollZones": [
            {"id": "z1", "hotspots": [{"id": "h1"}], "comments": [{"id": "c1", "comment": "live"}]}
        ]}}),
        json!({"s": {"id": "1", "scrollZones": [
            {"id": "z1", "hotspots": [{"id": "h2"}], "comments": [
                {"id": "c1", "comment": "stale"}, {"id": "c2", "comment": "new"}
            ]},
            {"id": "z2"}
        ]}}),
    );
    let zones = document["s"]["scrollZones"].as_array().unwrap();
    assert_eq!(zones.len(), 2);
    assert_eq!(zones[0]["hotspots"], json!([{"id": "h2"}]));
    assert_eq!(
        zones[0]["comments"],
        json!([{"id": "c1", "comment": "live"}, {"id": "c2", "comment": "new"}])
    );
    assert_eq!(zones[1]["id"], "z2");
}

#[test]
fn zones_are_adopted_when_existing_has_none() {
    let (document, _) = merged(
        json!({"s": {"id": "1"}}),
        json!({"s": {"id": "1", "scrollZones": [{"id": "z1", "img": "z.png"}]}}),
    );
    assert_eq!(document["s"]["scrollZones"], json!([{"id": "z1", "img": "z.png"}]));
}

#[test]
fn overlay_entries_and_items_reconcile() {
    let existing = Document::from_value(
        DocumentKind::Overlay,
        json!({
            "menu": {"name": "menu", "items": [
                {"name": "home", "comments": [{"id": "c1", "comment": "keep"}]},
                {"name": "old"}
            ]},
            "gone": {"name": "gone", "items": [{"name": "x"}]}
        }),
    )
    .unwrap();
    let incoming = Document::from_value(
        DocumentKind::Overlay,
        json!({
            "menu": {"name": "menu", "location": {"x": 1.0, "y": 2.0, "w": 3.0, "h": 4.0}, "items": [
                {"name": "home", "comments": [{"id": "c1", "comment": "drop"}, {"id": "c2", "comment": "add"}]},
                {"name": "new"}
            ]},
            "fresh": {"name": "fresh", "items": []}
        }),
    )
    .unwrap();

    let outcome = merge_documents(existing, incoming).unwrap();
    let overlays = &outcome.document.as_overlay().unwrap().overlays;

    let menu = &overlays["menu"];
    assert_eq!(menu.location.unwrap().w, 3.0);
    let home = item(&menu.items, "home");
    let bodies: Vec<_> = home
        .comments
        .iter()
        .flatten()
        .filter_map(|c| c.comment.as_deref())
        .collect();
    assert_eq!(bodies, vec!["keep", "add"]);
    assert!(item(&menu.items, "old").is_deleted());
    assert!(!item(&menu.items, "new").is_deleted());

    assert!(overlays["gone"].is_deleted());
    assert!(item(&overlays["gone"].items, "x").is_deleted());
    assert!(overlays.contains_key("fresh"));
}

#[test]
fn registry_masters_match_by_id_and_new_wins() {
    let existing = Document::from_value(
        DocumentKind::Global,
        json!({
            "nav": {"id": "g1", "type": "click", "x": 1.0},
            "stale": {"id": "g2", "type": "click"}
        }),
    )
    .unwrap();
    let incoming = Document::from_value(
        DocumentKind::Global,
        json!({
            "nav": {"id": "g1", "type": "click", "x": 5.0},
            "added": {"id": "g3", "type": "hover"}
        }),
    )
    .unwrap();

    let outcome = merge_documents(existing, incoming).unwrap();
    let Document::Global(registry) = &outcome.document else {
        panic!("expected the registry shape");
    };
    let masters = &registry.masters;
    assert_eq!(masters["nav"].x, Some(5.0));
    assert_eq!(masters["stale"].kind, Some(HotspotType::Deleted));
    assert_eq!(masters["added"].kind, Some(HotspotType::Hover));
}

#[test]
fn shape_mismatch_is_malformed() {
    let err = merge_documents(
        Document::empty(DocumentKind::Slides),
        Document::empty(DocumentKind::Overlay),
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::Malformed(_)));
}
