use chrono::{DateTime, TimeZone, Utc};
use protodeck_core::{
    AddressFields, Clock, CommentKey, CommentRequest, CommentType, Document, DocumentKind,
    DrawerRequest, EngineError, GlobalHotspotRequest, HotspotRequest, HotspotType, IdGenerator,
    Missing, MutationEngine, NodeStatus, Rect, StatusRequest,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct SequenceIds(AtomicUsize);

impl IdGenerator for SequenceIds {
    fn next_id(&self) -> String {
        format!("gen-{}", self.0.fetch_add(1, Ordering::SeqCst))
    }
}

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

fn engine() -> MutationEngine {
    MutationEngine::new(
        Arc::new(SequenceIds(AtomicUsize::new(1))),
        Arc::new(FixedClock(noon())),
    )
}

fn issue() -> Document {
    Document::from_value(
        DocumentKind::Slides,
        json!({
            "issue_owner": {
                "id": "n1",
                "name": "issue_owner",
                "hotspots": [{"id": "h1", "type": "click", "x": 1.0}],
                "comments": [{"id": "c1", "type": "logic", "comment": "check"}],
                "scrollZones": [
                    {"id": "form", "hotspots": [{"id": "zh1", "type": "hover"}]},
                    {"id": "footer", "hotspots": [{"type": "global", "name": "nav_home"}]}
                ]
            }
        }),
    )
    .unwrap()
}

fn json_of(document: &Document) -> Value {
    serde_json::to_value(document).unwrap()
}

fn hotspot_request(address: AddressFields, id: Option<&str>) -> HotspotRequest {
    HotspotRequest {
        address,
        id: id.map(str::to_string),
        kind: HotspotType::Click,
        rect: Rect::new(10.0, 20.0, 30.0, 40.0),
        link: Some("issue_detail".to_string()),
        state: None,
    }
}

fn comment_request(address: AddressFields, id: Option<&str>, body: &str) -> CommentRequest {
    CommentRequest {
        address,
        id: id.map(str::to_string),
        kind: CommentType::Question,
        x: Some(5.0),
        y: Some(6.0),
        comment: body.to_string(),
        quill: None,
        user: Some("ana".to_string()),
        resolved: None,
    }
}

fn missing_of(err: EngineError) -> Missing {
    match err {
        EngineError::NotFound { missing, .. } => missing,
        other => panic!("expected not found, got {other}"),
    }
}

#[test]
fn add_hotspot_to_unknown_zone_fails_without_touching_node() {
    let mut document = issue();
    let before = document.clone();
    let address = AddressFields::node("issue", "issue_owner").in_scroll_zone("sidebar");

    let err = engine()
        .add_hotspot(&mut document, &hotspot_request(address, None))
        .unwrap_err();

    assert_eq!(missing_of(err), Missing::ScrollZone);
    assert_eq!(document, before);
}

#[test]
fn add_hotspot_stamps_addressing_and_generates_id() {
    let mut document = issue();
    let address = AddressFields::node("issue", "issue_owner").in_scroll_zone("form");

    let id = engine()
        .add_hotspot(&mut document, &hotspot_request(address, None))
        .unwrap();

    assert_eq!(id, "gen-1");
    let zone = &json_of(&document)["issue_owner"]["scrollZones"][0];
    assert_eq!(
        zone["hotspots"][1],
        json!({
            "id": "gen-1", "type": "click", "x": 10.0, "y": 20.0, "w": 30.0, "h": 40.0,
            "link": "issue_detail", "file": "issue", "name": "issue_owner", "scrollZone": "form"
        })
    );
}

#[test]
fn add_hotspot_creates_missing_list() {
    let mut document =
        Document::from_value(DocumentKind::Slides, json!({"bare": {"id": "n2"}})).unwrap();
    engine()
        .add_hotspot(
            &mut document,
            &hotspot_request(AddressFields::node("issue", "bare"), Some("h9")),
        )
        .unwrap();
    assert_eq!(json_of(&document)["bare"]["hotspots"][0]["id"], "h9");
}

#[test]
fn overlay_item_accepts_both_address_spellings() {
    let mut document = Document::from_value(
        DocumentKind::Overlay,
        json!({"menu": {"name": "menu", "items": [{"name": "home", "parent": "menu"}]}}),
    )
    .unwrap();
    let engine = engine();

    engine
        .add_hotspot(
            &mut document,
            &hotspot_request(AddressFields::overlay_item("menu", "home"), None),
        )
        .unwrap();
    let stored = AddressFields {
        parent: Some("menu".to_string()),
        ..AddressFields::node("overlay", "home")
    };
    engine
        .add_hotspot(&mut document, &hotspot_request(stored, None))
        .unwrap();

    let hotspots = &json_of(&document)["menu"]["items"][0]["hotspots"];
    assert_eq!(hotspots.as_array().unwrap().len(), 2);
    for hotspot in hotspots.as_array().unwrap() {
        assert_eq!(hotspot["file"], "overlay");
        assert_eq!(hotspot["name"], "home");
        assert_eq!(hotspot["parent"], "menu");
    }
}

#[test]
fn update_hotspot_is_idempotent() {
    let engine = engine();
    let request = hotspot_request(AddressFields::node("issue", "issue_owner"), Some("zh1"));

    let mut once = issue();
    engine.update_hotspot(&mut once, &request).unwrap();
    let mut twice = once.clone();
    engine.update_hotspot(&mut twice, &request).unwrap();

    assert_eq!(once, twice);
    let zone_hotspot = &json_of(&once)["issue_owner"]["scrollZones"][0]["hotspots"][0];
    assert_eq!(zone_hotspot["type"], "click");
    assert_eq!(zone_hotspot["link"], "issue_detail");
}

#[test]
fn update_hotspot_with_zone_falls_back_to_node_and_other_zones() {
    let mut document = issue();
    let in_form = AddressFields::node("issue", "issue_owner").in_scroll_zone("form");
    engine()
        .update_hotspot(&mut document, &hotspot_request(in_form, Some("h1")))
        .unwrap();

    let in_footer = AddressFields::node("issue", "issue_owner").in_scroll_zone("footer");
    engine()
        .update_hotspot(&mut document, &hotspot_request(in_footer, Some("zh1")))
        .unwrap();

    let node = &json_of(&document)["issue_owner"];
    assert_eq!(node["hotspots"][0]["x"], 10.0);
    assert_eq!(node["scrollZones"][0]["hotspots"][0]["x"], 10.0);
    assert_eq!(node["scrollZones"][0]["hotspots"][0]["type"], "click");
}

#[test]
fn update_hotspot_with_unknown_zone_still_finds_hotspot() {
    let mut document = issue();
    let address = AddressFields::node("issue", "issue_owner").in_scroll_zone("gone");
    engine()
        .update_hotspot(&mut document, &hotspot_request(address, Some("zh1")))
        .unwrap();
    assert_eq!(
        json_of(&document)["issue_owner"]["scrollZones"][0]["hotspots"][0]["link"],
        "issue_detail"
    );
}

#[test]
fn update_hotspot_unknown_id_is_not_found_after_full_search() {
    let mut document = issue();
    let before = document.clone();
    let address = AddressFields::node("issue", "issue_owner").in_scroll_zone("form");
    let err = engine()
        .update_hotspot(&mut document, &hotspot_request(address, Some("nope")))
        .unwrap_err();
    assert_eq!(missing_of(err), Missing::Hotspot);
    assert_eq!(document, before);
}

#[test]
fn update_never_revives_a_tombstone() {
    let mut document = Document::from_value(
        DocumentKind::Slides,
        json!({"s": {"id": "n1", "hotspots": [{"id": "h1", "type": "deleted"}]}}),
    )
    .unwrap();
    engine()
        .update_hotspot(
            &mut document,
            &hotspot_request(AddressFields::node("issue", "s"), Some("h1")),
        )
        .unwrap();
    let hotspot = &json_of(&document)["s"]["hotspots"][0];
    assert_eq!(hotspot["type"], "deleted");
    assert_eq!(hotspot["x"], 10.0);
}

#[test]
fn update_hotspot_on_global_file_updates_master() {
    let mut registry = Document::from_value(
        DocumentKind::Global,
        json!({"nav_home": {"id": "g1", "type": "click", "link": "home"}}),
    )
    .unwrap();
    engine()
        .update_hotspot(
            &mut registry,
            &hotspot_request(AddressFields::node("global", "nav_home"), None),
        )
        .unwrap();
    let master = &json_of(&registry)["nav_home"];
    assert_eq!(master["id"], "g1");
    assert_eq!(master["link"], "issue_detail");
    assert_eq!(master["w"], 30.0);
}

#[test]
fn global_instances_are_placed_and_tombstoned_by_name() {
    let mut document = issue();
    let engine = engine();
    let here = GlobalHotspotRequest {
        address: AddressFields::node("issue", "issue_owner"),
        hotspot_name: "nav_back".to_string(),
    };
    engine.add_global_hotspot(&mut document, &here).unwrap();
    engine.delete_global_hotspot(&mut document, &here).unwrap();

    let node = &json_of(&document)["issue_owner"];
    assert_eq!(
        node["hotspots"][1],
        json!({"type": "global", "name": "nav_back", "state": "deleted"})
    );

    // `nav_home` lives in the footer zone, not in the node's own list.
    let own_list = GlobalHotspotRequest {
        hotspot_name: "nav_home".to_string(),
        ..here
    };
    let err = engine
        .delete_global_hotspot(&mut document, &own_list)
        .unwrap_err();
    assert_eq!(missing_of(err), Missing::GlobalHotspot);

    let in_footer = GlobalHotspotRequest {
        address: AddressFields::node("issue", "issue_owner").in_scroll_zone("footer"),
        ..own_list
    };
    engine.delete_global_hotspot(&mut document, &in_footer).unwrap();
    assert_eq!(
        json_of(&document)["issue_owner"]["scrollZones"][1]["hotspots"][0]["state"],
        "deleted"
    );
}

#[test]
fn comment_lifecycle() {
    let mut document = issue();
    let engine = engine();
    let address = AddressFields::node("issue", "issue_owner");

    let id = engine
        .add_comment(
            &mut document,
            &comment_request(address.clone(), None, "  why two owners?  "),
        )
        .unwrap();
    let added = &json_of(&document)["issue_owner"]["comments"][1];
    assert_eq!(added["comment"], "why two owners?");
    assert_eq!(added["user"], "ana");
    assert_eq!(added["file"], "issue");
    assert_eq!(added["updatedOn"], json!(noon()));

    let mut update = comment_request(address.clone(), Some(id.as_str()), "resolved in v2");
    update.quill = Some(json!({"ops": [{"insert": "resolved in v2\n"}]}));
    update.resolved = Some(true);
    engine.update_comment(&mut document, &update).unwrap();

    let mut plain = comment_request(address.clone(), Some(id.as_str()), "resolved in v2!");
    plain.resolved = None;
    engine.update_comment(&mut document, &plain).unwrap();
    let updated = &json_of(&document)["issue_owner"]["comments"][1];
    assert_eq!(updated["comment"], "resolved in v2!");
    assert_eq!(updated["quill"]["ops"][0]["insert"], "resolved in v2\n");
    assert_eq!(updated["resolved"], true);

    engine
        .delete_comment(
            &mut document,
            &CommentKey {
                address: address.clone(),
                id: id.clone(),
            },
        )
        .unwrap();
    engine
        .update_comment(&mut document, &comment_request(address, Some(id.as_str()), "again"))
        .unwrap();
    let tombstoned = &json_of(&document)["issue_owner"]["comments"][1];
    assert_eq!(tombstoned["type"], "deleted");
    assert_eq!(tombstoned["comment"], "again");
}

#[test]
fn deleting_unknown_comment_is_not_found() {
    let mut document = issue();
    let err = engine()
        .delete_comment(
            &mut document,
            &CommentKey {
                address: AddressFields::node("issue", "issue_owner"),
                id: "nope".to_string(),
            },
        )
        .unwrap_err();
    assert_eq!(missing_of(err), Missing::Comment);
}

#[test]
fn status_and_drawer_updates() {
    let mut document = issue();
    let engine = engine();
    let address = AddressFields::node("issue", "issue_owner");

    engine
        .update_status(
            &mut document,
            &StatusRequest {
                address: address.clone(),
                status: NodeStatus::InProgress,
            },
        )
        .unwrap();

    let before = document.clone();
    let untitled = DrawerRequest {
        address: address.clone(),
        show_in_drawer: true,
        title: None,
    };
    assert!(matches!(
        engine.update_drawer(&mut document, &untitled).unwrap_err(),
        EngineError::InvalidRequest(_)
    ));
    assert_eq!(document, before);

    engine
        .update_drawer(
            &mut document,
            &DrawerRequest {
                title: Some(" Owners ".to_string()),
                ..untitled.clone()
            },
        )
        .unwrap();
    let node = &json_of(&document)["issue_owner"];
    assert_eq!(node["status"], "inProgress");
    assert_eq!(node["drawerInfo"], json!({"title": "Owners", "group": "issue"}));

    engine
        .update_drawer(
            &mut document,
            &DrawerRequest {
                show_in_drawer: false,
                ..untitled
            },
        )
        .unwrap();
    let slides = document.as_slides().unwrap();
    let node = &slides.nodes["issue_owner"];
    assert_eq!(node.show_in_drawer, Some(false));
    assert_eq!(node.drawer_info.as_ref().unwrap().title, "Owners");
}

#[test]
fn blank_file_is_missing_module() {
    let mut document = issue();
    let err = engine()
        .update_status(
            &mut document,
            &StatusRequest {
                address: AddressFields::node(" ", "issue_owner"),
                status: NodeStatus::Approved,
            },
        )
        .unwrap_err();
    assert_eq!(missing_of(err), Missing::Module);
}
