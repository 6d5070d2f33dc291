//! End-to-end tests of the card pipeline: config, state pushes, render tree,
//! interactions and layout, driven through [`MeshCard`] with JSON payloads
//! shaped like the router integration's entity state.
#![allow(clippy::unwrap_used)]

use fritzmesh_core::{
    CardConfig, CardEvent, CardView, ChangeDetector, EntityState, MeshCard, RawConfig, RawPayload,
    RenderTree, SectionKind, SizeClass, TopologyBuilder,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

// ── Helpers ─────────────────────────────────────────────────────────

fn raw_config(options: Value) -> RawConfig {
    let mut raw: RawConfig = serde_json::from_value(options).unwrap();
    raw.entry("entity".into()).or_insert(json!("sensor.fritz_box_mesh"));
    raw
}

fn card(options: Value) -> MeshCard {
    let mut card = MeshCard::new();
    card.set_config(&raw_config(options)).unwrap();
    card
}

fn push(card: &mut MeshCard, attributes: Value) -> bool {
    card.update(Some(&EntityState {
        entity_id: Some("sensor.fritz_box_mesh".into()),
        state: "4".into(),
        attributes,
    }))
}

fn tree(card: &MeshCard) -> &RenderTree {
    card.tree().unwrap()
}

fn client_names(tree: &RenderTree, kind: SectionKind) -> Vec<String> {
    tree.sections
        .iter()
        .filter(|s| s.kind == kind)
        .flat_map(|s| s.ordered_clients.iter())
        .map(|c| c.client.display_name().to_owned())
        .collect()
}

/// Master, one online and one offline repeater, one unassigned client.
fn home_mesh() -> Value {
    json!({
        "host": "fritz.box",
        "mesh_nodes": [
            {
                "uid": "n-1", "name": "FRITZ!Box 7590", "role": "master",
                "ip": "192.168.178.1", "mac": "3C:A6:2F:00:00:01",
                "model": "FRITZ!Box 7590", "firmware": "7.57",
                "clients_cur_rx_kbps_total": 120_000, "clients_cur_tx_kbps_total": 8_000,
                "clients": [
                    { "uid": "c-1", "mac": "AA:BB:CC:00:00:01", "name": "Laptop",
                      "ip": "192.168.178.20", "connection_type": "WLAN",
                      "connection_state": "CONNECTED", "interface_name": "AP:5G:0",
                      "cur_rx_kbps": 866_700, "cur_tx_kbps": 400_000, "max_rx_kbps": 1_200_000,
                      "ha_entity_mesh_node_id": "sensor.laptop_mesh_node",
                      "ha_entity_connected_id": "binary_sensor.laptop_connected" },
                    { "uid": "c-2", "mac": "AA:BB:CC:00:00:02", "name": "desktop",
                      "ip": "192.168.178.21", "connection_type": "LAN",
                      "connection_state": "DISCONNECTED", "interface_name": "LAN:1",
                      "max_rx_kbps": 1_000_000 }
                ]
            },
            {
                "uid": "n-2", "name": "Repeater Garden", "role": "slave",
                "ip": "192.168.178.3", "mac": "3C:A6:2F:00:00:03",
                "parent_link_type": "WLAN", "parent_link_state": "DISCONNECTED",
                "clients": [
                    { "uid": "c-3", "mac": "AA:BB:CC:00:00:03", "name": "Sprinkler",
                      "connection_type": "WLAN", "connection_state": "CONNECTED",
                      "interface_name": "AP:2G:0", "cur_rx_kbps": 65_000 }
                ]
            },
            {
                "uid": "n-3", "name": "Repeater Office", "role": "slave",
                "ip": "192.168.178.2", "mac": "3C:A6:2F:00:00:02",
                "parent_link_type": "LAN", "parent_link_state": "CONNECTED",
                "parent_cur_rx_kbps": 300_000, "parent_cur_tx_kbps": 90_000,
                "parent_max_rx_kbps": 1_000_000,
                "clients": [
                    { "uid": "c-4", "mac": "AA:BB:CC:00:00:04", "name": "Printer",
                      "ip": "192.168.178.40", "connection_type": "LAN",
                      "connection_state": "CONNECTED", "interface_name": "LAN:2",
                      "cur_tx_kbps": 100, "max_rx_kbps": 100_000 },
                    { "uid": "c-5", "mac": "AA:BB:CC:00:00:05", "name": "phone",
                      "ip": "192.168.178.41", "connection_type": "WLAN",
                      "connection_state": "CONNECTED", "interface_name": "AP:5G:1",
                      "cur_tx_kbps": 300, "cur_rx_kbps": 433_000 }
                ]
            }
        ],
        "unassigned_clients": [
            { "uid": "c-9", "mac": "AA:BB:CC:00:00:09", "name": "Old tablet",
              "connection_state": "DISCONNECTED" }
        ]
    })
}

// ── Tree structure ──────────────────────────────────────────────────

#[test]
fn exactly_one_master_first_and_unassigned_last() {
    let mut card = card(json!({}));
    push(&mut card, home_mesh());
    let tree = tree(&card);

    let kinds: Vec<SectionKind> = tree.sections.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        [
            SectionKind::Master,
            SectionKind::Slave,
            SectionKind::Slave,
            SectionKind::Unassigned
        ]
    );
    assert_eq!(client_names(tree, SectionKind::Unassigned), ["Old tablet"]);
}

#[test]
fn hidden_offline_repeater_takes_its_clients_and_the_unassigned_bucket() {
    let mut card = card(json!({ "hide_offline_nodes": true }));
    push(&mut card, home_mesh());
    let tree = tree(&card);

    let slaves: Vec<&str> = tree
        .sections
        .iter()
        .filter(|s| s.kind == SectionKind::Slave)
        .map(|s| s.node.as_ref().unwrap().display_name())
        .collect();
    assert_eq!(slaves, ["Repeater Office"]);
    assert!(tree.find_client("Sprinkler").is_none());
    assert!(tree.sections.iter().all(|s| s.kind != SectionKind::Unassigned));
    assert!(tree.clients().all(|c| c.connected));
}

#[test]
fn slave_count_matches_input_minus_filtered() {
    for (hide, expected) in [(false, 2), (true, 1)] {
        let mut card = card(json!({ "hide_offline_nodes": hide }));
        push(&mut card, home_mesh());
        let slaves = tree(&card)
            .sections
            .iter()
            .filter(|s| s.kind == SectionKind::Slave)
            .count();
        assert_eq!(slaves, expected, "hide_offline_nodes = {hide}");
    }
}

#[test]
fn ip_sort_orders_repeaters_and_clients() {
    let mut card = card(json!({ "node_sort": "ip" }));
    push(&mut card, home_mesh());
    let tree = tree(&card);

    let office = &tree.sections[1];
    assert_eq!(office.node.as_ref().unwrap().display_name(), "Repeater Office");
    assert_eq!(
        client_names(tree, SectionKind::Master),
        ["Laptop", "desktop"]
    );
}

#[test]
fn single_unflagged_node_scenario() {
    let mut card = card(json!({}));
    push(
        &mut card,
        json!({ "mesh_nodes": [{ "name": "Box", "clients": [
            { "mac": "aa:00:00:00:00:02", "name": "Cable", "connection_type": "LAN",
              "connection_state": "DISCONNECTED" },
            { "mac": "aa:00:00:00:00:01", "name": "Air", "connection_type": "WLAN",
              "connection_state": "CONNECTED", "interface_name": "AP:5G:0",
              "cur_rx_kbps": 867_000 }
        ]}]}),
    );
    let clients = &tree(&card).sections[0].ordered_clients;

    assert_eq!(clients.len(), 2);
    assert_eq!(clients[0].client.display_name(), "Air");
    assert_eq!(clients[0].connection_label, "5 GHz → 867 Mbit/s");
    assert!(!clients[1].connected);
}

// ── Labels ──────────────────────────────────────────────────────────

#[test]
fn connection_and_rate_labels() {
    let mut card = card(json!({}));
    push(&mut card, home_mesh());
    let tree = tree(&card);

    let label = |name: &str| tree.find_client(name).unwrap().connection_label.clone();
    assert_eq!(label("Laptop"), "5 GHz → 867 Mbit/s");
    assert_eq!(label("desktop"), "LAN → 1.0 Gbit/s");
    assert_eq!(label("Sprinkler"), "2,4 GHz → 65 Mbit/s");
    assert_eq!(label("Printer"), "LAN → 100 Mbit/s");
    assert_eq!(label("Old tablet"), "Unknown");

    assert_eq!(
        tree.sections[0].rate_label.as_deref(),
        Some("Agg TX 8 Mbit/s / RX 120 Mbit/s")
    );
    let office = &tree.sections[2];
    assert_eq!(
        office.rate_label.as_deref(),
        Some("Agg TX 90 Mbit/s / RX 300 Mbit/s")
    );
    assert_eq!(office.uplink_label.as_deref(), Some("LAN → 1.0 Gbit/s"));
}

#[test]
fn metric_modes_change_the_node_label() {
    let cases = [
        ("uplink", "Uplink TX 90 Mbit/s / RX 300 Mbit/s"),
        ("max_single", "Max TX 300 kbit/s / RX 433 Mbit/s"),
        ("average", "Avg TX 200 kbit/s / RX 217 Mbit/s"),
    ];
    for (mode, expected) in cases {
        let mut card = card(json!({ "transfer_metric_mode": mode }));
        push(&mut card, home_mesh());
        assert_eq!(
            tree(&card).sections[2].rate_label.as_deref(),
            Some(expected),
            "mode {mode}"
        );
    }
}

#[test]
fn master_panel_summarizes_the_mesh() {
    let mut card = card(json!({ "title": "Home" }));
    push(&mut card, home_mesh());
    let panel = &tree(&card).master_panel;

    assert_eq!(panel.title.as_deref(), Some("Home"));
    assert_eq!(panel.name, "FRITZ!Box 7590");
    assert_eq!(panel.host.as_deref(), Some("fritz.box"));
    assert_eq!(panel.node_count, 3);
    assert_eq!(panel.client_count, 6);
    assert_eq!(panel.connected_client_count, 4);
}

// ── Change detection ────────────────────────────────────────────────

#[test]
fn repeated_push_is_a_no_op_but_config_edit_rebuilds() {
    let mut card = card(json!({}));
    assert!(push(&mut card, home_mesh()));
    assert!(!push(&mut card, home_mesh()));
    assert_eq!(card.builds(), 1);

    card.set_config(&raw_config(json!({ "node_sort": "name" })))
        .unwrap();
    assert_eq!(card.builds(), 2);
    assert_eq!(
        client_names(tree(&card), SectionKind::Master),
        ["desktop", "Laptop"]
    );
}

#[test]
fn deep_change_is_detected() {
    let mut detector = ChangeDetector::new();
    let base = home_mesh();
    let mut changed = base.clone();
    changed["mesh_nodes"][2]["clients"][1]["cur_rx_kbps"] = json!(433_001);

    assert!(detector.check(&RawPayload::from_attributes(&base).unwrap()));
    assert!(!detector.check(&RawPayload::from_attributes(&base).unwrap()));
    assert!(detector.check(&RawPayload::from_attributes(&changed).unwrap()));
}

#[test]
fn tree_is_a_pure_function_of_payload_and_config() {
    let config = CardConfig::from_raw(&raw_config(json!({ "node_sort": "mac" }))).unwrap();
    let payload = RawPayload::from_attributes(&home_mesh()).unwrap();
    let builder = TopologyBuilder::new(&config);
    assert_eq!(builder.build(&payload).unwrap(), builder.build(&payload).unwrap());
}

// ── Degraded states ─────────────────────────────────────────────────

#[test]
fn unavailable_then_recovers() {
    let mut card = card(json!({}));
    card.update(Some(&EntityState {
        entity_id: Some("sensor.fritz_box_mesh".into()),
        state: "unavailable".into(),
        attributes: json!({}),
    }));
    assert_eq!(
        card.view(),
        &CardView::Unavailable {
            entity: "sensor.fritz_box_mesh".into()
        }
    );
    assert!(push(&mut card, home_mesh()));
    assert!(matches!(card.view(), CardView::Rendered(_)));
}

#[test]
fn malformed_entries_are_skipped_not_fatal() {
    let mut card = card(json!({}));
    push(
        &mut card,
        json!({ "mesh_nodes": [
            42,
            { "name": "Box", "role": "master", "clients_cur_rx_kbps_total": "-5",
              "clients": ["junk", { "mac": "aa:00:00:00:00:01", "connection_state": "CONNECTED" }] }
        ]}),
    );
    let tree = tree(&card);
    assert_eq!(tree.sections.len(), 1);
    assert_eq!(tree.client_count(), 1);
    assert_eq!(tree.sections[0].rate_label, None);
}

#[test]
fn duplicated_field_names_do_not_demote_the_master() {
    let mut card = card(json!({}));
    push(
        &mut card,
        json!({ "mesh_nodes": [
            { "uid": "n-1", "id": "n-1", "name": "Box", "role": "master",
              "ip": "192.168.178.1", "ip_address": "192.168.178.1" },
            { "uid": "n-2", "name": "Repeater", "role": "slave" }
        ]}),
    );
    let tree = tree(&card);
    assert_eq!(tree.master_panel.name, "Box");
    assert_eq!(tree.sections.len(), 2);
    assert_eq!(tree.master_panel.ip.as_deref(), Some("192.168.178.1"));
}

// ── Interactions and layout ─────────────────────────────────────────

#[test]
fn details_follow_the_display_mode() {
    let mut mesh_mode = card(json!({}));
    push(&mut mesh_mode, home_mesh());
    assert_eq!(
        mesh_mode.show_details("Laptop"),
        Some(CardEvent::ShowDetails {
            entity_id: "sensor.laptop_mesh_node".into()
        })
    );

    let mut state_mode = card(json!({ "name_info_display": "connection_state" }));
    push(&mut state_mode, home_mesh());
    assert_eq!(
        state_mode.show_details("aa:bb:cc:00:00:01"),
        Some(CardEvent::ShowDetails {
            entity_id: "binary_sensor.laptop_connected".into()
        })
    );
    assert_eq!(state_mode.show_details("Printer"), None);
}

#[test]
fn open_address_uses_the_template() {
    let mut card = card(json!({ "url_template": "https://{ip}:8443/" }));
    push(&mut card, home_mesh());
    assert_eq!(
        card.open_address("Printer"),
        Some(CardEvent::OpenUrl {
            url: "https://192.168.178.40:8443/".into()
        })
    );
    assert_eq!(card.open_address("Sprinkler"), None);
}

#[test]
fn card_size_estimate() {
    let mut card = card(json!({}));
    push(&mut card, home_mesh());
    // ceil((3 * 3 + 6) / 4) = 4
    assert_eq!(card.card_size(), 4);

    let many: Vec<Value> = (0..20)
        .map(|i| json!({ "mac": format!("aa:00:00:00:00:{i:02x}"), "connection_state": "CONNECTED" }))
        .collect();
    push(&mut card, json!({ "mesh_nodes": [{ "role": "master", "clients": many }] }));
    // ceil((1 * 3 + 20) / 4) = 6
    assert_eq!(card.card_size(), 6);
}

#[test]
fn layout_is_independent_of_data() {
    let mut card = card(json!({}));
    assert_eq!(
        card.observe_width(400.0),
        Some(CardEvent::SizeClassChanged {
            size_class: SizeClass::Compact
        })
    );
    push(&mut card, home_mesh());
    assert_eq!(card.observe_width(500.0), None);
    assert_eq!(
        card.observe_width(640.0),
        Some(CardEvent::SizeClassChanged {
            size_class: SizeClass::Medium
        })
    );
}
