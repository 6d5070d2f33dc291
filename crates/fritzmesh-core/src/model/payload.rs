// ── Raw payload types ──
//
// Mirror of the topology sensor's attribute bag. Every field is treated as
// possibly absent: the source is an external integration whose shape has
// changed across releases. Wire names follow the integration (`mesh_nodes`,
// `parent_cur_rx_kbps`, `ha_entity_id`, ...); the camelCase names used by
// older card builds are accepted as aliases.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::identity::MacAddress;
use super::lenient::{self, WireAliases};
use crate::error::CardError;

/// External entity state as delivered by the host on every update tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub attributes: Value,
}

impl EntityState {
    /// The host marks entities it cannot read as `unavailable` (or `unknown`
    /// before the first successful poll).
    pub fn is_unavailable(&self) -> bool {
        let state = self.state.trim();
        state.eq_ignore_ascii_case("unavailable") || state.eq_ignore_ascii_case("unknown")
    }
}

/// The flat topology payload: mesh nodes plus clients without a known node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPayload {
    #[serde(
        default,
        rename = "mesh_nodes",
        alias = "nodes",
        deserialize_with = "lenient::list"
    )]
    pub nodes: Vec<RawNode>,

    #[serde(
        default,
        alias = "unassignedClients",
        deserialize_with = "lenient::list"
    )]
    pub unassigned_clients: Vec<RawClient>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub host: Option<String>,
}

impl RawPayload {
    /// Decode the attribute bag of an entity state.
    ///
    /// Individual fields are decoded leniently; only a bag that is not an
    /// object at all is rejected.
    pub fn from_attributes(attributes: &Value) -> Result<Self, CardError> {
        match attributes {
            Value::Object(_) => {
                let mut bag = attributes.clone();
                lenient::canonicalize::<Self>(&mut bag);
                Self::deserialize(bag).map_err(|e| CardError::Render {
                    message: format!("undecodable topology payload: {e}"),
                })
            }
            Value::Null => Ok(Self::default()),
            other => Err(CardError::Render {
                message: format!("topology attributes must be an object, got {other}"),
            }),
        }
    }
}

impl WireAliases for RawPayload {
    const ALIASES: &'static [(&'static str, &'static [&'static str])] = &[
        ("mesh_nodes", &["nodes"]),
        ("unassigned_clients", &["unassignedClients"]),
    ];
}

/// Mesh role as reported by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Master,
    Slave,
    Unknown,
}

/// A mesh node (the coordinating router or one of its repeaters).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(default, rename = "uid", alias = "id", deserialize_with = "lenient::text")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub mac: Option<String>,

    #[serde(
        default,
        rename = "ip",
        alias = "ipAddress",
        alias = "ip_address",
        deserialize_with = "lenient::text"
    )]
    pub ip_address: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub role: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub model: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub vendor: Option<String>,

    #[serde(
        default,
        rename = "firmware",
        alias = "firmwareVersion",
        alias = "firmware_version",
        deserialize_with = "lenient::text"
    )]
    pub firmware_version: Option<String>,

    #[serde(default, alias = "parentLinkType", deserialize_with = "lenient::text")]
    pub parent_link_type: Option<String>,

    #[serde(default, alias = "parentLinkState", deserialize_with = "lenient::text")]
    pub parent_link_state: Option<String>,

    // Uplink (parent link) counters
    #[serde(
        default,
        rename = "parent_cur_rx_kbps",
        alias = "uplinkRxKbps",
        deserialize_with = "lenient::rate"
    )]
    pub uplink_rx_kbps: Option<u64>,

    #[serde(
        default,
        rename = "parent_cur_tx_kbps",
        alias = "uplinkTxKbps",
        deserialize_with = "lenient::rate"
    )]
    pub uplink_tx_kbps: Option<u64>,

    #[serde(
        default,
        rename = "parent_max_rx_kbps",
        alias = "uplinkMaxRxKbps",
        deserialize_with = "lenient::rate"
    )]
    pub uplink_max_rx_kbps: Option<u64>,

    #[serde(
        default,
        rename = "parent_max_tx_kbps",
        alias = "uplinkMaxTxKbps",
        deserialize_with = "lenient::rate"
    )]
    pub uplink_max_tx_kbps: Option<u64>,

    // Precomputed sums over the node's clients
    #[serde(
        default,
        rename = "clients_cur_rx_kbps_total",
        alias = "aggregateRxKbps",
        deserialize_with = "lenient::rate"
    )]
    pub aggregate_rx_kbps: Option<u64>,

    #[serde(
        default,
        rename = "clients_cur_tx_kbps_total",
        alias = "aggregateTxKbps",
        deserialize_with = "lenient::rate"
    )]
    pub aggregate_tx_kbps: Option<u64>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub clients: Vec<RawClient>,
}

impl WireAliases for RawNode {
    const ALIASES: &'static [(&'static str, &'static [&'static str])] = &[
        ("uid", &["id"]),
        ("ip", &["ipAddress", "ip_address"]),
        ("firmware", &["firmwareVersion", "firmware_version"]),
        ("parent_link_type", &["parentLinkType"]),
        ("parent_link_state", &["parentLinkState"]),
        ("parent_cur_rx_kbps", &["uplinkRxKbps"]),
        ("parent_cur_tx_kbps", &["uplinkTxKbps"]),
        ("parent_max_rx_kbps", &["uplinkMaxRxKbps"]),
        ("parent_max_tx_kbps", &["uplinkMaxTxKbps"]),
        ("clients_cur_rx_kbps_total", &["aggregateRxKbps"]),
        ("clients_cur_tx_kbps_total", &["aggregateTxKbps"]),
    ];
}

impl RawNode {
    pub fn role(&self) -> NodeRole {
        match self.role.as_deref().map(str::trim) {
            Some(r) if r.eq_ignore_ascii_case("master") => NodeRole::Master,
            Some(r) if r.eq_ignore_ascii_case("slave") => NodeRole::Slave,
            _ => NodeRole::Unknown,
        }
    }

    /// Name shown to the user, falling back to hardware identifiers.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.mac.as_deref())
            .or(self.id.as_deref())
            .unwrap_or_default()
    }

    /// A missing link state is treated as online: older payloads never
    /// reported it.
    pub fn is_uplink_online(&self) -> bool {
        self.parent_link_state
            .as_deref()
            .is_none_or(|state| state.trim().eq_ignore_ascii_case("CONNECTED"))
    }

    pub fn mac_address(&self) -> Option<MacAddress> {
        self.mac.as_deref().and_then(MacAddress::parse)
    }

    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        self.ip_address.as_deref().and_then(|ip| ip.trim().parse().ok())
    }
}

/// A client device as reported by the mesh node it is attached to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawClient {
    #[serde(default, alias = "id", deserialize_with = "lenient::text")]
    pub uid: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub mac: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub ip: Option<String>,

    /// `WLAN` or `LAN`; anything else is classified by interface name.
    #[serde(default, alias = "connectionType", deserialize_with = "lenient::text")]
    pub connection_type: Option<String>,

    #[serde(default, alias = "connectionState", deserialize_with = "lenient::text")]
    pub connection_state: Option<String>,

    /// Router-side interface, e.g. `AP:5G:0` or `LAN:1`.
    #[serde(default, alias = "interfaceName", deserialize_with = "lenient::text")]
    pub interface_name: Option<String>,

    #[serde(default, alias = "curRxKbps", deserialize_with = "lenient::rate")]
    pub cur_rx_kbps: Option<u64>,

    #[serde(default, alias = "curTxKbps", deserialize_with = "lenient::rate")]
    pub cur_tx_kbps: Option<u64>,

    #[serde(default, alias = "maxRxKbps", deserialize_with = "lenient::rate")]
    pub max_rx_kbps: Option<u64>,

    #[serde(default, alias = "maxTxKbps", deserialize_with = "lenient::rate")]
    pub max_tx_kbps: Option<u64>,

    // Host entity references
    #[serde(
        default,
        rename = "ha_entity_mesh_node_id",
        alias = "meshNodeEntityRef",
        deserialize_with = "lenient::text"
    )]
    pub mesh_node_entity_ref: Option<String>,

    #[serde(
        default,
        rename = "ha_entity_connected_id",
        alias = "connectionStateEntityRef",
        deserialize_with = "lenient::text"
    )]
    pub connection_state_entity_ref: Option<String>,

    #[serde(
        default,
        rename = "ha_entity_id",
        alias = "entityRef",
        deserialize_with = "lenient::text"
    )]
    pub entity_ref: Option<String>,
}

impl WireAliases for RawClient {
    const ALIASES: &'static [(&'static str, &'static [&'static str])] = &[
        ("uid", &["id"]),
        ("connection_type", &["connectionType"]),
        ("connection_state", &["connectionState"]),
        ("interface_name", &["interfaceName"]),
        ("cur_rx_kbps", &["curRxKbps"]),
        ("cur_tx_kbps", &["curTxKbps"]),
        ("max_rx_kbps", &["maxRxKbps"]),
        ("max_tx_kbps", &["maxTxKbps"]),
        ("ha_entity_mesh_node_id", &["meshNodeEntityRef"]),
        ("ha_entity_connected_id", &["connectionStateEntityRef"]),
        ("ha_entity_id", &["entityRef"]),
    ];
}

impl RawClient {
    pub fn is_connected(&self) -> bool {
        self.connection_state
            .as_deref()
            .is_some_and(|state| state.trim().eq_ignore_ascii_case("CONNECTED"))
    }

    /// Name shown to the user, falling back to hardware identifiers.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.mac.as_deref())
            .or(self.uid.as_deref())
            .unwrap_or_default()
    }

    /// Stable lookup key used by interactions (MAC, then uid, then name).
    pub fn key(&self) -> String {
        self.mac_address()
            .map(|mac| mac.to_string())
            .or_else(|| self.mac.clone())
            .or_else(|| self.uid.clone())
            .unwrap_or_else(|| self.display_name().to_owned())
    }

    pub fn mac_address(&self) -> Option<MacAddress> {
        self.mac.as_deref().and_then(MacAddress::parse)
    }

    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        self.ip.as_deref().and_then(|ip| ip.trim().parse().ok())
    }

    /// Whether `ident` names this client by MAC (any notation), uid, IP or name.
    pub fn matches(&self, ident: &str) -> bool {
        let ident = ident.trim();
        if ident.is_empty() {
            return false;
        }
        if let (Some(mine), Some(theirs)) = (self.mac_address(), MacAddress::parse(ident)) {
            if mine == theirs {
                return true;
            }
        }
        [&self.uid, &self.ip, &self.name, &self.mac]
            .into_iter()
            .flatten()
            .any(|field| field.trim().eq_ignore_ascii_case(ident))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_integration_wire_names() {
        let payload = RawPayload::from_attributes(&json!({
            "host": "192.168.178.1",
            "mesh_nodes": [{
                "uid": "n-1",
                "name": "Fritz!Box 7590",
                "role": "master",
                "firmware": "7.57",
                "clients_cur_rx_kbps_total": 1200,
                "clients": [{
                    "mac": "AA:BB:CC:00:00:01",
                    "connection_type": "WLAN",
                    "connection_state": "CONNECTED",
                    "interface_name": "AP:5G:0",
                    "cur_rx_kbps": 866_000,
                    "ha_entity_mesh_node_id": "sensor.laptop_mesh_node"
                }]
            }],
            "unassigned_clients": []
        }))
        .unwrap();

        let node = &payload.nodes[0];
        assert_eq!(payload.host.as_deref(), Some("192.168.178.1"));
        assert_eq!(node.role(), NodeRole::Master);
        assert_eq!(node.firmware_version.as_deref(), Some("7.57"));
        assert_eq!(node.aggregate_rx_kbps, Some(1200));
        let client = &node.clients[0];
        assert!(client.is_connected());
        assert_eq!(client.cur_rx_kbps, Some(866_000));
        assert_eq!(
            client.mesh_node_entity_ref.as_deref(),
            Some("sensor.laptop_mesh_node")
        );
    }

    #[test]
    fn decodes_camel_case_aliases() {
        let payload = RawPayload::from_attributes(&json!({
            "nodes": [{
                "id": "n-2",
                "name": "Repeater",
                "role": "slave",
                "parentLinkState": "DISCONNECTED",
                "uplinkRxKbps": "500",
                "clients": []
            }],
            "unassignedClients": [{ "mac": "aabbcc000002", "connectionState": "CONNECTED" }]
        }))
        .unwrap();

        let node = &payload.nodes[0];
        assert_eq!(node.id.as_deref(), Some("n-2"));
        assert!(!node.is_uplink_online());
        assert_eq!(node.uplink_rx_kbps, Some(500));
        assert!(payload.unassigned_clients[0].is_connected());
    }

    #[test]
    fn wire_name_and_alias_together_keep_the_entry() {
        let payload = RawPayload::from_attributes(&json!({
            "mesh_nodes": [{
                "uid": "n-1", "id": "legacy-1",
                "name": "Box", "role": "master",
                "ip": "192.168.178.1", "ipAddress": "10.0.0.1",
                "clients": [{
                    "uid": "c-1", "id": "legacy-c",
                    "mac": "aa:bb:cc:00:00:01",
                    "connectionState": "CONNECTED", "connection_state": null
                }]
            }],
            "nodes": [{ "name": "Stale", "role": "master" }],
            "unassigned_clients": [],
            "unassignedClients": [{ "mac": "aa:bb:cc:00:00:09" }]
        }))
        .unwrap();

        assert_eq!(payload.nodes.len(), 1);
        let node = &payload.nodes[0];
        assert_eq!(node.display_name(), "Box");
        assert_eq!(node.role(), NodeRole::Master);
        assert_eq!(node.id.as_deref(), Some("n-1"));
        assert_eq!(node.ip_address.as_deref(), Some("192.168.178.1"));

        let client = &node.clients[0];
        assert_eq!(client.uid.as_deref(), Some("c-1"));
        assert!(client.is_connected(), "a null wire field yields to its alias");
        assert!(payload.unassigned_clients.is_empty());
    }

    #[test]
    fn alias_only_bag_still_decodes() {
        let payload = RawPayload::from_attributes(&json!({
            "mesh_nodes": null,
            "nodes": [{ "id": "n-9", "name": "Legacy" }]
        }))
        .unwrap();
        assert_eq!(payload.nodes[0].id.as_deref(), Some("n-9"));
    }

    #[test]
    fn malformed_entries_are_dropped_not_fatal() {
        let payload = RawPayload::from_attributes(&json!({
            "mesh_nodes": [42, { "name": "Box", "clients": "nope" }, null]
        }))
        .unwrap();
        assert_eq!(payload.nodes.len(), 1);
        assert!(payload.nodes[0].clients.is_empty());
    }

    #[test]
    fn non_object_attributes_are_a_render_error() {
        let err = RawPayload::from_attributes(&json!("garbage")).unwrap_err();
        assert!(matches!(err, CardError::Render { .. }));
        assert_eq!(
            RawPayload::from_attributes(&Value::Null).unwrap(),
            RawPayload::default()
        );
    }

    #[test]
    fn missing_link_state_counts_as_online() {
        let node = RawNode::default();
        assert!(node.is_uplink_online());
    }

    #[test]
    fn client_matches_any_identifier() {
        let client = RawClient {
            uid: Some("landevice1".into()),
            mac: Some("AA:BB:CC:00:00:01".into()),
            name: Some("Laptop".into()),
            ip: Some("192.168.178.20".into()),
            ..RawClient::default()
        };
        assert!(client.matches("aa-bb-cc-00-00-01"));
        assert!(client.matches("laptop"));
        assert!(client.matches("192.168.178.20"));
        assert!(client.matches("landevice1"));
        assert!(!client.matches("printer"));
        assert_eq!(client.key(), "aa:bb:cc:00:00:01");
    }

    #[test]
    fn unavailable_states_are_recognized() {
        let state = EntityState {
            state: "unavailable".into(),
            ..EntityState::default()
        };
        assert!(state.is_unavailable());
        let state = EntityState {
            state: "3".into(),
            ..EntityState::default()
        };
        assert!(!state.is_unavailable());
    }
}
