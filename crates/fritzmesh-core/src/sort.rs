// ── Node and client ordering ──
//
// Every strategy is a total order: after the primary key, ties fall through
// to the display name, the parsed MAC, the raw identifiers, the IP, presence
// and finally the serialized entry, so two distinct entries never compare
// equal and the result never depends on payload order.

use std::cmp::Ordering;
use std::net::Ipv4Addr;

use crate::config::NodeSort;
use crate::model::{MacAddress, RawClient, RawNode};

type Order<T> = fn(&T, &T) -> Ordering;

/// Keys the comparators need from nodes and clients alike.
pub trait SortKey {
    fn display_name(&self) -> &str;
    fn mac_address(&self) -> Option<MacAddress>;
    fn ipv4(&self) -> Option<Ipv4Addr>;
    /// Unparsed identifiers, used only as a last-resort tiebreak.
    fn identity(&self) -> (Option<&str>, Option<&str>);
    /// Connected client, or repeater with an online uplink.
    fn present(&self) -> bool;
    /// Full serialized form; distinct entries never share it.
    fn canonical(&self) -> String;
}

impl SortKey for RawNode {
    fn display_name(&self) -> &str {
        RawNode::display_name(self)
    }
    fn mac_address(&self) -> Option<MacAddress> {
        RawNode::mac_address(self)
    }
    fn ipv4(&self) -> Option<Ipv4Addr> {
        RawNode::ipv4(self)
    }
    fn identity(&self) -> (Option<&str>, Option<&str>) {
        (self.mac.as_deref(), self.id.as_deref())
    }
    fn present(&self) -> bool {
        self.is_uplink_online()
    }
    fn canonical(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl SortKey for RawClient {
    fn display_name(&self) -> &str {
        RawClient::display_name(self)
    }
    fn mac_address(&self) -> Option<MacAddress> {
        RawClient::mac_address(self)
    }
    fn ipv4(&self) -> Option<Ipv4Addr> {
        RawClient::ipv4(self)
    }
    fn identity(&self) -> (Option<&str>, Option<&str>) {
        (self.mac.as_deref(), self.uid.as_deref())
    }
    fn present(&self) -> bool {
        self.is_connected()
    }
    fn canonical(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

// ── Strategy table ──────────────────────────────────────────────────

/// Node ordering per strategy. `default` keeps the payload order.
fn node_order(mode: NodeSort) -> Option<Order<RawNode>> {
    match mode {
        NodeSort::Default => None,
        NodeSort::Name => Some(by_name::<RawNode>),
        NodeSort::Ip => Some(by_ip::<RawNode>),
        NodeSort::Mac => Some(by_mac::<RawNode>),
    }
}

/// Client ordering per strategy.
fn client_order(mode: NodeSort) -> Order<RawClient> {
    match mode {
        NodeSort::Default => by_presence,
        NodeSort::Name => by_name::<RawClient>,
        NodeSort::Ip => by_ip::<RawClient>,
        NodeSort::Mac => by_mac::<RawClient>,
    }
}

/// Orders nodes and clients under one configured strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sorter {
    mode: NodeSort,
}

impl Sorter {
    pub fn new(mode: NodeSort) -> Self {
        Self { mode }
    }

    pub fn compare_clients(&self, a: &RawClient, b: &RawClient) -> Ordering {
        client_order(self.mode)(a, b)
    }

    /// Compare two nodes; `None` when the strategy keeps payload order.
    pub fn compare_nodes(&self, a: &RawNode, b: &RawNode) -> Option<Ordering> {
        node_order(self.mode).map(|order| order(a, b))
    }

    pub fn sort_nodes(&self, nodes: &mut [&RawNode]) {
        if let Some(order) = node_order(self.mode) {
            nodes.sort_by(|a, b| order(a, b));
        }
    }

    pub fn sort_clients(&self, clients: &mut [&RawClient]) {
        let order = client_order(self.mode);
        clients.sort_by(|a, b| order(a, b));
    }
}

// ── Comparators ─────────────────────────────────────────────────────

/// Connected before disconnected, then by name.
fn by_presence(a: &RawClient, b: &RawClient) -> Ordering {
    b.is_connected()
        .cmp(&a.is_connected())
        .then_with(|| by_name(a, b))
}

/// Case-insensitive display name, with a full tiebreak chain.
fn by_name<T: SortKey>(a: &T, b: &T) -> Ordering {
    a.display_name()
        .to_lowercase()
        .cmp(&b.display_name().to_lowercase())
        .then_with(|| a.display_name().cmp(b.display_name()))
        .then_with(|| some_first(a.mac_address(), b.mac_address()))
        .then_with(|| a.identity().cmp(&b.identity()))
        .then_with(|| some_first(a.ipv4(), b.ipv4()))
        .then_with(|| b.present().cmp(&a.present()))
        .then_with(|| a.canonical().cmp(&b.canonical()))
}

/// Numeric IPv4 order; missing or unparseable addresses last; then MAC, name.
fn by_ip<T: SortKey>(a: &T, b: &T) -> Ordering {
    some_first(a.ipv4(), b.ipv4())
        .then_with(|| some_first(a.mac_address(), b.mac_address()))
        .then_with(|| by_name(a, b))
}

/// Numeric MAC order; missing or unparseable identifiers last; then name.
fn by_mac<T: SortKey>(a: &T, b: &T) -> Ordering {
    some_first(a.mac_address(), b.mac_address()).then_with(|| by_name(a, b))
}

/// `Some` values in their natural order, all before `None`.
fn some_first<K: Ord>(a: Option<K>, b: Option<K>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
