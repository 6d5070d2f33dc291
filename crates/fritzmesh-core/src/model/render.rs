// ── Render model ──
//
// Output of the topology builder. Built from scratch on every significant
// change and handed to the presentation layer as an immutable value.

use serde::{Deserialize, Serialize};

use super::payload::{RawClient, RawNode};

/// The ordered structure consumed by the presentation layer.
///
/// `sections[0]` is always the master section; slave sections follow and an
/// unassigned section, if any, is last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderTree {
    pub master_panel: MasterPanelView,
    pub sections: Vec<Section>,
}

impl RenderTree {
    /// Master section plus slave sections.
    pub fn node_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| s.kind != SectionKind::Unassigned)
            .count()
    }

    pub fn client_count(&self) -> usize {
        self.sections.iter().map(|s| s.ordered_clients.len()).sum()
    }

    pub fn clients(&self) -> impl Iterator<Item = &ClientView> {
        self.sections.iter().flat_map(|s| s.ordered_clients.iter())
    }

    /// Look up a rendered client by MAC, uid, IP or name.
    pub fn find_client(&self, ident: &str) -> Option<&ClientView> {
        self.clients().find(|view| view.client.matches(ident))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Master,
    Slave,
    Unassigned,
}

/// One column of the card: a mesh node and its clients, or the trailing
/// bucket of clients without a known node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    pub node: Option<RawNode>,
    /// Throughput summary under the configured metric mode.
    pub rate_label: Option<String>,
    /// Parent link of a repeater, e.g. `5 GHz → 866 Mbit/s`.
    pub uplink_label: Option<String>,
    pub stats: ClientStats,
    pub ordered_clients: Vec<ClientView>,
}

/// Client counts over a node's raw client list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientStats {
    pub total: usize,
    pub connected: usize,
    pub wifi: usize,
    pub lan: usize,
}

/// A client plus everything the presentation layer derives from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientView {
    pub client: RawClient,
    pub key: String,
    pub connected: bool,
    /// e.g. `5 GHz → 866 Mbit/s`, `LAN → 1.0 Gbit/s`, `WiFi`.
    pub connection_label: String,
    /// Entity shown by the "show details" action, if any resolves.
    pub details_target: Option<String>,
    /// URL opened by the "open address" action, if the client has an IP.
    pub address_url: Option<String>,
}

/// Header panel describing the coordinating node and the mesh as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterPanelView {
    pub title: Option<String>,
    pub name: String,
    pub model: Option<String>,
    pub firmware: Option<String>,
    pub ip: Option<String>,
    pub host: Option<String>,
    pub rate_label: Option<String>,
    pub node_count: usize,
    pub client_count: usize,
    pub connected_client_count: usize,
}
