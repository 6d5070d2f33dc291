// ── Render tree construction ──
//
// Turns a decoded payload plus the card config into the ordered render
// tree. The result is a pure function of its inputs: the same payload and
// config always yield an equal tree.

use tracing::debug;

use crate::action::ActionResolver;
use crate::config::CardConfig;
use crate::error::CardError;
use crate::format::{Medium, link_label};
use crate::model::{
    ClientStats, ClientView, MasterPanelView, NodeRole, RawClient, RawNode, RawPayload,
    RenderTree, Section, SectionKind,
};
use crate::rate::RateAggregator;
use crate::sort::Sorter;

/// Builds render trees under one card configuration.
#[derive(Debug, Clone, Copy)]
pub struct TopologyBuilder<'a> {
    config: &'a CardConfig,
    sorter: Sorter,
    rates: RateAggregator,
    actions: ActionResolver<'a>,
}

impl<'a> TopologyBuilder<'a> {
    pub fn new(config: &'a CardConfig) -> Self {
        Self {
            config,
            sorter: Sorter::new(config.node_sort),
            rates: RateAggregator::new(config.transfer_metric_mode),
            actions: ActionResolver::new(config),
        }
    }

    /// Build the render tree. An empty node list is `EmptyTopology`, which the
    /// card shows as "waiting for data".
    pub fn build(&self, payload: &RawPayload) -> Result<RenderTree, CardError> {
        // Malformed payloads may flag no master at all; the first node stands in.
        let master_idx = payload
            .nodes
            .iter()
            .position(|node| node.role() == NodeRole::Master)
            .unwrap_or(0);
        let master = payload.nodes.get(master_idx).ok_or(CardError::EmptyTopology)?;

        let mut slaves: Vec<&RawNode> = payload
            .nodes
            .iter()
            .enumerate()
            .filter(|&(idx, _)| idx != master_idx)
            .map(|(_, node)| node)
            .collect();

        let hide_offline = self.config.hide_offline_nodes;
        if hide_offline {
            let before = slaves.len();
            slaves.retain(|node| node.is_uplink_online());
            if slaves.len() < before {
                debug!(hidden = before - slaves.len(), "offline repeaters hidden");
            }
        }
        self.sorter.sort_nodes(&mut slaves);

        let mut sections = Vec::with_capacity(slaves.len() + 2);
        sections.push(self.node_section(SectionKind::Master, master));
        sections.extend(
            slaves
                .iter()
                .map(|node| self.node_section(SectionKind::Slave, node)),
        );
        if !hide_offline && !payload.unassigned_clients.is_empty() {
            sections.push(Section {
                kind: SectionKind::Unassigned,
                node: None,
                rate_label: None,
                uplink_label: None,
                stats: client_stats(&payload.unassigned_clients),
                ordered_clients: self.client_views(&payload.unassigned_clients),
            });
        }

        let master_panel = self.master_panel(master, payload, &sections);
        let tree = RenderTree {
            master_panel,
            sections,
        };
        debug!(
            sections = tree.sections.len(),
            clients = tree.client_count(),
            "render tree built"
        );
        Ok(tree)
    }

    fn node_section(&self, kind: SectionKind, node: &RawNode) -> Section {
        let rate_label = Some(self.rates.label(node)).filter(|label| !label.is_empty());
        let uplink_label = match kind {
            SectionKind::Slave => uplink_label(node),
            SectionKind::Master | SectionKind::Unassigned => None,
        };
        Section {
            kind,
            node: Some(node.clone()),
            rate_label,
            uplink_label,
            stats: client_stats(&node.clients),
            ordered_clients: self.client_views(&node.clients),
        }
    }

    fn client_views(&self, clients: &[RawClient]) -> Vec<ClientView> {
        let mut visible: Vec<&RawClient> = clients
            .iter()
            .filter(|client| !self.config.hide_offline_nodes || client.is_connected())
            .collect();
        self.sorter.sort_clients(&mut visible);
        visible
            .into_iter()
            .map(|client| ClientView {
                key: client.key(),
                connected: client.is_connected(),
                connection_label: connection_label(client),
                details_target: self.actions.details_target(client),
                address_url: self.actions.address_url(client),
                client: client.clone(),
            })
            .collect()
    }

    fn master_panel(
        &self,
        master: &RawNode,
        payload: &RawPayload,
        sections: &[Section],
    ) -> MasterPanelView {
        let all_clients = payload
            .nodes
            .iter()
            .flat_map(|node| node.clients.iter())
            .chain(payload.unassigned_clients.iter());
        let (client_count, connected_client_count) =
            all_clients.fold((0, 0), |(total, connected), client| {
                (total + 1, connected + usize::from(client.is_connected()))
            });

        MasterPanelView {
            title: self.config.title.clone(),
            name: master.display_name().to_owned(),
            model: master.model.clone(),
            firmware: master.firmware_version.clone(),
            ip: master.ip_address.clone(),
            host: payload.host.clone(),
            rate_label: sections.first().and_then(|s| s.rate_label.clone()),
            node_count: payload.nodes.len(),
            client_count,
            connected_client_count,
        }
    }
}

/// Human-readable connection of a client, e.g. `5 GHz → 867 Mbit/s`.
pub fn connection_label(client: &RawClient) -> String {
    let iface = client.interface_name.as_deref();
    link_label(
        Medium::classify(client.connection_type.as_deref(), iface),
        iface,
        client.cur_rx_kbps,
        client.max_rx_kbps,
    )
}

/// Parent link of a repeater; `None` when the payload says nothing about it.
fn uplink_label(node: &RawNode) -> Option<String> {
    if node.parent_link_type.is_none()
        && node.uplink_rx_kbps.is_none()
        && node.uplink_max_rx_kbps.is_none()
    {
        return None;
    }
    Some(link_label(
        Medium::classify(node.parent_link_type.as_deref(), None),
        None,
        node.uplink_rx_kbps,
        node.uplink_max_rx_kbps,
    ))
}

fn client_stats(clients: &[RawClient]) -> ClientStats {
    clients.iter().fold(ClientStats::default(), |mut stats, client| {
        stats.total += 1;
        stats.connected += usize::from(client.is_connected());
        let iface = client.interface_name.as_deref();
        match Medium::classify(client.connection_type.as_deref(), iface) {
            Medium::Wireless => stats.wifi += 1,
            Medium::Wired => stats.lan += 1,
            Medium::Unknown => {}
        }
        stats
    })
}
