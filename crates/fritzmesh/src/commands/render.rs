//! Render command: one-shot build of the card for a single state file.

use std::fmt::Write as _;

use serde::Serialize;
use tabled::Tabled;

use fritzmesh_core::{
    CardView, ClientView, MeshCard, RenderTree, Section, SectionKind, SizeClass,
};

use crate::cli::{GlobalOpts, OutputFormat, RenderArgs};
use crate::error::CliError;
use crate::output::{self, heading, presence_marker};

// ── Report ──────────────────────────────────────────────────────────

/// Structured output: the committed view plus the host-facing layout hints.
#[derive(Serialize)]
struct RenderReport<'a> {
    entity: String,
    size_class: Option<SizeClass>,
    card_size: usize,
    view: &'a CardView,
}

impl<'a> RenderReport<'a> {
    fn of(card: &'a MeshCard) -> Self {
        Self {
            entity: super::entity_of(card),
            size_class: card.size_class(),
            card_size: card.card_size(),
            view: card.view(),
        }
    }
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Uplink")]
    uplink: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Clients")]
    clients: String,
}

impl From<&Section> for NodeRow {
    fn from(s: &Section) -> Self {
        Self {
            role: section_role(s.kind).into(),
            name: section_name(s),
            ip: s
                .node
                .as_ref()
                .and_then(|n| n.ip_address.clone())
                .unwrap_or_else(|| "-".into()),
            uplink: s.uplink_label.clone().unwrap_or_else(|| "-".into()),
            rate: s.rate_label.clone().unwrap_or_else(|| "-".into()),
            clients: format!(
                "{}/{} (WiFi {}, LAN {})",
                s.stats.connected, s.stats.total, s.stats.wifi, s.stats.lan
            ),
        }
    }
}

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = " ")]
    marker: String,
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Connection")]
    connection: String,
}

impl ClientRow {
    fn new(section: &Section, view: &ClientView, color: bool) -> Self {
        Self {
            marker: presence_marker(view.connected, color),
            node: section_name(section),
            name: view.client.display_name().to_owned(),
            mac: view.key.clone(),
            ip: view.client.ip.clone().unwrap_or_else(|| "-".into()),
            connection: view.connection_label.clone(),
        }
    }
}

fn section_role(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Master => "master",
        SectionKind::Slave => "repeater",
        SectionKind::Unassigned => "unassigned",
    }
}

fn section_name(section: &Section) -> String {
    section.node.as_ref().map_or_else(
        || "(unassigned)".to_owned(),
        |node| node.display_name().to_owned(),
    )
}

// ── Detail view ─────────────────────────────────────────────────────

fn detail(card: &MeshCard, tree: &RenderTree, color: bool) -> String {
    let panel = &tree.master_panel;
    let mut out = String::new();
    let title = panel.title.as_deref().unwrap_or(&panel.name);
    let _ = writeln!(out, "{}", heading(title, color));

    let mut master = panel.name.clone();
    let extras: Vec<&str> = [panel.model.as_deref(), panel.firmware.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !extras.is_empty() {
        let _ = write!(master, " ({})", extras.join(", "));
    }
    let _ = writeln!(out, "Master:    {master}");
    let _ = writeln!(out, "IP:        {}", panel.ip.as_deref().unwrap_or("-"));
    if let Some(host) = &panel.host {
        let _ = writeln!(out, "Host:      {host}");
    }
    let _ = writeln!(out, "Nodes:     {}", panel.node_count);
    let _ = writeln!(
        out,
        "Clients:   {} connected / {} total",
        panel.connected_client_count, panel.client_count
    );
    if let Some(rate) = &panel.rate_label {
        let _ = writeln!(out, "Rate:      {rate}");
    }
    let size_class = card
        .size_class()
        .map_or_else(|| "-".to_owned(), |class| class.to_string());
    let _ = writeln!(out, "Layout:    {size_class} (card size {})", card.card_size());

    let nodes: Vec<NodeRow> = tree
        .sections
        .iter()
        .filter(|s| s.kind != SectionKind::Unassigned)
        .map(NodeRow::from)
        .collect();
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", output::render_table(&nodes));

    let clients: Vec<ClientRow> = tree
        .sections
        .iter()
        .flat_map(|s| s.ordered_clients.iter().map(move |c| (s, c)))
        .map(|(s, c)| ClientRow::new(s, c, color))
        .collect();
    if !clients.is_empty() {
        let _ = writeln!(out);
        let _ = write!(out, "{}", output::render_table(&clients));
    }
    out
}

/// One status line for views without a tree.
fn status(view: &CardView) -> String {
    match view {
        CardView::NoConfig => "no configuration".into(),
        CardView::Unavailable { entity } => format!("unavailable: {entity}"),
        CardView::Waiting => "waiting for data".into(),
        CardView::Error { message } => format!("error: {message}"),
        CardView::Rendered(_) => "rendered".into(),
    }
}

/// Render the card's committed view in the selected format.
pub fn render_view(card: &MeshCard, format: &OutputFormat, color: bool) -> String {
    let report = RenderReport::of(card);
    output::render_single(
        format,
        &report,
        |r| match card.tree() {
            Some(tree) => detail(card, tree, color),
            None => status(r.view),
        },
        |r| match card.tree() {
            Some(tree) => tree
                .clients()
                .map(|c| c.key.clone())
                .collect::<Vec<_>>()
                .join("\n"),
            None => status(r.view),
        },
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &RenderArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut card = super::load_rendered_card(&args.state, global)?;
    if let Some(width) = args.width {
        card.observe_width(width);
    }
    let color = output::should_color(&global.color);
    output::print_output(&render_view(&card, &global.output, color), global.quiet);
    Ok(())
}
