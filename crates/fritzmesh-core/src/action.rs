// ── Client interactions ──
//
// Maps a rendered client to the entity shown by "show details" and to the
// URL opened by "open address". Resolution happens when the tree is built
// so the presentation layer can tell which actions are live.

use crate::config::{CardConfig, IP_PLACEHOLDER, NameInfoDisplay};
use crate::model::RawClient;

/// Resolves interaction targets under one card configuration.
#[derive(Debug, Clone, Copy)]
pub struct ActionResolver<'a> {
    config: &'a CardConfig,
}

impl<'a> ActionResolver<'a> {
    pub fn new(config: &'a CardConfig) -> Self {
        Self { config }
    }

    /// Entity reference for "show details", preferring the one the display
    /// mode is about.
    pub fn details_target(&self, client: &RawClient) -> Option<String> {
        let candidates: [Option<&String>; 3] = match self.config.name_info_display {
            NameInfoDisplay::ConnectionState => [
                client.connection_state_entity_ref.as_ref(),
                client.entity_ref.as_ref(),
                None,
            ],
            NameInfoDisplay::MeshNode => [
                client.mesh_node_entity_ref.as_ref(),
                client.entity_ref.as_ref(),
                client.connection_state_entity_ref.as_ref(),
            ],
        };
        candidates.into_iter().flatten().next().cloned()
    }

    /// URL for "open address", or `None` when the client has no IP.
    pub fn address_url(&self, client: &RawClient) -> Option<String> {
        let ip = client.ip.as_deref().map(str::trim).filter(|ip| !ip.is_empty())?;
        Some(build_url(&self.config.url_template, ip))
    }
}

/// Substitute every `{ip}` placeholder (or append the IP when there is none)
/// and make sure the result carries a scheme.
pub fn build_url(template: &str, ip: &str) -> String {
    let url = if template.contains(IP_PLACEHOLDER) {
        template.replace(IP_PLACEHOLDER, ip)
    } else {
        format!("{template}{ip}")
    };
    if has_scheme(&url) {
        url
    } else {
        format!("http://{url}")
    }
}

/// `scheme://` per RFC 3986: a letter followed by letters, digits, `+ - .`.
fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
