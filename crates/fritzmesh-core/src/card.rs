// ── Card component ──
//
// One card instance: current config, last entity state, change-detection key,
// current view and layout state. Every trigger (config edit, state push,
// width observation, click) runs to completion before the next one, so the
// committed view is never observed half-built.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::change::ChangeDetector;
use crate::config::{CardConfig, ConfigError, RawConfig};
use crate::error::CardError;
use crate::layout::{ResponsiveLayout, SizeClass};
use crate::model::{ClientView, EntityState, RawPayload, RenderTree};
use crate::topology::TopologyBuilder;

/// Lower bound of the card-size hint.
pub const MIN_CARD_SIZE: usize = 4;

/// What the presentation layer should show.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum CardView {
    /// No valid configuration has been applied yet.
    #[default]
    NoConfig,
    /// The entity is missing or reports no usable state.
    Unavailable { entity: String },
    /// The payload carries no mesh nodes yet.
    Waiting,
    Rendered(Box<RenderTree>),
    /// Inline error; the next push retries from scratch.
    Error { message: String },
}

impl CardView {
    fn from_error(error: &CardError) -> Self {
        match error {
            CardError::Unavailable { entity } => Self::Unavailable {
                entity: entity.clone(),
            },
            CardError::EmptyTopology => Self::Waiting,
            CardError::Config(_) | CardError::Render { .. } => Self::Error {
                message: error.to_string(),
            },
        }
    }

    pub fn tree(&self) -> Option<&RenderTree> {
        match self {
            Self::Rendered(tree) => Some(tree),
            _ => None,
        }
    }
}

/// Outbound requests to the hosting collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CardEvent {
    ShowDetails { entity_id: String },
    OpenUrl { url: String },
    SizeClassChanged { size_class: SizeClass },
}

#[derive(Debug, Default)]
pub struct MeshCard {
    config: Option<CardConfig>,
    /// Last push: `None` before the first one, `Some(None)` when the host
    /// reported the entity as missing.
    last_push: Option<Option<EntityState>>,
    change: ChangeDetector,
    view: CardView,
    layout: ResponsiveLayout,
    builds: u64,
}

impl MeshCard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and apply a new configuration, then rebuild from the last
    /// known state. A rejected config leaves the card untouched.
    pub fn set_config(&mut self, raw: &RawConfig) -> Result<&CardView, ConfigError> {
        let config = CardConfig::from_raw(raw)
            .inspect_err(|e| warn!(error = %e, "card configuration rejected"))?;
        info!(entity = %config.entity_id, "card configured");
        self.config = Some(config);
        // Visual parameters changed even if the payload did not.
        self.change.invalidate();
        match self.last_push.take() {
            Some(state) => {
                self.process(state.as_ref());
                self.last_push = Some(state);
            }
            None => {
                self.commit(CardView::Waiting);
            }
        }
        Ok(&self.view)
    }

    /// Handle a state push. `None` means the host has no such entity.
    ///
    /// Returns `true` when the committed view changed.
    pub fn update(&mut self, state: Option<&EntityState>) -> bool {
        self.last_push = Some(state.cloned());
        self.process(state)
    }

    fn process(&mut self, state: Option<&EntityState>) -> bool {
        let Some(config) = &self.config else {
            return self.commit(CardView::NoConfig);
        };
        match evaluate(config, &mut self.change, state) {
            Ok(None) => false,
            Ok(Some(tree)) => {
                self.builds += 1;
                debug!(builds = self.builds, "card rebuilt");
                self.commit(CardView::Rendered(Box::new(tree)))
            }
            Err(error) => {
                self.change.invalidate();
                match &error {
                    CardError::Render { message } => warn!(%message, "render failed"),
                    other => debug!(reason = %other, "nothing to render"),
                }
                self.commit(CardView::from_error(&error))
            }
        }
    }

    fn commit(&mut self, view: CardView) -> bool {
        if self.view == view {
            return false;
        }
        self.view = view;
        true
    }

    /// Feed a container width; yields an event only on a size-class change.
    pub fn observe_width(&mut self, width: f64) -> Option<CardEvent> {
        self.layout
            .observe(width)
            .map(|size_class| CardEvent::SizeClassChanged { size_class })
    }

    /// Sizing hint for the host: `max(4, ceil((nodes * 3 + clients) / 4))`
    /// over the last built tree.
    pub fn card_size(&self) -> usize {
        self.tree().map_or(MIN_CARD_SIZE, |tree| {
            (tree.node_count() * 3 + tree.client_count())
                .div_ceil(4)
                .max(MIN_CARD_SIZE)
        })
    }

    /// "Show details" for a rendered client, identified by key, MAC, uid, IP
    /// or name. `None` when no entity reference resolves.
    pub fn show_details(&self, client: &str) -> Option<CardEvent> {
        let view = self.lookup(client, "show details")?;
        match &view.details_target {
            Some(entity_id) => Some(CardEvent::ShowDetails {
                entity_id: entity_id.clone(),
            }),
            None => {
                info!(client = %view.key, "show details ignored: no entity reference");
                None
            }
        }
    }

    /// "Open address" for a rendered client. `None` when it has no IP.
    pub fn open_address(&self, client: &str) -> Option<CardEvent> {
        let view = self.lookup(client, "open address")?;
        match &view.address_url {
            Some(url) => Some(CardEvent::OpenUrl { url: url.clone() }),
            None => {
                info!(client = %view.key, "open address ignored: client has no IP");
                None
            }
        }
    }

    fn lookup(&self, client: &str, action: &'static str) -> Option<&ClientView> {
        let found = self.tree().and_then(|tree| {
            tree.clients()
                .find(|view| view.key == client)
                .or_else(|| tree.find_client(client))
        });
        if found.is_none() {
            info!(client, action, "action ignored: client not rendered");
        }
        found
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn view(&self) -> &CardView {
        &self.view
    }

    pub fn tree(&self) -> Option<&RenderTree> {
        self.view.tree()
    }

    pub fn config(&self) -> Option<&CardConfig> {
        self.config.as_ref()
    }

    pub fn size_class(&self) -> Option<SizeClass> {
        self.layout.current()
    }

    /// Number of render trees built so far.
    pub fn builds(&self) -> u64 {
        self.builds
    }
}

/// `Ok(None)` when the payload is unchanged since the last build.
fn evaluate(
    config: &CardConfig,
    change: &mut ChangeDetector,
    state: Option<&EntityState>,
) -> Result<Option<RenderTree>, CardError> {
    let state = state
        .filter(|state| !state.is_unavailable())
        .ok_or_else(|| CardError::Unavailable {
            entity: config.entity_id.clone(),
        })?;
    let payload = RawPayload::from_attributes(&state.attributes)?;
    if !change.check(&payload) {
        return Ok(None);
    }
    TopologyBuilder::new(config).build(&payload).map(Some)
}
