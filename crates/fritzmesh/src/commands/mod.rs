//! Command dispatch: bridges CLI args -> card pipeline -> output formatting.

pub mod actions;
pub mod config_cmd;
pub mod render;
pub mod watch;

use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use fritzmesh_core::{CardView, EntityState, MeshCard, RenderTree};

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Dispatch a card-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Render(args) => render::handle(&args, global),
        Command::Watch(args) => watch::handle(&args, global),
        Command::Details(args) => actions::details(&args, global),
        Command::Open(args) => actions::open(&args, global),
        Command::Config(args) => config_cmd::handle(&args, global),
        Command::Completions(_) => Ok(()),
    }
}

// ── Shared helpers ──────────────────────────────────────────────────

/// A card configured from file, environment and flags.
pub fn load_card(global: &GlobalOpts) -> Result<MeshCard, CliError> {
    let raw = config::load_raw_config(global)?;
    let mut card = MeshCard::new();
    card.set_config(&raw)?;
    Ok(card)
}

/// A configured card that has processed the state in `path`.
pub fn load_rendered_card(path: &Path, global: &GlobalOpts) -> Result<MeshCard, CliError> {
    let mut card = load_card(global)?;
    let entity = entity_of(&card);
    let value: Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    card.update(select_state(value, &entity)?.as_ref());
    rendered_tree(&card)?;
    Ok(card)
}

pub fn entity_of(card: &MeshCard) -> String {
    card.config()
        .map(|config| config.entity_id.clone())
        .unwrap_or_default()
}

/// The committed tree, or the reason there is none.
pub fn rendered_tree(card: &MeshCard) -> Result<&RenderTree, CliError> {
    match card.view() {
        CardView::Rendered(tree) => Ok(tree),
        CardView::Unavailable { entity } => Err(CliError::Unavailable {
            entity: entity.clone(),
        }),
        CardView::Waiting => Err(CliError::NoData),
        CardView::Error { message } => Err(CliError::Render {
            message: message.clone(),
        }),
        CardView::NoConfig => Err(CliError::Config(
            fritzmesh_core::ConfigError::MissingEntity,
        )),
    }
}

/// Pick the entity state out of a JSON document.
///
/// Accepts a single entity state (`{state, attributes}`) or a map of entity
/// id to state, as a host would hold it. `None` means the entity is absent.
pub fn select_state(value: Value, entity: &str) -> Result<Option<EntityState>, CliError> {
    let Value::Object(mut map) = value else {
        return Err(CliError::Render {
            message: "entity state must be a JSON object".into(),
        });
    };
    if map.contains_key("attributes") || map.contains_key("state") {
        let state: EntityState = serde_json::from_value(Value::Object(map))?;
        if let Some(id) = state.entity_id.as_deref().filter(|id| *id != entity) {
            warn!(state_entity = id, configured = entity, "state is for a different entity");
        }
        return Ok(Some(state));
    }
    let state: Option<EntityState> = map
        .remove(entity)
        .map(serde_json::from_value)
        .transpose()?;
    if state.is_none() {
        debug!(entity, "entity missing from state map");
    }
    Ok(state)
}
