//! Watch command: replays an NDJSON stream of host events through one card.
//!
//! Each line is either an entity state (a single state or a map of entity id
//! to state) or a resize event `{"width": N}`. Output is printed only when
//! the committed view or the size class changes.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use fritzmesh_core::{CardEvent, EntityState};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::render::render_view;

enum HostEvent {
    Resize(f64),
    State(Option<EntityState>),
}

fn parse_event(value: Value, entity: &str) -> Result<HostEvent, CliError> {
    if let Some(width) = value.as_object().and_then(resize_width) {
        return Ok(HostEvent::Resize(width));
    }
    super::select_state(value, entity).map(HostEvent::State)
}

fn resize_width(map: &serde_json::Map<String, Value>) -> Option<f64> {
    if map.contains_key("attributes") || map.contains_key("state") {
        return None;
    }
    map.get("width").and_then(Value::as_f64)
}

fn render_size_event(event: &CardEvent, format: &OutputFormat) -> String {
    output::render_single(
        format,
        event,
        |e| match e {
            CardEvent::SizeClassChanged { size_class } => format!("size class: {size_class}"),
            other => format!("{other:?}"),
        },
        |e| match e {
            CardEvent::SizeClassChanged { size_class } => size_class.to_string(),
            other => format!("{other:?}"),
        },
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut card = super::load_card(global)?;
    let entity = super::entity_of(&card);
    let color = output::should_color(&global.color);

    let reader: Box<dyn BufRead> = if args.state.as_path() == Path::new("-") {
        Box::new(io::stdin().lock())
    } else {
        Box::new(BufReader::new(File::open(&args.state)?))
    };

    let mut events = 0_usize;
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        events += 1;
        let event = serde_json::from_str(line)
            .map_err(CliError::from)
            .and_then(|value| parse_event(value, &entity));
        match event {
            Ok(HostEvent::Resize(width)) => {
                if let Some(change) = card.observe_width(width) {
                    output::print_output(&render_size_event(&change, &global.output), global.quiet);
                }
            }
            Ok(HostEvent::State(state)) => {
                if card.update(state.as_ref()) {
                    output::print_output(&render_view(&card, &global.output, color), global.quiet);
                }
            }
            Err(e) => warn!(line = idx + 1, error = %e, "skipping malformed event"),
        }
    }

    info!(events, builds = card.builds(), "watch finished");
    Ok(())
}
