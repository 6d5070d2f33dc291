//! Interaction handlers: "show details" and "open address" for one client.

use fritzmesh_core::{CardEvent, MeshCard};

use crate::cli::{ActionArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Clone, Copy)]
enum Action {
    Details,
    Open,
}

impl Action {
    fn target(self) -> &'static str {
        match self {
            Self::Details => "entity reference",
            Self::Open => "IP address",
        }
    }

    fn run(self, card: &MeshCard, client: &str) -> Option<CardEvent> {
        match self {
            Self::Details => card.show_details(client),
            Self::Open => card.open_address(client),
        }
    }
}

/// The string the host collaborator would receive.
fn payload(event: &CardEvent) -> String {
    match event {
        CardEvent::ShowDetails { entity_id } => entity_id.clone(),
        CardEvent::OpenUrl { url } => url.clone(),
        CardEvent::SizeClassChanged { size_class } => size_class.to_string(),
    }
}

fn resolve(action: Action, args: &ActionArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let card = super::load_rendered_card(&args.state, global)?;
    let Some(event) = action.run(&card, &args.client) else {
        let rendered = super::rendered_tree(&card)?
            .clients()
            .any(|view| view.key == args.client || view.client.matches(&args.client));
        return Err(if rendered {
            CliError::NoActionTarget {
                identifier: args.client.clone(),
                target: action.target(),
            }
        } else {
            CliError::ClientNotFound {
                identifier: args.client.clone(),
            }
        });
    };
    let out = output::render_single(&global.output, &event, payload, payload);
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn details(args: &ActionArgs, global: &GlobalOpts) -> Result<(), CliError> {
    resolve(Action::Details, args, global)
}

pub fn open(args: &ActionArgs, global: &GlobalOpts) -> Result<(), CliError> {
    resolve(Action::Open, args, global)
}
