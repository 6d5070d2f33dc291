//! Config subcommand handlers.

use std::fmt::Write as _;

use fritzmesh_core::CardConfig;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Format the validated config for display, defaults included.
fn detail(cfg: &CardConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "entity                   = {}", cfg.entity_id);
    if let Some(title) = &cfg.title {
        let _ = writeln!(out, "title                    = {title}");
    }
    let _ = writeln!(out, "url_template             = {}", cfg.url_template);
    let _ = writeln!(out, "name_info_display        = {}", cfg.name_info_display);
    let _ = writeln!(out, "node_sort                = {}", cfg.node_sort);
    let _ = writeln!(out, "transfer_metric_mode     = {}", cfg.transfer_metric_mode);
    let _ = writeln!(out, "hide_offline_nodes       = {}", cfg.hide_offline_nodes);
    let _ = writeln!(out, "line_color               = {}", cfg.line_color.as_str());
    let _ = writeln!(out, "accent_color             = {}", cfg.accent_color.as_str());
    let _ = writeln!(out, "text_dim_color           = {}", cfg.text_dim_color.as_str());
    let _ = writeln!(
        out,
        "master_panel_start_color = {}",
        cfg.master_panel_start_color.as_str()
    );
    let _ = writeln!(
        out,
        "master_panel_end_color   = {}",
        cfg.master_panel_end_color.as_str()
    );
    let _ = write!(out, "font_scale_percent       = {}", cfg.font_scale_percent);
    for (key, value) in &cfg.extra {
        let _ = write!(out, "\n{key:<24} = {value}  (not interpreted)");
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path(global).display().to_string(), global.quiet);
            Ok(())
        }
        ConfigCommand::Show => {
            let raw = config::load_raw_config(global)?;
            let cfg = CardConfig::from_raw(&raw)?;
            let out = output::render_single(&global.output, &cfg, detail, |c| c.entity_id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
