//! Clap derive structures for the `fritzmesh` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fritzmesh -- render Fritz!Box mesh topology payloads
#[derive(Debug, Parser)]
#[command(
    name = "fritzmesh",
    version,
    about = "Render Fritz!Box mesh topology from entity-state payloads",
    long_about = "Feeds the mesh topology sensor's entity state through the card pipeline\n\
        (config validation, change detection, topology, sorting, rate labels)\n\
        and prints the resulting render tree.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Card configuration file (YAML or TOML, by extension)
    #[arg(long, short = 'c', env = "FRITZMESH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Topology sensor entity (overrides the config file)
    #[arg(long, short = 'e', env = "FRITZMESH_ENTITY", global = true)]
    pub entity: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FRITZMESH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty tables (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build and print the render tree for one entity state
    #[command(alias = "r")]
    Render(RenderArgs),

    /// Stream entity states (NDJSON) and print every visible change
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Resolve the "show details" entity of a rendered client
    Details(ActionArgs),

    /// Resolve the "open address" URL of a rendered client
    Open(ActionArgs),

    /// Inspect the card configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Entity state JSON file (a single state, or a map of entity id to state)
    #[arg(long, short = 's')]
    pub state: PathBuf,

    /// Container width; also reports the layout size class
    #[arg(long, short = 'w')]
    pub width: Option<f64>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// NDJSON event stream: entity states or `{"width": N}` resizes ("-" for stdin)
    #[arg(long, short = 's', default_value = "-")]
    pub state: PathBuf,
}

#[derive(Debug, Args)]
pub struct ActionArgs {
    /// Client MAC, uid, IP or name
    pub client: String,

    /// Entity state JSON file
    #[arg(long, short = 's')]
    pub state: PathBuf,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the validated configuration with defaults applied
    Show,

    /// Print the configuration file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
