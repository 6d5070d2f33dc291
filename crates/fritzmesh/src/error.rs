//! CLI error types with miette diagnostics.
//!
//! Maps `CardError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use fritzmesh_core::{CardError, ConfigError};

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const UNAVAILABLE: i32 = 4;
    pub const NO_DATA: i32 = 5;
    pub const NOT_FOUND: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(fritzmesh::config),
        help(
            "Fix the card configuration file, or pass --entity.\n\
             Show the resolved values with: fritzmesh config show"
        )
    )]
    Config(#[from] ConfigError),

    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(fritzmesh::no_config),
        help("Create the file, or drop --config to use the default location.")
    )]
    NoConfigFile { path: String },

    #[error(transparent)]
    #[diagnostic(code(fritzmesh::config_file))]
    ConfigFile(Box<figment::Error>),

    // ── Payload ──────────────────────────────────────────────────────

    #[error("Entity not available: {entity}")]
    #[diagnostic(
        code(fritzmesh::unavailable),
        help("The state file has no usable state for {entity}.")
    )]
    Unavailable { entity: String },

    #[error("No mesh nodes reported yet")]
    #[diagnostic(
        code(fritzmesh::no_data),
        help("The payload has an empty node list; wait for the next poll.")
    )]
    NoData,

    #[error("Render error: {message}")]
    #[diagnostic(code(fritzmesh::render))]
    Render { message: String },

    // ── Actions ──────────────────────────────────────────────────────

    #[error("Client '{identifier}' is not rendered")]
    #[diagnostic(
        code(fritzmesh::client_not_found),
        help("Run: fritzmesh render --state <file> -o plain to list client keys")
    )]
    ClientNotFound { identifier: String },

    #[error("Client '{identifier}' has no {target}")]
    #[diagnostic(code(fritzmesh::no_action_target))]
    NoActionTarget {
        identifier: String,
        target: &'static str,
    },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(fritzmesh::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::ConfigFile(Box::new(err))
    }
}

impl From<CardError> for CliError {
    fn from(err: CardError) -> Self {
        match err {
            CardError::Config(e) => Self::Config(e),
            CardError::Unavailable { entity } => Self::Unavailable { entity },
            CardError::EmptyTopology => Self::NoData,
            CardError::Render { message } => Self::Render { message },
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::NoConfigFile { .. } | Self::ConfigFile(_) => exit_code::CONFIG,
            Self::Unavailable { .. } => exit_code::UNAVAILABLE,
            Self::NoData => exit_code::NO_DATA,
            Self::ClientNotFound { .. } | Self::NoActionTarget { .. } => exit_code::NOT_FOUND,
            Self::Json(_) => exit_code::USAGE,
            Self::Render { .. } | Self::Io(_) => exit_code::GENERAL,
        }
    }
}
