//! CLI-owned configuration loading.
//!
//! Produces the raw card map (file, then `FRITZMESH_CARD_*` environment,
//! then `--entity`) and leaves validation to `fritzmesh_core`.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml, Yaml},
};
use tracing::debug;

use fritzmesh_core::RawConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Prefix of environment overrides, e.g. `FRITZMESH_CARD_NODE_SORT=mac`.
pub const ENV_PREFIX: &str = "FRITZMESH_CARD_";

// ── Config file path ─────────────────────────────────────────────────

/// Default config file path via XDG / platform conventions.
pub fn default_config_path() -> PathBuf {
    ProjectDirs::from("de", "fritzmesh", "fritzmesh")
        .map(|dirs| dirs.config_dir().join("card.yaml"))
        .unwrap_or_else(|| {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("fritzmesh");
            p.push("card.yaml");
            p
        })
}

/// The file in effect: `--config` if given, else the default path.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(default_config_path)
}

// ── Config loading ───────────────────────────────────────────────────

/// Load the raw card map. A missing default file is fine (env and flags may
/// carry everything); a missing explicit `--config` file is an error.
pub fn load_raw_config(global: &GlobalOpts) -> Result<RawConfig, CliError> {
    let path = config_path(global);
    if global.config.is_some() && !path.is_file() {
        return Err(CliError::NoConfigFile {
            path: path.display().to_string(),
        });
    }
    debug!(path = %path.display(), "loading card configuration");

    let mut figment = with_file(Figment::new(), &path).merge(Env::prefixed(ENV_PREFIX));
    if let Some(entity) = &global.entity {
        figment = figment.merge(Serialized::default("entity", entity));
    }
    Ok(figment.extract()?)
}

fn with_file(figment: Figment, path: &Path) -> Figment {
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        figment.merge(Toml::file_exact(path))
    } else {
        figment.merge(Yaml::file_exact(path))
    }
}
