// ── Card configuration ──
//
// Normalizes the flat key/value map written in the dashboard YAML into an
// immutable `CardConfig`. Enumerated options are closed enums; colors and
// the font scale are coerced to safe values instead of failing. Keys the
// validator does not know are carried through untouched.

use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString, VariantNames};
use thiserror::Error;
use tracing::debug;

/// Raw configuration as written by the operator.
pub type RawConfig = IndexMap<String, Value>;

pub const DEFAULT_URL_TEMPLATE: &str = "http://{ip}";
pub const IP_PLACEHOLDER: &str = "{ip}";

pub const DEFAULT_LINE_COLOR: &str = "#5B8DEF";
pub const DEFAULT_ACCENT_COLOR: &str = "#03A9F4";
pub const DEFAULT_TEXT_DIM_COLOR: &str = "#8A8F98";
pub const DEFAULT_MASTER_PANEL_START_COLOR: &str = "#1E3A5F";
pub const DEFAULT_MASTER_PANEL_END_COLOR: &str = "#2C5282";

pub const FONT_SCALE_MIN: f64 = 80.0;
pub const FONT_SCALE_MAX: f64 = 140.0;
pub const FONT_SCALE_DEFAULT: f64 = 100.0;

const LEGACY_NAME_INFO_NONE: &str = "none";

const KNOWN_KEYS: &[&str] = &[
    "entity",
    "entity_id",
    "title",
    "url_template",
    "name_info_display",
    "node_sort",
    "transfer_metric_mode",
    "hide_offline_nodes",
    "line_color",
    "accent_color",
    "text_dim_color",
    "master_panel_start_color",
    "master_panel_end_color",
    "font_scale_percent",
];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("You need to define an entity (option 'entity')")]
    MissingEntity,

    #[error("Invalid {field} '{value}': expected one of {}", .allowed.join(", "))]
    InvalidChoice {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
}

// ── Enumerated options ──────────────────────────────────────────────

/// Which entity the "show details" action opens for a client.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NameInfoDisplay {
    #[default]
    MeshNode,
    ConnectionState,
}

/// Ordering applied to repeater nodes and to every client list.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NodeSort {
    #[default]
    Default,
    Name,
    Ip,
    Mac,
}

/// How a node's throughput label is computed.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TransferMetricMode {
    #[default]
    Aggregate,
    Uplink,
    MaxSingle,
    Average,
}

// ── Colors ──────────────────────────────────────────────────────────

/// A `#RRGGBB` color. Construction only succeeds for exactly six hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let hex = trimmed.strip_prefix('#')?;
        (hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
            .then(|| Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn or_default(value: Option<&Value>, field: &str, default: &str) -> Self {
        let parsed = value.and_then(Value::as_str).and_then(Self::parse);
        parsed.unwrap_or_else(|| {
            if value.is_some_and(|v| !v.is_null()) {
                debug!(field, "invalid color replaced by default");
            }
            Self(default.to_owned())
        })
    }
}

// ── Validated config ────────────────────────────────────────────────

/// Validated, immutable card configuration.
///
/// Any edit produces a new value through [`CardConfig::from_raw`]; the card
/// never mutates a config it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct CardConfig {
    pub entity_id: String,
    pub title: Option<String>,
    pub url_template: String,
    pub name_info_display: NameInfoDisplay,
    pub node_sort: NodeSort,
    pub transfer_metric_mode: TransferMetricMode,
    pub hide_offline_nodes: bool,
    pub line_color: HexColor,
    pub accent_color: HexColor,
    pub text_dim_color: HexColor,
    pub master_panel_start_color: HexColor,
    pub master_panel_end_color: HexColor,
    pub font_scale_percent: f64,
    /// Unrecognized keys, preserved in their original order.
    pub extra: RawConfig,
}

impl CardConfig {
    /// Validate a raw configuration map.
    pub fn from_raw(raw: &RawConfig) -> Result<Self, ConfigError> {
        let entity_id = raw
            .get("entity")
            .or_else(|| raw.get("entity_id"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingEntity)?
            .to_owned();

        let name_info_display = match raw.get("name_info_display").and_then(Value::as_str) {
            Some(v) if v.trim().eq_ignore_ascii_case(LEGACY_NAME_INFO_NONE) => {
                NameInfoDisplay::MeshNode
            }
            _ => choice(raw, "name_info_display")?,
        };

        let extra: RawConfig = raw
            .iter()
            .filter(|(key, _)| !KNOWN_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let config = Self {
            entity_id,
            title: text(raw.get("title")),
            url_template: text(raw.get("url_template"))
                .unwrap_or_else(|| DEFAULT_URL_TEMPLATE.to_owned()),
            name_info_display,
            node_sort: choice(raw, "node_sort")?,
            transfer_metric_mode: choice(raw, "transfer_metric_mode")?,
            hide_offline_nodes: flag(raw.get("hide_offline_nodes")),
            line_color: HexColor::or_default(raw.get("line_color"), "line_color", DEFAULT_LINE_COLOR),
            accent_color: HexColor::or_default(
                raw.get("accent_color"),
                "accent_color",
                DEFAULT_ACCENT_COLOR,
            ),
            text_dim_color: HexColor::or_default(
                raw.get("text_dim_color"),
                "text_dim_color",
                DEFAULT_TEXT_DIM_COLOR,
            ),
            master_panel_start_color: HexColor::or_default(
                raw.get("master_panel_start_color"),
                "master_panel_start_color",
                DEFAULT_MASTER_PANEL_START_COLOR,
            ),
            master_panel_end_color: HexColor::or_default(
                raw.get("master_panel_end_color"),
                "master_panel_end_color",
                DEFAULT_MASTER_PANEL_END_COLOR,
            ),
            font_scale_percent: font_scale(raw.get("font_scale_percent")),
            extra,
        };

        debug!(
            entity = %config.entity_id,
            node_sort = %config.node_sort,
            metric = %config.transfer_metric_mode,
            hide_offline = config.hide_offline_nodes,
            "card config validated"
        );
        Ok(config)
    }

    /// Serialize back into the flat key/value form. Validating the result
    /// yields an equal config.
    pub fn to_raw(&self) -> RawConfig {
        let mut raw = RawConfig::new();
        raw.insert("entity".into(), Value::from(self.entity_id.as_str()));
        if let Some(title) = &self.title {
            raw.insert("title".into(), Value::from(title.as_str()));
        }
        raw.insert("url_template".into(), Value::from(self.url_template.as_str()));
        raw.insert(
            "name_info_display".into(),
            Value::from(self.name_info_display.as_ref()),
        );
        raw.insert("node_sort".into(), Value::from(self.node_sort.as_ref()));
        raw.insert(
            "transfer_metric_mode".into(),
            Value::from(self.transfer_metric_mode.as_ref()),
        );
        raw.insert("hide_offline_nodes".into(), Value::from(self.hide_offline_nodes));
        for (key, color) in [
            ("line_color", &self.line_color),
            ("accent_color", &self.accent_color),
            ("text_dim_color", &self.text_dim_color),
            ("master_panel_start_color", &self.master_panel_start_color),
            ("master_panel_end_color", &self.master_panel_end_color),
        ] {
            raw.insert(key.into(), Value::from(color.as_str()));
        }
        raw.insert("font_scale_percent".into(), Value::from(self.font_scale_percent));
        for (key, value) in &self.extra {
            raw.insert(key.clone(), value.clone());
        }
        raw
    }
}

impl Serialize for CardConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_raw().serialize(serializer)
    }
}

// ── Field coercion ──────────────────────────────────────────────────

fn choice<T>(raw: &RawConfig, field: &'static str) -> Result<T, ConfigError>
where
    T: FromStr + Default + VariantNames,
{
    let invalid = |value: String| ConfigError::InvalidChoice {
        field,
        value,
        allowed: T::VARIANTS,
    };
    match raw.get(field) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(T::default()),
        Some(Value::String(s)) => s.trim().parse().map_err(|_| invalid(s.clone())),
        Some(other) => Err(invalid(other.to_string())),
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "on" | "1"
        ),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

fn font_scale(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|f| f.is_finite())
        .map_or(FONT_SCALE_DEFAULT, |f| f.clamp(FONT_SCALE_MIN, FONT_SCALE_MAX))
}
