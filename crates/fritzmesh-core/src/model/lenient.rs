// ── Lenient field decoding ──
//
// The payload is produced by an external state machine and arrives on every
// update tick. Numbers show up as strings, negative sentinels or null, and
// list entries are occasionally not objects at all. These `deserialize_with`
// helpers never fail: unusable values decode as absent and malformed list
// entries are dropped with a warning. Objects carrying a field under both its
// wire name and a legacy alias are collapsed to one name before decoding.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Wire names paired with the legacy aliases serde also accepts for them.
pub(crate) trait WireAliases {
    const ALIASES: &'static [(&'static str, &'static [&'static str])];
}

/// Keep each aliased field under exactly one name: the wire name when it
/// carries a value, else the first alias that does.
pub(crate) fn canonicalize<T: WireAliases>(value: &mut Value) {
    let Value::Object(map) = value else {
        return;
    };
    for &(wire, aliases) in T::ALIASES {
        let names = || std::iter::once(wire).chain(aliases.iter().copied());
        let keep = names().find(|name| has_value(map, name));
        let mut dropped = 0_usize;
        for name in names() {
            if Some(name) != keep && map.remove(name).is_some_and(|v| !v.is_null()) {
                dropped += 1;
            }
        }
        if dropped > 0 {
            debug!(field = wire, dropped, "duplicate payload field collapsed");
        }
    }
}

fn has_value(map: &Map<String, Value>, name: &str) -> bool {
    map.get(name).is_some_and(|v| !v.is_null())
}

/// Decode a non-negative rate in kbit/s. Anything unusable becomes `None`.
pub(crate) fn rate<'de, D>(de: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(de)?;
    Ok(value.as_ref().and_then(rate_from_value))
}

/// Decode a free-form text field. Numbers are stringified, blanks are absent.
pub(crate) fn text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(de)?;
    Ok(value.as_ref().and_then(text_from_value))
}

/// Decode a list, keeping only the entries that decode as `T`.
pub(crate) fn list<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + WireAliases,
{
    let value = Option::<Value>::deserialize(de)?;
    let items = match value {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(other) => {
            warn!(kind = value_kind(&other), "expected a list in payload, ignoring");
            return Ok(Vec::new());
        }
    };

    let mut out = Vec::with_capacity(items.len());
    for (index, mut item) in items.into_iter().enumerate() {
        canonicalize::<T>(&mut item);
        match serde_json::from_value::<T>(item) {
            Ok(decoded) => out.push(decoded),
            Err(e) => warn!(index, error = %e, "dropping malformed payload entry"),
        }
    }
    Ok(out)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub(crate) fn rate_from_value(value: &Value) -> Option<u64> {
    let from_float = |f: f64| (f.is_finite() && f >= 0.0).then(|| f.round() as u64);
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(from_float)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<u64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(from_float))
        }
        _ => None,
    }
}

pub(crate) fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
