use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form parameter object attached to surfaces, mask shapes and effects.
pub type ParamMap = serde_json::Map<String, Value>;

/// Legacy persisted shape of a surface or mask config: `{ "type": "<kind>", ...flattened params }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyKindConfig {
    /// Kind identifier (stored under `type`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Parameters, flattened next to `type`.
    #[serde(flatten)]
    pub params: ParamMap,
}

/// Accepts both the normalized `{id, params}` and the legacy `{type, ...}` layout.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum KindRepr {
    Normalized {
        id: String,
        #[serde(default)]
        params: ParamMap,
    },
    Legacy(LegacyKindConfig),
}

impl KindRepr {
    pub(crate) fn into_parts(self) -> (String, ParamMap) {
        match self {
            Self::Normalized { id, params } => (id, params),
            Self::Legacy(LegacyKindConfig { kind, params }) => (kind, params),
        }
    }
}

pub(crate) fn param_f32(params: &ParamMap, key: &str, default: f32) -> f32 {
    match params.get(key).and_then(Value::as_f64) {
        Some(v) if v.is_finite() => v as f32,
        _ => default,
    }
}

pub(crate) fn param_u32(params: &ParamMap, key: &str, default: u32) -> u32 {
    params
        .get(key)
        .and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
        })
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(default)
}

pub(crate) fn param_bool(params: &ParamMap, key: &str, default: bool) -> bool {
    params.get(key).and_then(Value::as_bool).unwrap_or(default)
}

pub(crate) fn param_string(params: &ParamMap, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
