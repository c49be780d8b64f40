use crate::effects::registry::canonical_rank;
use crate::scene::mask::MaskShapeConfig;
use crate::scene::params::ParamMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One entry of a processor's modifier list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Modifier {
    /// Clip the target through a greyscale mask shape.
    Mask(MaskModifier),
    /// Apply one registered post-processing effect.
    Effect(EffectConfig),
}

/// Mask modifier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskModifier {
    /// Disabled masks are ignored.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Shape; an enabled mask without a shape renders unmasked.
    #[serde(default)]
    pub shape: Option<MaskShapeConfig>,
    /// Flip the kept side on top of the shape's own `cutout`.
    #[serde(default)]
    pub invert: bool,
    /// Edge softness, normalized to the viewport.
    #[serde(default)]
    pub feather: f32,
}

fn default_enabled() -> bool {
    true
}

impl MaskModifier {
    /// Enabled mask with the given shape.
    pub fn new(shape: MaskShapeConfig) -> Self {
        Self {
            enabled: true,
            shape: Some(shape),
            invert: false,
            feather: 0.0,
        }
    }
}

/// Normalized effect entry: `{ "type": "effect", "id": "blur", "params": {...} }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectConfig {
    /// Registry id. Unregistered ids are kept and skipped when rendering.
    pub id: String,
    /// Effect parameters; missing entries take registry defaults.
    #[serde(default)]
    pub params: ParamMap,
}

impl EffectConfig {
    /// Effect with default parameters.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            params: ParamMap::new(),
        }
    }

    /// Builder-style parameter setter.
    pub fn with_param(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.to_owned(), value.into());
        self
    }
}

/// Legacy effect layout that bundled every effect type into one modifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyEffectBundle {
    /// Master switch for the whole bundle.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Per-effect settings keyed by effect id.
    #[serde(default)]
    pub config: BTreeMap<String, LegacyEffectEntry>,
}

/// One effect inside a [`LegacyEffectBundle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyEffectEntry {
    /// Per-effect switch.
    #[serde(default)]
    pub enabled: bool,
    /// Effect parameters, flattened next to `enabled`.
    #[serde(flatten)]
    pub params: ParamMap,
}

impl LegacyEffectBundle {
    /// Expand into one normalized entry per active effect.
    ///
    /// Registered effects come first in registry order, unregistered ones follow by id.
    pub fn normalize(&self) -> Vec<EffectConfig> {
        if !self.enabled {
            return Vec::new();
        }
        let mut active = self
            .config
            .iter()
            .filter(|(_, entry)| entry.enabled)
            .map(|(id, entry)| EffectConfig {
                id: id.clone(),
                params: entry.params.clone(),
            })
            .collect::<Vec<_>>();
        // BTreeMap iteration already orders by id, so a stable sort keeps that as the tiebreak.
        active.sort_by_key(|e| canonical_rank(&e.id).unwrap_or(usize::MAX));
        active
    }

    /// Bundle normalized entries back into the legacy layout. Later duplicates win.
    pub fn from_effects(effects: &[EffectConfig]) -> Self {
        let config = effects
            .iter()
            .map(|e| {
                (
                    e.id.clone(),
                    LegacyEffectEntry {
                        enabled: true,
                        params: e.params.clone(),
                    },
                )
            })
            .collect();
        Self {
            enabled: true,
            config,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EffectRepr {
    Normalized(EffectConfig),
    Legacy(LegacyEffectBundle),
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum ModifierRepr {
    Mask(MaskModifier),
    Effect(EffectRepr),
}

/// Read a modifier list, expanding legacy effect bundles in place.
pub(crate) fn deserialize_modifiers<'de, D>(deserializer: D) -> Result<Vec<Modifier>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<ModifierRepr>::deserialize(deserializer)?;
    let mut out = Vec::with_capacity(raw.len());
    for m in raw {
        match m {
            ModifierRepr::Mask(mask) => out.push(Modifier::Mask(mask)),
            ModifierRepr::Effect(EffectRepr::Normalized(e)) => out.push(Modifier::Effect(e)),
            ModifierRepr::Effect(EffectRepr::Legacy(bundle)) => {
                out.extend(bundle.normalize().into_iter().map(Modifier::Effect));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/modifier.rs"]
mod tests;
