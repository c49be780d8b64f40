//! JSON persistence for scenes.
//!
//! Reads accept both legacy and normalized sub-layouts; writes are always normalized.

use crate::foundation::error::{HeroError, HeroResult};
use crate::scene::model::SceneConfig;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

impl SceneConfig {
    /// Parse and validate a scene from a JSON string.
    pub fn from_json_str(s: &str) -> HeroResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| HeroError::serde(format!("parse scene JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a scene from a reader.
    pub fn from_reader<R: Read>(reader: R) -> HeroResult<Self> {
        let cfg: Self = serde_json::from_reader(reader)
            .map_err(|e| HeroError::serde(format!("parse scene JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a scene file.
    pub fn from_path(path: &Path) -> HeroResult<Self> {
        let f = File::open(path).map_err(|e| {
            HeroError::Other(anyhow::anyhow!("open scene '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Pretty-printed JSON in the normalized layout.
    pub fn to_json_string(&self) -> HeroResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| HeroError::serde(format!("serialize scene JSON: {e}")))
    }
}

/// Holder for the current scene that can be snapshotted and restored from JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetStore {
    current: SceneConfig,
}

impl PresetStore {
    /// Store seeded with a scene.
    pub fn new(initial: SceneConfig) -> Self {
        Self { current: initial }
    }

    /// Current scene.
    pub fn current(&self) -> &SceneConfig {
        &self.current
    }

    /// Replace the current scene.
    pub fn set(&mut self, cfg: SceneConfig) {
        self.current = cfg;
    }

    /// Serialize the current scene.
    pub fn snapshot(&self) -> HeroResult<String> {
        self.current.to_json_string()
    }

    /// Replace the current scene with a parsed preset.
    ///
    /// Malformed or invalid input leaves the current scene untouched and returns `false`.
    pub fn restore(&mut self, json: &str) -> bool {
        match SceneConfig::from_json_str(json) {
            Ok(cfg) => {
                self.current = cfg;
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "ignoring malformed preset");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/preset.rs"]
mod tests;
