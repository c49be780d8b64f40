use crate::foundation::error::{HeroError, HeroResult};
use crate::scene::model::ColorConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Every key a complete primitive palette carries.
pub const ALL_PRIMITIVE_KEYS: [&str; 38] = [
    "B", "Bt", "Bs", "Bf", "A", "At", "As", "Af", "BN0", "BN1", "BN2", "BN3", "BN4", "BN5", "BN6",
    "BN7", "BN8", "BN9", "AN0", "AN1", "AN2", "AN3", "AN4", "AN5", "AN6", "AN7", "AN8", "AN9",
    "F0", "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9",
];

/// Perceptual color: lightness in `[0, 1]`, chroma, hue in degrees.
///
/// Reads `{ "l": .., "c": .., "h": .. }` or `[l, c, h]`; writes the object form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "OklchRepr")]
pub struct Oklch {
    /// Lightness.
    pub l: f32,
    /// Chroma.
    pub c: f32,
    /// Hue in degrees.
    pub h: f32,
}

impl Oklch {
    /// Build a triple.
    pub const fn new(l: f32, c: f32, h: f32) -> Self {
        Self { l, c, h }
    }

    /// Copy with lightness shifted by `delta` and clamped to `[0, 1]`.
    pub fn shift_lightness(self, delta: f32) -> Self {
        Self {
            l: (self.l + delta).clamp(0.0, 1.0),
            ..self
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OklchRepr {
    Object { l: f32, c: f32, h: f32 },
    Array([f32; 3]),
}

impl From<OklchRepr> for Oklch {
    fn from(repr: OklchRepr) -> Self {
        match repr {
            OklchRepr::Object { l, c, h } | OklchRepr::Array([l, c, h]) => Self { l, c, h },
        }
    }
}

/// Light or dark theme tag supplied by the palette generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    /// Light UI.
    #[default]
    Light,
    /// Dark UI.
    Dark,
}

/// Generated palette: perceptual colors keyed by primitive key (`B`, `F0`, `BN3`, ...).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PrimitivePalette {
    /// Theme tag; used when `F0` is missing.
    #[serde(default)]
    pub theme: Theme,
    /// Colors by key.
    #[serde(default)]
    pub colors: BTreeMap<String, Oklch>,
}

impl PrimitivePalette {
    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<Oklch> {
        self.colors.get(key).copied()
    }

    /// Builder-style insert.
    pub fn with_color(mut self, key: &str, color: Oklch) -> Self {
        self.colors.insert(key.to_owned(), color);
        self
    }

    /// Dark when the lightest foundation step is itself dark.
    pub fn is_dark(&self) -> bool {
        match self.get("F0") {
            Some(f0) => f0.l < 0.5,
            None => self.theme == Theme::Dark,
        }
    }

    /// Keys from [`ALL_PRIMITIVE_KEYS`] this palette lacks.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        ALL_PRIMITIVE_KEYS
            .into_iter()
            .filter(|k| !self.colors.contains_key(*k))
            .collect()
    }

    /// Parse a palette from a JSON string.
    pub fn from_json_str(s: &str) -> HeroResult<Self> {
        serde_json::from_str(s).map_err(|e| HeroError::serde(format!("parse palette JSON: {e}")))
    }

    /// Parse a palette from a reader.
    pub fn from_reader<R: Read>(reader: R) -> HeroResult<Self> {
        serde_json::from_reader(reader)
            .map_err(|e| HeroError::serde(format!("parse palette JSON: {e}")))
    }

    /// Parse a palette file.
    pub fn from_path(path: &Path) -> HeroResult<Self> {
        let f = File::open(path).map_err(|e| {
            HeroError::Other(anyhow::anyhow!("open palette '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Deterministic stand-in palette derived from seed hues, for tooling without a generator.
    ///
    /// Foundation steps run from lightest (`F0`) to darkest (`F9`) in light themes and the other
    /// way round in dark themes.
    pub fn fallback(seeds: &ColorConfig, theme: Theme) -> Self {
        let mut colors = BTreeMap::new();
        let ramp = |i: usize| {
            let t = i as f32 / 9.0;
            match theme {
                Theme::Light => 0.97 - 0.82 * t,
                Theme::Dark => 0.15 + 0.82 * t,
            }
        };
        for (prefix, hue, chroma) in [
            ("BN", seeds.brand.hue, 0.03),
            ("AN", seeds.accent.hue, 0.03),
            ("F", seeds.foundation.hue, 0.01),
        ] {
            for i in 0..10 {
                colors.insert(format!("{prefix}{i}"), Oklch::new(ramp(i), chroma, hue));
            }
        }
        for (prefix, hue) in [("B", seeds.brand.hue), ("A", seeds.accent.hue)] {
            colors.insert(prefix.to_owned(), Oklch::new(0.62, 0.15, hue));
            colors.insert(format!("{prefix}t"), Oklch::new(0.92, 0.04, hue));
            colors.insert(format!("{prefix}s"), Oklch::new(0.38, 0.10, hue));
            colors.insert(format!("{prefix}f"), Oklch::new(0.25, 0.06, hue));
        }
        Self { theme, colors }
    }
}

/// Color reference stored on layers: the `auto` sentinel or an explicit palette key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColorRef {
    /// Resolve from theme and semantic context.
    #[default]
    Auto,
    /// Explicit primitive key.
    Key(String),
}

impl ColorRef {
    /// Sentinel spelling.
    pub const AUTO: &'static str = "auto";

    /// Explicit key reference.
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }
}

impl From<String> for ColorRef {
    fn from(s: String) -> Self {
        if s == Self::AUTO || s.is_empty() {
            Self::Auto
        } else {
            Self::Key(s)
        }
    }
}

impl From<ColorRef> for String {
    fn from(c: ColorRef) -> Self {
        match c {
            ColorRef::Auto => ColorRef::AUTO.to_owned(),
            ColorRef::Key(k) => k,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/palette/primitive.rs"]
mod tests;
