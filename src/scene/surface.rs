use crate::scene::params::{
    KindRepr, LegacyKindConfig, ParamMap, param_f32, param_string, param_u32,
};
use serde::{Deserialize, Serialize};

/// Surface descriptor as stored in a scene: a pattern kind plus its parameters.
///
/// Reads both `{ "id": "stripe", "params": {...} }` and the legacy
/// `{ "type": "stripe", ...params }` layout; always writes the former.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "KindRepr")]
pub struct SurfaceConfig {
    /// Pattern kind identifier (see [`SurfaceKind`]).
    pub id: String,
    /// Pattern parameters; missing entries take per-kind defaults.
    #[serde(default)]
    pub params: ParamMap,
}

impl From<KindRepr> for SurfaceConfig {
    fn from(repr: KindRepr) -> Self {
        let (id, params) = repr.into_parts();
        Self { id, params }
    }
}

impl SurfaceConfig {
    /// Build a config with no explicit parameters.
    pub fn new(kind: SurfaceKind) -> Self {
        Self {
            id: kind.id().to_owned(),
            params: ParamMap::new(),
        }
    }

    /// Builder-style parameter setter.
    pub fn with_param(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.to_owned(), value.into());
        self
    }

    /// Solid fill.
    pub fn solid() -> Self {
        Self::new(SurfaceKind::Solid)
    }

    /// Convert a legacy flat config into the normalized layout.
    pub fn from_legacy(legacy: &LegacyKindConfig) -> Self {
        Self {
            id: legacy.kind.clone(),
            params: legacy.params.clone(),
        }
    }

    /// Convert into the legacy flat layout.
    pub fn to_legacy(&self) -> LegacyKindConfig {
        LegacyKindConfig {
            kind: self.id.clone(),
            params: self.params.clone(),
        }
    }

    /// Typed kind, or `None` for identifiers this crate does not know.
    pub fn kind(&self) -> Option<SurfaceKind> {
        SurfaceKind::from_id(&self.id)
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self::solid()
    }
}

/// Known surface pattern kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// Flat primary color.
    Solid,
    /// Alternating parallel stripes.
    Stripe,
    /// Square grid lines.
    Grid,
    /// Staggered dots.
    PolkaDot,
    /// Checkerboard.
    Checker,
    /// Directional gradient with grain noise.
    GradientGrain,
    /// Triangle tiling.
    Triangle,
    /// Hexagon tiling.
    Hexagon,
    /// Asanoha (hemp leaf) pattern.
    Asanoha,
    /// Seigaiha (wave rings) pattern.
    Seigaiha,
    /// Sine waves.
    Wave,
    /// Fish-scale pattern.
    Scales,
    /// Ogee curves.
    Ogee,
    /// Radial rays.
    Sunburst,
    /// External image.
    Image,
}

impl SurfaceKind {
    /// Every kind, in a stable order.
    pub const ALL: [Self; 15] = [
        Self::Solid,
        Self::Stripe,
        Self::Grid,
        Self::PolkaDot,
        Self::Checker,
        Self::GradientGrain,
        Self::Triangle,
        Self::Hexagon,
        Self::Asanoha,
        Self::Seigaiha,
        Self::Wave,
        Self::Scales,
        Self::Ogee,
        Self::Sunburst,
        Self::Image,
    ];

    /// Persisted identifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Stripe => "stripe",
            Self::Grid => "grid",
            Self::PolkaDot => "polkaDot",
            Self::Checker => "checker",
            Self::GradientGrain => "gradientGrain",
            Self::Triangle => "triangle",
            Self::Hexagon => "hexagon",
            Self::Asanoha => "asanoha",
            Self::Seigaiha => "seigaiha",
            Self::Wave => "wave",
            Self::Scales => "scales",
            Self::Ogee => "ogee",
            Self::Sunburst => "sunburst",
            Self::Image => "image",
        }
    }

    /// Parse a persisted identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }
}

/// Typed, defaulted surface pattern handed to the renderer.
///
/// Lengths are in pixels and shrink with the preview scale; angles are in degrees.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfacePattern {
    /// Flat primary color.
    Solid,
    /// Stripes of `width1` (primary) and `width2` (secondary).
    Stripe { width1: f32, width2: f32, angle: f32 },
    /// Lines of `line_width` every `cell_size`.
    Grid { line_width: f32, cell_size: f32 },
    /// Dots of `dot_radius` every `spacing`; odd rows shift by `row_offset` of a cell.
    PolkaDot {
        dot_radius: f32,
        spacing: f32,
        row_offset: f32,
    },
    /// Squares of `cell_size`.
    Checker { cell_size: f32, angle: f32 },
    /// Gradient from primary to secondary along `angle`, with grain noise.
    GradientGrain {
        angle: f32,
        seed: u32,
        sparsity: f32,
        grain_scale: f32,
    },
    /// Triangles of edge `size`.
    Triangle { size: f32, angle: f32 },
    /// Hexagons of radius `size`.
    Hexagon { size: f32, angle: f32 },
    /// Asanoha cells of `size`.
    Asanoha { size: f32, line_width: f32 },
    /// Concentric rings of `radius`.
    Seigaiha {
        radius: f32,
        rings: u32,
        line_width: f32,
    },
    /// Sine waves.
    Wave {
        amplitude: f32,
        wavelength: f32,
        thickness: f32,
        angle: f32,
    },
    /// Overlapping scales of `size`.
    Scales { size: f32, overlap: f32, angle: f32 },
    /// Ogee cells.
    Ogee {
        width: f32,
        height: f32,
        line_width: f32,
    },
    /// Rays around a normalized center.
    Sunburst {
        rays: u32,
        center_x: f32,
        center_y: f32,
        twist: f32,
    },
    /// Opaque image reference.
    Image { image_id: String },
}

impl SurfacePattern {
    /// Resolve a config into a typed pattern.
    ///
    /// Unknown kinds, and image surfaces without an image id, fall back to [`Self::Solid`].
    pub fn from_config(config: &SurfaceConfig) -> Self {
        let p = &config.params;
        let Some(kind) = config.kind() else {
            tracing::warn!(kind = %config.id, "unknown surface kind, rendering solid");
            return Self::Solid;
        };
        match kind {
            SurfaceKind::Solid => Self::Solid,
            SurfaceKind::Stripe => Self::Stripe {
                width1: param_f32(p, "width1", 20.0),
                width2: param_f32(p, "width2", 20.0),
                angle: param_f32(p, "angle", 45.0),
            },
            SurfaceKind::Grid => Self::Grid {
                line_width: param_f32(p, "lineWidth", 1.0),
                cell_size: param_f32(p, "cellSize", 32.0),
            },
            SurfaceKind::PolkaDot => Self::PolkaDot {
                dot_radius: param_f32(p, "dotRadius", 8.0),
                spacing: param_f32(p, "spacing", 32.0),
                row_offset: param_f32(p, "rowOffset", 0.5),
            },
            SurfaceKind::Checker => Self::Checker {
                cell_size: param_f32(p, "cellSize", 24.0),
                angle: param_f32(p, "angle", 0.0),
            },
            SurfaceKind::GradientGrain => Self::GradientGrain {
                angle: param_f32(p, "angle", 90.0),
                seed: param_u32(p, "seed", 12345),
                sparsity: param_f32(p, "sparsity", 0.75),
                grain_scale: param_f32(p, "grainScale", 1.0),
            },
            SurfaceKind::Triangle => Self::Triangle {
                size: param_f32(p, "size", 32.0),
                angle: param_f32(p, "angle", 0.0),
            },
            SurfaceKind::Hexagon => Self::Hexagon {
                size: param_f32(p, "size", 24.0),
                angle: param_f32(p, "angle", 0.0),
            },
            SurfaceKind::Asanoha => Self::Asanoha {
                size: param_f32(p, "size", 48.0),
                line_width: param_f32(p, "lineWidth", 1.0),
            },
            SurfaceKind::Seigaiha => Self::Seigaiha {
                radius: param_f32(p, "radius", 24.0),
                rings: param_u32(p, "rings", 3),
                line_width: param_f32(p, "lineWidth", 2.0),
            },
            SurfaceKind::Wave => Self::Wave {
                amplitude: param_f32(p, "amplitude", 12.0),
                wavelength: param_f32(p, "wavelength", 48.0),
                thickness: param_f32(p, "thickness", 6.0),
                angle: param_f32(p, "angle", 0.0),
            },
            SurfaceKind::Scales => Self::Scales {
                size: param_f32(p, "size", 24.0),
                overlap: param_f32(p, "overlap", 0.5),
                angle: param_f32(p, "angle", 0.0),
            },
            SurfaceKind::Ogee => Self::Ogee {
                width: param_f32(p, "width", 48.0),
                height: param_f32(p, "height", 64.0),
                line_width: param_f32(p, "lineWidth", 2.0),
            },
            SurfaceKind::Sunburst => Self::Sunburst {
                rays: param_u32(p, "rays", 16),
                center_x: param_f32(p, "centerX", 0.5),
                center_y: param_f32(p, "centerY", 0.5),
                twist: param_f32(p, "twist", 0.0),
            },
            SurfaceKind::Image => match param_string(p, "imageId") {
                Some(image_id) => Self::Image { image_id },
                None => {
                    tracing::warn!("image surface without imageId, rendering solid");
                    Self::Solid
                }
            },
        }
    }

    /// Shrink pixel lengths by `scale`; angles, counts and normalized positions are kept.
    pub fn scaled(&self, scale: f32) -> Self {
        let s = |v: f32| v * scale;
        match self.clone() {
            Self::Stripe {
                width1,
                width2,
                angle,
            } => Self::Stripe {
                width1: s(width1),
                width2: s(width2),
                angle,
            },
            Self::Grid {
                line_width,
                cell_size,
            } => Self::Grid {
                line_width: s(line_width),
                cell_size: s(cell_size),
            },
            Self::PolkaDot {
                dot_radius,
                spacing,
                row_offset,
            } => Self::PolkaDot {
                dot_radius: s(dot_radius),
                spacing: s(spacing),
                row_offset,
            },
            Self::Checker { cell_size, angle } => Self::Checker {
                cell_size: s(cell_size),
                angle,
            },
            Self::GradientGrain {
                angle,
                seed,
                sparsity,
                grain_scale,
            } => Self::GradientGrain {
                angle,
                seed,
                sparsity,
                grain_scale: s(grain_scale),
            },
            Self::Triangle { size, angle } => Self::Triangle {
                size: s(size),
                angle,
            },
            Self::Hexagon { size, angle } => Self::Hexagon {
                size: s(size),
                angle,
            },
            Self::Asanoha { size, line_width } => Self::Asanoha {
                size: s(size),
                line_width: s(line_width),
            },
            Self::Seigaiha {
                radius,
                rings,
                line_width,
            } => Self::Seigaiha {
                radius: s(radius),
                rings,
                line_width: s(line_width),
            },
            Self::Wave {
                amplitude,
                wavelength,
                thickness,
                angle,
            } => Self::Wave {
                amplitude: s(amplitude),
                wavelength: s(wavelength),
                thickness: s(thickness),
                angle,
            },
            Self::Scales {
                size,
                overlap,
                angle,
            } => Self::Scales {
                size: s(size),
                overlap,
                angle,
            },
            Self::Ogee {
                width,
                height,
                line_width,
            } => Self::Ogee {
                width: s(width),
                height: s(height),
                line_width: s(line_width),
            },
            other @ (Self::Solid | Self::Sunburst { .. } | Self::Image { .. }) => other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/surface.rs"]
mod tests;
