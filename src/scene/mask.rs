use crate::scene::params::{
    KindRepr, LegacyKindConfig, ParamMap, param_bool, param_f32, param_u32,
};
use serde::{Deserialize, Serialize};

/// Mask shape as stored in a scene.
///
/// Same dual layout as [`crate::SurfaceConfig`]: normalized `{id, params}` or legacy
/// `{type, ...params}` on read, normalized on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "KindRepr")]
pub struct MaskShapeConfig {
    /// Shape identifier (see [`MaskShapeKind`]).
    pub id: String,
    /// Shape parameters; positions and sizes are normalized to the viewport.
    #[serde(default)]
    pub params: ParamMap,
}

impl From<KindRepr> for MaskShapeConfig {
    fn from(repr: KindRepr) -> Self {
        let (id, params) = repr.into_parts();
        Self { id, params }
    }
}

impl MaskShapeConfig {
    /// Build a config with default parameters.
    pub fn new(kind: MaskShapeKind) -> Self {
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

    /// Circle at a normalized center.
    pub fn circle(center_x: f32, center_y: f32, radius: f32) -> Self {
        Self::new(MaskShapeKind::Circle)
            .with_param("centerX", center_x)
            .with_param("centerY", center_y)
            .with_param("radius", radius)
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
    pub fn kind(&self) -> Option<MaskShapeKind> {
        MaskShapeKind::from_id(&self.id)
    }
}

/// Known mask shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskShapeKind {
    /// Circle.
    Circle,
    /// Rounded, rotated rectangle.
    Rect,
    /// Noise-displaced circle.
    Blob,
    /// Thresholded perlin noise field.
    Perlin,
    /// Linear ramp.
    LinearGradient,
    /// Radial ramp.
    RadialGradient,
    /// Ramp inward from the viewport edges.
    BoxGradient,
}

impl MaskShapeKind {
    /// Every kind, in a stable order.
    pub const ALL: [Self; 7] = [
        Self::Circle,
        Self::Rect,
        Self::Blob,
        Self::Perlin,
        Self::LinearGradient,
        Self::RadialGradient,
        Self::BoxGradient,
    ];

    /// Persisted identifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Rect => "rect",
            Self::Blob => "blob",
            Self::Perlin => "perlin",
            Self::LinearGradient => "linearGradient",
            Self::RadialGradient => "radialGradient",
            Self::BoxGradient => "boxGradient",
        }
    }

    /// Parse a persisted identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    /// `cutout` value used when a config does not set one.
    pub fn default_cutout(self) -> bool {
        match self {
            Self::Circle | Self::Rect | Self::Blob | Self::Perlin => true,
            Self::LinearGradient | Self::RadialGradient | Self::BoxGradient => false,
        }
    }
}

/// Typed mask geometry, normalized to the viewport.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskGeometry {
    Circle {
        center_x: f32,
        center_y: f32,
        radius: f32,
    },
    Rect {
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        corner_radius: f32,
        rotation: f32,
    },
    Blob {
        center_x: f32,
        center_y: f32,
        base_radius: f32,
        amplitude: f32,
        octaves: u32,
        seed: u32,
    },
    Perlin {
        seed: u32,
        threshold: f32,
        scale: f32,
        octaves: u32,
    },
    LinearGradient {
        angle: f32,
        start_offset: f32,
        end_offset: f32,
    },
    RadialGradient {
        center_x: f32,
        center_y: f32,
        inner_radius: f32,
        outer_radius: f32,
        aspect: f32,
    },
    BoxGradient {
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        corner_radius: f32,
        curve: f32,
    },
}

/// A resolved mask shape: geometry plus which side of its boundary is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskShape {
    /// Shape geometry.
    pub geometry: MaskGeometry,
    /// `true` keeps the inner region and makes the outside see-through.
    pub cutout: bool,
}

impl MaskShape {
    /// Resolve a config; unknown shape ids resolve to `None` (no mask).
    pub fn from_config(config: &MaskShapeConfig) -> Option<Self> {
        let Some(kind) = config.kind() else {
            tracing::warn!(shape = %config.id, "unknown mask shape, rendering unmasked");
            return None;
        };
        let p = &config.params;
        let geometry = match kind {
            MaskShapeKind::Circle => MaskGeometry::Circle {
                center_x: param_f32(p, "centerX", 0.5),
                center_y: param_f32(p, "centerY", 0.5),
                radius: param_f32(p, "radius", 0.3),
            },
            MaskShapeKind::Rect => MaskGeometry::Rect {
                left: param_f32(p, "left", 0.2),
                right: param_f32(p, "right", 0.8),
                top: param_f32(p, "top", 0.2),
                bottom: param_f32(p, "bottom", 0.8),
                corner_radius: param_f32(p, "radius", 0.0),
                rotation: param_f32(p, "rotation", 0.0),
            },
            MaskShapeKind::Blob => MaskGeometry::Blob {
                center_x: param_f32(p, "centerX", 0.5),
                center_y: param_f32(p, "centerY", 0.5),
                base_radius: param_f32(p, "baseRadius", 0.3),
                amplitude: param_f32(p, "amplitude", 0.08),
                octaves: param_u32(p, "octaves", 2),
                seed: param_u32(p, "seed", 0),
            },
            MaskShapeKind::Perlin => MaskGeometry::Perlin {
                seed: param_u32(p, "seed", 12345),
                threshold: param_f32(p, "threshold", 0.5),
                scale: param_f32(p, "scale", 4.0),
                octaves: param_u32(p, "octaves", 4),
            },
            MaskShapeKind::LinearGradient => MaskGeometry::LinearGradient {
                angle: param_f32(p, "angle", 0.0),
                start_offset: param_f32(p, "startOffset", 0.0),
                end_offset: param_f32(p, "endOffset", 1.0),
            },
            MaskShapeKind::RadialGradient => MaskGeometry::RadialGradient {
                center_x: param_f32(p, "centerX", 0.5),
                center_y: param_f32(p, "centerY", 0.5),
                inner_radius: param_f32(p, "innerRadius", 0.0),
                outer_radius: param_f32(p, "outerRadius", 0.5),
                aspect: param_f32(p, "aspectRatio", 1.0),
            },
            MaskShapeKind::BoxGradient => MaskGeometry::BoxGradient {
                left: param_f32(p, "left", 0.1),
                right: param_f32(p, "right", 0.1),
                top: param_f32(p, "top", 0.1),
                bottom: param_f32(p, "bottom", 0.1),
                corner_radius: param_f32(p, "cornerRadius", 0.0),
                curve: param_f32(p, "curve", 1.0),
            },
        };
        Some(Self {
            geometry,
            cutout: param_bool(p, "cutout", kind.default_cutout()),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/mask.rs"]
mod tests;
