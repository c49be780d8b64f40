//! Lookup table from effect identifiers to shader-spec constructors.
//!
//! The builder resolves effect ids (and aliases) here; the executor uses the entry to turn an
//! effect's free-form params into an [`EffectSpec`] for the renderer. Ids that are not registered
//! are skipped at execution time.

use crate::foundation::core::Viewport;
use crate::scene::params::{ParamMap, param_f32};
use smallvec::SmallVec;

/// Registered post-processing effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectType {
    /// Gaussian blur.
    Blur,
    /// Edge darkening.
    Vignette,
    /// RGB channel offset.
    ChromaticAberration,
    /// Dot halftone screen.
    DotHalftone,
    /// Line halftone screen.
    LineHalftone,
    /// Square-cell pixelation.
    Mosaic,
}

/// One tunable effect parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDef {
    /// Parameter name in scene JSON.
    pub name: &'static str,
    /// Value used when the scene omits the parameter.
    pub default: f32,
    /// Pixel lengths shrink with the preview scale.
    pub scales: bool,
}

const fn param(name: &'static str, default: f32) -> ParamDef {
    ParamDef {
        name,
        default,
        scales: false,
    }
}

const fn px(name: &'static str, default: f32) -> ParamDef {
    ParamDef {
        name,
        default,
        scales: true,
    }
}

/// Registry entry for one effect.
#[derive(Debug)]
pub struct EffectDefinition {
    /// Effect kind.
    pub kind: EffectType,
    /// Canonical persisted id.
    pub id: &'static str,
    /// Alternative ids accepted on read.
    pub aliases: &'static [&'static str],
    /// Shader entry point the renderer should run.
    pub shader: &'static str,
    /// Parameters in uniform order.
    pub params: &'static [ParamDef],
}

static EFFECT_DEFINITIONS: [EffectDefinition; 6] = [
    EffectDefinition {
        kind: EffectType::Blur,
        id: "blur",
        aliases: &[],
        shader: "fx_blur",
        params: &[px("radius", 8.0)],
    },
    EffectDefinition {
        kind: EffectType::Vignette,
        id: "vignette",
        aliases: &[],
        shader: "fx_vignette",
        params: &[
            param("intensity", 0.5),
            param("radius", 0.75),
            param("softness", 0.4),
            param("roundness", 1.0),
        ],
    },
    EffectDefinition {
        kind: EffectType::ChromaticAberration,
        id: "chromaticAberration",
        aliases: &["chromatic"],
        shader: "fx_chromatic_aberration",
        params: &[px("intensity", 3.0), param("angle", 0.0)],
    },
    EffectDefinition {
        kind: EffectType::DotHalftone,
        id: "dotHalftone",
        aliases: &["halftone"],
        shader: "fx_dot_halftone",
        params: &[px("dotSize", 6.0), px("spacing", 8.0), param("angle", 45.0)],
    },
    EffectDefinition {
        kind: EffectType::LineHalftone,
        id: "lineHalftone",
        aliases: &[],
        shader: "fx_line_halftone",
        params: &[px("lineWidth", 4.0), px("spacing", 8.0), param("angle", 45.0)],
    },
    EffectDefinition {
        kind: EffectType::Mosaic,
        id: "mosaic",
        aliases: &["pixelate"],
        shader: "fx_mosaic",
        params: &[px("cellSize", 12.0)],
    },
];

/// All registered effects, in canonical order.
pub fn definitions() -> &'static [EffectDefinition] {
    &EFFECT_DEFINITIONS
}

/// Find an effect by canonical id or alias.
pub fn lookup(id: &str) -> Option<&'static EffectDefinition> {
    EFFECT_DEFINITIONS
        .iter()
        .find(|d| d.id == id || d.aliases.contains(&id))
}

/// Position of an effect in canonical order, used when expanding legacy bundles.
pub(crate) fn canonical_rank(id: &str) -> Option<usize> {
    EFFECT_DEFINITIONS
        .iter()
        .position(|d| d.id == id || d.aliases.contains(&id))
}

/// Named uniform value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectUniform {
    /// Parameter name.
    pub name: &'static str,
    /// Resolved value.
    pub value: f32,
}

/// Fully-resolved effect pass handed to [`crate::RendererPort::apply_post_effect_to_texture`].
#[derive(Debug, Clone, PartialEq)]
pub struct EffectSpec {
    /// Effect kind.
    pub kind: EffectType,
    /// Shader entry point.
    pub shader: &'static str,
    /// Uniforms in definition order, defaults applied and preview scale folded in.
    pub uniforms: SmallVec<[EffectUniform; 4]>,
    /// Target dimensions.
    pub viewport: Viewport,
}

impl EffectSpec {
    /// Look up a uniform by name.
    pub fn uniform(&self, name: &str) -> Option<f32> {
        self.uniforms
            .iter()
            .find(|u| u.name == name)
            .map(|u| u.value)
    }
}

impl EffectDefinition {
    /// Build the shader spec for one effect instance.
    pub fn create_spec(&self, params: &ParamMap, viewport: Viewport, scale: f32) -> EffectSpec {
        let uniforms = self
            .params
            .iter()
            .map(|p| {
                let v = param_f32(params, p.name, p.default);
                EffectUniform {
                    name: p.name,
                    value: if p.scales { v * scale } else { v },
                }
            })
            .collect();
        EffectSpec {
            kind: self.kind,
            shader: self.shader,
            uniforms,
            viewport,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/registry.rs"]
mod tests;
