use crate::foundation::core::Rgba;
use crate::scene::mask::{MaskGeometry, MaskShape};
use crate::scene::model::{Anchor, ImagePlacement};
use crate::scene::surface::SurfacePattern;

/// Everything a renderer needs to draw one leaf into a texture.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderSpec {
    /// Patterned or flat surface.
    Surface(SurfaceSpec),
    /// Greyscale mask shape.
    Mask(MaskSpec),
    /// Text run.
    Text(TextSpec),
    /// External image.
    Image(ImageSpec),
}

/// Surface pattern with resolved colors.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSpec {
    /// Typed pattern.
    pub pattern: SurfacePattern,
    /// Pattern foreground.
    pub primary: Rgba,
    /// Pattern background.
    pub secondary: Rgba,
}

/// Greymap drawn for a mask: `inner` inside the shape, `outer` outside.
///
/// The compositor reads luminance as alpha, so `1.0` keeps content and `0.0` removes it.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskSpec {
    /// Resolved shape.
    pub shape: MaskShape,
    /// Grey level inside the shape.
    pub inner: f32,
    /// Grey level outside the shape.
    pub outer: f32,
    /// Edge softness, normalized to the viewport.
    pub feather: f32,
}

impl MaskSpec {
    /// Greymap for a shape. The inner region is kept when exactly one of the shape's `cutout` and
    /// the modifier's `invert` is set.
    pub fn new(shape: MaskShape, invert: bool, feather: f32) -> Self {
        let keep_inner = shape.cutout != invert;
        let inner = if keep_inner { 1.0 } else { 0.0 };
        Self {
            shape,
            inner,
            outer: 1.0 - inner,
            feather,
        }
    }

    /// `true` when content inside the shape survives.
    pub fn keeps_inner(&self) -> bool {
        self.inner > self.outer
    }
}

/// Text run with resolved color.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpec {
    /// Content.
    pub text: String,
    /// CSS font family.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// CSS numeric weight.
    pub font_weight: u16,
    /// Extra tracking in em.
    pub letter_spacing: f32,
    /// Line height multiplier.
    pub line_height: f32,
    /// Fill.
    pub color: Rgba,
    /// Normalized position.
    pub x: f32,
    /// Normalized position.
    pub y: f32,
    /// Anchor of the text box at `(x, y)`.
    pub anchor: Anchor,
    /// Rotation in radians.
    pub rotation: f32,
}

/// Image reference and placement.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSpec {
    /// Opaque id resolved by the renderer.
    pub image_id: String,
    /// Normalized rectangle.
    pub placement: ImagePlacement,
}

impl RenderSpec {
    /// Copy with pixel lengths shrunk by the preview scale.
    pub fn scaled(&self, scale: f32) -> Self {
        match self {
            Self::Surface(s) => Self::Surface(SurfaceSpec {
                pattern: s.pattern.scaled(scale),
                ..s.clone()
            }),
            Self::Text(t) => Self::Text(TextSpec {
                font_size: t.font_size * scale,
                ..t.clone()
            }),
            Self::Mask(_) | Self::Image(_) => self.clone(),
        }
    }

    /// Stable 64-bit content hash; equal specs hash equally across runs.
    pub fn fingerprint(&self) -> u64 {
        xxhash_rust::xxh3::xxh3_64(format!("{self:?}").as_bytes())
    }

    /// Short description used in plan dumps and call logs.
    pub fn label(&self) -> String {
        match self {
            Self::Surface(s) => format!("surface:{}", pattern_name(&s.pattern)),
            Self::Mask(m) => format!(
                "mask:{} inner={} outer={}",
                geometry_name(&m.shape.geometry),
                m.inner,
                m.outer
            ),
            Self::Text(t) => format!("text:{:?}", t.text),
            Self::Image(i) => format!("image:{}", i.image_id),
        }
    }
}

fn pattern_name(p: &SurfacePattern) -> &'static str {
    match p {
        SurfacePattern::Solid => "solid",
        SurfacePattern::Stripe { .. } => "stripe",
        SurfacePattern::Grid { .. } => "grid",
        SurfacePattern::PolkaDot { .. } => "polkaDot",
        SurfacePattern::Checker { .. } => "checker",
        SurfacePattern::GradientGrain { .. } => "gradientGrain",
        SurfacePattern::Triangle { .. } => "triangle",
        SurfacePattern::Hexagon { .. } => "hexagon",
        SurfacePattern::Asanoha { .. } => "asanoha",
        SurfacePattern::Seigaiha { .. } => "seigaiha",
        SurfacePattern::Wave { .. } => "wave",
        SurfacePattern::Scales { .. } => "scales",
        SurfacePattern::Ogee { .. } => "ogee",
        SurfacePattern::Sunburst { .. } => "sunburst",
        SurfacePattern::Image { .. } => "image",
    }
}

fn geometry_name(g: &MaskGeometry) -> &'static str {
    match g {
        MaskGeometry::Circle { .. } => "circle",
        MaskGeometry::Rect { .. } => "rect",
        MaskGeometry::Blob { .. } => "blob",
        MaskGeometry::Perlin { .. } => "perlin",
        MaskGeometry::LinearGradient { .. } => "linearGradient",
        MaskGeometry::RadialGradient { .. } => "radialGradient",
        MaskGeometry::BoxGradient { .. } => "boxGradient",
    }
}

/// Two-input texture pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DualTextureSpec {
    /// Multiply the primary texture's alpha by the secondary texture's luminance.
    MaskAlpha,
    /// Draw the secondary texture over the primary with source-over alpha.
    AlphaOver,
}

impl DualTextureSpec {
    /// Shader entry point.
    pub fn shader(self) -> &'static str {
        match self {
            Self::MaskAlpha => "dual_mask_alpha",
            Self::AlphaOver => "dual_alpha_over",
        }
    }
}

/// Options for the final canvas composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasCompositeOpts {
    /// Clear the canvas before drawing.
    pub clear: bool,
}

impl Default for CanvasCompositeOpts {
    fn default() -> Self {
        Self { clear: true }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/spec.rs"]
mod tests;
