//! Semantic color resolution.
//!
//! Layers name colors either by primitive key or with the `auto` sentinel. `auto` resolves
//! against the palette's theme and the scene's semantic context, so the same preset reads well on
//! light and dark pages and inside tinted sections.

use crate::foundation::core::Rgba;
use crate::palette::color::oklch_to_rgba;
use crate::palette::primitive::{ColorRef, PrimitivePalette};
use crate::scene::model::SemanticContext;

/// Lightness offset between the context surface and midground pattern colors.
pub const MIDGROUND_SHIFT: f32 = 0.12;

/// What a color is used for; selects the `auto` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    /// Background pattern foreground.
    BackgroundPrimary,
    /// Background base fill.
    BackgroundSecondary,
    /// Surface or mask pattern foreground.
    SurfacePrimary,
    /// Surface or mask base fill.
    SurfaceSecondary,
    /// Text fill.
    Text,
}

/// Resolves [`ColorRef`]s against one palette and context.
#[derive(Debug, Clone, Copy)]
pub struct ColorResolver<'a> {
    palette: &'a PrimitivePalette,
    dark: bool,
    context: SemanticContext,
}

impl<'a> ColorResolver<'a> {
    /// Resolver for a palette in a semantic context.
    pub fn new(palette: &'a PrimitivePalette, context: SemanticContext) -> Self {
        Self {
            palette,
            dark: palette.is_dark(),
            context,
        }
    }

    /// Whether `auto` rules use their dark-theme variants.
    pub fn is_dark(&self) -> bool {
        self.dark
    }

    /// Resolve a reference for a role. Missing keys resolve to neutral gray.
    pub fn resolve(&self, color: &ColorRef, role: ColorRole) -> Rgba {
        match color {
            ColorRef::Key(key) => self.resolve_key(key),
            ColorRef::Auto => self.resolve_auto(role),
        }
    }

    /// Resolve an explicit primitive key.
    pub fn resolve_key(&self, key: &str) -> Rgba {
        match self.palette.get(key) {
            Some(c) => oklch_to_rgba(c, 1.0),
            None => {
                tracing::warn!(key, "palette key missing, using neutral gray");
                Rgba::neutral_gray(1.0)
            }
        }
    }

    fn resolve_auto(&self, role: ColorRole) -> Rgba {
        match role {
            ColorRole::BackgroundPrimary => self.resolve_key("B"),
            ColorRole::BackgroundSecondary => self.resolve_key(self.canvas_key()),
            ColorRole::SurfaceSecondary => self.resolve_key(self.context_key()),
            ColorRole::SurfacePrimary => self.midground(),
            ColorRole::Text => self.resolve_key(if self.dark { "F1" } else { "F8" }),
        }
    }

    /// Page canvas key for the theme.
    pub fn canvas_key(&self) -> &'static str {
        if self.dark { "F8" } else { "F1" }
    }

    /// Surface key for the semantic context and theme.
    pub fn context_key(&self) -> &'static str {
        match (self.context, self.dark) {
            (SemanticContext::Canvas, false) => "F1",
            (SemanticContext::Canvas, true) => "F8",
            (SemanticContext::SectionNeutral, false) => "F2",
            (SemanticContext::SectionNeutral, true) => "F7",
            (SemanticContext::SectionTint, false) => "Bt",
            (SemanticContext::SectionTint, true) => "Bs",
            (SemanticContext::SectionContrast, _) => "Bf",
        }
    }

    fn midground(&self) -> Rgba {
        let key = self.context_key();
        let Some(base) = self.palette.get(key) else {
            tracing::warn!(key, "palette key missing, using neutral gray");
            return Rgba::neutral_gray(1.0);
        };
        let delta = if self.dark {
            MIDGROUND_SHIFT
        } else {
            -MIDGROUND_SHIFT
        };
        oklch_to_rgba(base.shift_lightness(delta), 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/palette/resolve.rs"]
mod tests;
