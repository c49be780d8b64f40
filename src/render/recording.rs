//! In-memory renderer that records every port call.
//!
//! Used by tests to assert execution order and by `hero-render trace` to print what a frame would
//! ask of a real renderer.

use crate::compile::spec::{CanvasCompositeOpts, DualTextureSpec, RenderSpec};
use crate::effects::registry::EffectSpec;
use crate::foundation::core::Viewport;
use crate::foundation::error::{HeroError, HeroResult};
use crate::foundation::ids::TextureId;
use crate::render::port::RendererPort;
use std::collections::BTreeMap;
use std::fmt;

/// One recorded port call.
#[derive(Debug, Clone, PartialEq)]
pub enum RendererCall {
    CreateTexture {
        texture: TextureId,
        size: Viewport,
    },
    DestroyTexture {
        texture: TextureId,
    },
    RenderToTexture {
        label: String,
        output: TextureId,
    },
    PostEffect {
        shader: &'static str,
        input: TextureId,
        output: TextureId,
    },
    DualTexture {
        spec: DualTextureSpec,
        primary: TextureId,
        secondary: TextureId,
        output: TextureId,
    },
    CompositeToCanvas {
        input: TextureId,
        clear: bool,
    },
}

/// Discriminant of [`RendererCall`], also used to pick a call to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    CreateTexture,
    DestroyTexture,
    RenderToTexture,
    PostEffect,
    DualTexture,
    CompositeToCanvas,
}

impl RendererCall {
    /// Discriminant.
    pub fn kind(&self) -> CallKind {
        match self {
            Self::CreateTexture { .. } => CallKind::CreateTexture,
            Self::DestroyTexture { .. } => CallKind::DestroyTexture,
            Self::RenderToTexture { .. } => CallKind::RenderToTexture,
            Self::PostEffect { .. } => CallKind::PostEffect,
            Self::DualTexture { .. } => CallKind::DualTexture,
            Self::CompositeToCanvas { .. } => CallKind::CompositeToCanvas,
        }
    }
}

impl fmt::Display for RendererCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateTexture { texture, size } => {
                write!(f, "create t{} {}x{}", texture.0, size.width, size.height)
            }
            Self::DestroyTexture { texture } => write!(f, "destroy t{}", texture.0),
            Self::RenderToTexture { label, output } => {
                write!(f, "render {label} -> t{}", output.0)
            }
            Self::PostEffect {
                shader,
                input,
                output,
            } => write!(f, "effect {shader} t{} -> t{}", input.0, output.0),
            Self::DualTexture {
                spec,
                primary,
                secondary,
                output,
            } => write!(
                f,
                "dual {} t{} t{} -> t{}",
                spec.shader(),
                primary.0,
                secondary.0,
                output.0
            ),
            Self::CompositeToCanvas { input, clear } => {
                write!(f, "composite t{} clear={clear}", input.0)
            }
        }
    }
}

/// Fake renderer that tracks live textures and logs calls.
///
/// Drawing into or reading from a texture that is not live is an error, which catches
/// use-after-destroy bugs in the executor.
#[derive(Debug)]
pub struct RecordingRenderer {
    viewport: Viewport,
    next_texture: u32,
    live: BTreeMap<TextureId, Viewport>,
    calls: Vec<RendererCall>,
    fail_on: Option<CallKind>,
}

impl RecordingRenderer {
    /// Renderer with a canvas of `viewport` device pixels.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            next_texture: 0,
            live: BTreeMap::new(),
            calls: Vec::new(),
            fail_on: None,
        }
    }

    /// Resize the canvas.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Fail every subsequent call of `kind` with a render error.
    pub fn fail_on(&mut self, kind: CallKind) {
        self.fail_on = Some(kind);
    }

    /// Stop injecting failures.
    pub fn clear_failure(&mut self) {
        self.fail_on = None;
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> &[RendererCall] {
        &self.calls
    }

    /// Forget recorded calls; live textures are kept.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of recorded calls of one kind.
    pub fn count(&self, kind: CallKind) -> usize {
        self.calls.iter().filter(|c| c.kind() == kind).count()
    }

    /// Textures currently allocated.
    pub fn live_textures(&self) -> usize {
        self.live.len()
    }

    /// Size of a live texture.
    pub fn texture_size(&self, texture: TextureId) -> Option<Viewport> {
        self.live.get(&texture).copied()
    }

    /// Recorded calls, one per line.
    pub fn log(&self) -> String {
        self.calls.iter().map(|c| format!("{c}\n")).collect()
    }

    fn check(&self, kind: CallKind, textures: &[TextureId]) -> HeroResult<()> {
        if self.fail_on == Some(kind) {
            return Err(HeroError::render(format!("injected failure on {kind:?}")));
        }
        if let Some(t) = textures.iter().find(|t| !self.live.contains_key(*t)) {
            return Err(HeroError::render(format!("texture t{} is not live", t.0)));
        }
        Ok(())
    }
}

impl RendererPort for RecordingRenderer {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn create_texture(&mut self, size: Viewport) -> HeroResult<TextureId> {
        self.check(CallKind::CreateTexture, &[])?;
        size.validate()?;
        let texture = TextureId(self.next_texture);
        self.next_texture += 1;
        self.live.insert(texture, size);
        self.calls.push(RendererCall::CreateTexture { texture, size });
        Ok(texture)
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        if self.live.remove(&texture).is_some() {
            self.calls.push(RendererCall::DestroyTexture { texture });
        }
    }

    fn render_to_texture(&mut self, spec: &RenderSpec, output: TextureId) -> HeroResult<()> {
        self.check(CallKind::RenderToTexture, &[output])?;
        self.calls.push(RendererCall::RenderToTexture {
            label: spec.label(),
            output,
        });
        Ok(())
    }

    fn apply_post_effect_to_texture(
        &mut self,
        effect: &EffectSpec,
        input: TextureId,
        output: TextureId,
    ) -> HeroResult<()> {
        self.check(CallKind::PostEffect, &[input, output])?;
        if input == output {
            return Err(HeroError::render("effect input and output alias"));
        }
        self.calls.push(RendererCall::PostEffect {
            shader: effect.shader,
            input,
            output,
        });
        Ok(())
    }

    fn apply_dual_texture_effect_to_texture(
        &mut self,
        spec: &DualTextureSpec,
        primary: TextureId,
        secondary: TextureId,
        output: TextureId,
    ) -> HeroResult<()> {
        self.check(CallKind::DualTexture, &[primary, secondary, output])?;
        if output == primary || output == secondary {
            return Err(HeroError::render("dual pass output aliases an input"));
        }
        self.calls.push(RendererCall::DualTexture {
            spec: *spec,
            primary,
            secondary,
            output,
        });
        Ok(())
    }

    fn composite_to_canvas(
        &mut self,
        input: TextureId,
        opts: &CanvasCompositeOpts,
    ) -> HeroResult<()> {
        self.check(CallKind::CompositeToCanvas, &[input])?;
        self.calls.push(RendererCall::CompositeToCanvas {
            input,
            clear: opts.clear,
        });
        Ok(())
    }
}
