use crate::compile::spec::{CanvasCompositeOpts, DualTextureSpec, RenderSpec};
use crate::effects::registry::EffectSpec;
use crate::foundation::core::Viewport;
use crate::foundation::error::{HeroError, HeroResult};
use crate::foundation::ids::TextureId;

/// Capabilities the executor needs from a GPU (or fake) renderer.
///
/// Every drawing call writes a texture the executor owns; none of them read and write the same
/// texture.
pub trait RendererPort {
    /// Current device-pixel size of the canvas.
    fn viewport(&self) -> Viewport;

    /// Allocate a texture of the given size.
    fn create_texture(&mut self, size: Viewport) -> HeroResult<TextureId>;

    /// Release a texture. Unknown ids are ignored.
    fn destroy_texture(&mut self, texture: TextureId);

    /// Draw a leaf into `output`, replacing its contents.
    fn render_to_texture(&mut self, spec: &RenderSpec, output: TextureId) -> HeroResult<()>;

    /// Draw a leaf into a renderer-managed offscreen slot.
    fn render_to_offscreen(&mut self, spec: &RenderSpec, slot: usize) -> HeroResult<()> {
        let _ = (spec, slot);
        Err(HeroError::render("render_to_offscreen is not supported"))
    }

    /// Run a single-input effect from `input` into `output`.
    fn apply_post_effect_to_texture(
        &mut self,
        effect: &EffectSpec,
        input: TextureId,
        output: TextureId,
    ) -> HeroResult<()>;

    /// Run a two-input pass into `output`.
    fn apply_dual_texture_effect_to_texture(
        &mut self,
        spec: &DualTextureSpec,
        primary: TextureId,
        secondary: TextureId,
        output: TextureId,
    ) -> HeroResult<()>;

    /// Draw `input` onto the visible canvas.
    fn composite_to_canvas(
        &mut self,
        input: TextureId,
        opts: &CanvasCompositeOpts,
    ) -> HeroResult<()>;

    /// Copy the visible canvas into `output`.
    fn copy_canvas_to_texture(&mut self, output: TextureId) -> HeroResult<()> {
        let _ = output;
        Err(HeroError::render("copy_canvas_to_texture is not supported"))
    }
}
