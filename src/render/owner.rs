use crate::foundation::core::Viewport;
use crate::foundation::error::HeroResult;
use crate::foundation::ids::TextureId;
use crate::render::port::RendererPort;

/// Lazily allocated texture owned by one node or pool slot.
#[derive(Debug, Default)]
pub struct TextureOwner {
    texture: Option<(TextureId, Viewport)>,
    dirty: bool,
}

impl TextureOwner {
    /// Empty owner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture of the requested size, reusing the current one when the size matches.
    ///
    /// A fresh allocation marks the owner dirty.
    pub fn ensure_texture<R: RendererPort + ?Sized>(
        &mut self,
        renderer: &mut R,
        size: Viewport,
    ) -> HeroResult<TextureId> {
        if let Some((id, current)) = self.texture
            && current == size
        {
            return Ok(id);
        }
        if let Some((old, _)) = self.texture.take() {
            renderer.destroy_texture(old);
        }
        let id = renderer.create_texture(size)?;
        self.texture = Some((id, size));
        self.dirty = true;
        Ok(id)
    }

    /// Current texture, if allocated.
    pub fn texture(&self) -> Option<TextureId> {
        self.texture.map(|(id, _)| id)
    }

    /// Contents need redrawing.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Force a redraw on next use.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Contents are current.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Release the texture.
    pub fn dispose<R: RendererPort + ?Sized>(&mut self, renderer: &mut R) {
        if let Some((id, _)) = self.texture.take() {
            renderer.destroy_texture(id);
        }
        self.dirty = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/owner.rs"]
mod tests;
