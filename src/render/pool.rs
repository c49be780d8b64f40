use crate::foundation::core::Viewport;
use crate::foundation::error::HeroResult;
use crate::foundation::ids::TextureId;
use crate::render::owner::TextureOwner;
use crate::render::port::RendererPort;

/// Offscreen slots effect chains and overlays ping-pong through.
#[derive(Debug)]
pub struct OffscreenPool {
    slots: Vec<TextureOwner>,
    stats: PoolStats,
}

/// Pool counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Slots currently held.
    pub slots: usize,
    /// Times the pool had to add slots.
    pub grown: u64,
    /// Slot textures allocated, including reallocations after resizes.
    pub allocations: u64,
}

impl Default for OffscreenPool {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SLOTS)
    }
}

impl OffscreenPool {
    /// Slots held up front.
    pub const DEFAULT_SLOTS: usize = 2;

    /// Pool with `slots` empty slots.
    pub fn new(slots: usize) -> Self {
        Self {
            slots: (0..slots).map(|_| TextureOwner::new()).collect(),
            stats: PoolStats {
                slots,
                ..PoolStats::default()
            },
        }
    }

    /// Counters.
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Grow to at least `count` slots.
    pub fn reserve(&mut self, count: usize) {
        if count <= self.slots.len() {
            return;
        }
        tracing::debug!(from = self.slots.len(), to = count, "growing offscreen pool");
        self.slots.resize_with(count, TextureOwner::new);
        self.stats.slots = count;
        self.stats.grown += 1;
    }

    /// Texture for `slot`, sized to `size`. Grows the pool when `slot` is past the end.
    pub fn slot<R: RendererPort + ?Sized>(
        &mut self,
        renderer: &mut R,
        slot: usize,
        size: Viewport,
    ) -> HeroResult<TextureId> {
        self.reserve(slot + 1);
        let owner = &mut self.slots[slot];
        let id = owner.ensure_texture(renderer, size)?;
        if owner.is_dirty() {
            self.stats.allocations += 1;
        }
        owner.mark_clean();
        Ok(id)
    }

    /// Release every slot texture; the slots themselves stay.
    pub fn dispose<R: RendererPort + ?Sized>(&mut self, renderer: &mut R) {
        for owner in &mut self.slots {
            owner.dispose(renderer);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pool.rs"]
mod tests;
