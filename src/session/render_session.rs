use crate::compile::builder::build_pipeline;
use crate::compile::graph::Pipeline;
use crate::foundation::error::HeroResult;
use crate::palette::primitive::PrimitivePalette;
use crate::render::executor::{Executor, FrameStats, RenderOptions};
use crate::render::port::RendererPort;
use crate::scene::model::SceneConfig;

/// Build-then-execute front end that owns a renderer and its texture cache.
///
/// The pipeline is rebuilt from the config on every call. Node textures live in the session, so
/// repeated renders of an unchanged scene only re-run composite passes.
pub struct RenderSession<R: RendererPort> {
    renderer: R,
    executor: Executor,
    last_fingerprint: Option<u64>,
}

impl<R: RendererPort> RenderSession<R> {
    /// Session drawing through `renderer`.
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            executor: Executor::new(),
            last_fingerprint: None,
        }
    }

    /// Compile `config` and draw it to the renderer's canvas.
    pub fn render(
        &mut self,
        config: &SceneConfig,
        palette: &PrimitivePalette,
        opts: &RenderOptions,
    ) -> HeroResult<FrameStats> {
        let pipeline = build_pipeline(config, palette)?;
        self.render_pipeline(&pipeline, opts)
    }

    /// Draw an already compiled pipeline.
    pub fn render_pipeline(
        &mut self,
        pipeline: &Pipeline,
        opts: &RenderOptions,
    ) -> HeroResult<FrameStats> {
        let fingerprint = pipeline.fingerprint();
        if self.last_fingerprint != Some(fingerprint) {
            tracing::debug!(fingerprint, nodes = pipeline.len(), "pipeline changed");
        }
        let result = self.executor.execute(&mut self.renderer, pipeline, opts);
        self.last_fingerprint = result.is_ok().then_some(fingerprint);
        result
    }

    /// Fingerprint of the last successfully executed pipeline.
    pub fn last_fingerprint(&self) -> Option<u64> {
        self.last_fingerprint
    }

    /// Executor state (cache size, pool counters).
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Release every texture and hand the renderer back.
    pub fn dispose(mut self) -> R {
        self.executor.dispose(&mut self.renderer);
        self.renderer
    }
}

/// One-shot render: build, execute and release all textures.
pub fn render_hero_config<R: RendererPort + ?Sized>(
    renderer: &mut R,
    config: &SceneConfig,
    palette: &PrimitivePalette,
    opts: &RenderOptions,
) -> HeroResult<FrameStats> {
    let pipeline = build_pipeline(config, palette)?;
    let mut executor = Executor::new();
    let result = executor.execute(renderer, &pipeline, opts);
    executor.dispose(renderer);
    result
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;
