//! Pipeline interpreter.
//!
//! Nodes run in ascending arena order, restricted to those the output depends on. Each node writes
//! a texture it owns; effect chains and overlays stage intermediate results in the offscreen pool.
//! Render nodes keep their texture across frames and only redraw when their content changes.

use crate::compile::graph::{EffectStep, Node, NodeKind, Pipeline, StepTarget};
use crate::compile::spec::{CanvasCompositeOpts, DualTextureSpec, RenderSpec};
use crate::foundation::core::Viewport;
use crate::foundation::error::{HeroError, HeroResult};
use crate::foundation::ids::{NodeId, NodeIndex, TextureId};
use crate::render::owner::TextureOwner;
use crate::render::pool::{OffscreenPool, PoolStats};
use crate::render::port::RendererPort;
use std::collections::{HashMap, HashSet};

/// Per-frame execution options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Preview scale in `(0, 1]`; shrinks pattern, text and effect lengths.
    pub scale: f32,
    /// Clear the canvas before the final composite.
    pub clear: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            clear: true,
        }
    }
}

impl RenderOptions {
    /// Options with a preview scale.
    pub fn with_scale(scale: f32) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    /// Reject scales outside `(0, 1]`.
    pub fn validate(&self) -> HeroResult<()> {
        if !(self.scale.is_finite() && self.scale > 0.0 && self.scale <= 1.0) {
            return Err(HeroError::validation(format!(
                "render scale must be in (0, 1], got {}",
                self.scale
            )));
        }
        Ok(())
    }
}

/// Counters for one executed frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Nodes visited.
    pub nodes_executed: usize,
    /// Render nodes redrawn.
    pub renders: usize,
    /// Render nodes whose cached texture was reused.
    pub cache_hits: usize,
    /// Single-input effect passes issued.
    pub effect_passes: usize,
    /// Effect steps skipped for unknown ids.
    pub effects_skipped: usize,
    /// Two-input passes issued (masks and overlays).
    pub dual_passes: usize,
    /// Node textures released because their node left the pipeline.
    pub evicted: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ContentKey {
    fingerprint: u64,
    scale: f32,
}

#[derive(Debug, Default)]
struct NodeState {
    owner: TextureOwner,
    content: Option<ContentKey>,
}

/// Stateful executor holding node textures and the offscreen pool between frames.
#[derive(Debug, Default)]
pub struct Executor {
    nodes: HashMap<NodeId, NodeState>,
    pool: OffscreenPool,
}

impl Executor {
    /// Executor with an empty cache and the default pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offscreen pool counters.
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Number of nodes currently holding a texture.
    pub fn cached_nodes(&self) -> usize {
        self.nodes
            .values()
            .filter(|s| s.owner.texture().is_some())
            .count()
    }

    /// Drop cached content so every render node redraws next frame. Textures are kept.
    pub fn invalidate(&mut self) {
        for state in self.nodes.values_mut() {
            state.owner.mark_dirty();
            state.content = None;
        }
    }

    /// Run one frame.
    #[tracing::instrument(skip_all, fields(nodes = pipeline.len(), scale = opts.scale))]
    pub fn execute<R: RendererPort + ?Sized>(
        &mut self,
        renderer: &mut R,
        pipeline: &Pipeline,
        opts: &RenderOptions,
    ) -> HeroResult<FrameStats> {
        opts.validate()?;
        let size = renderer.viewport();
        size.validate()?;
        self.pool.reserve(pipeline.pool_slots());

        let live = pipeline.reachable();
        let mut stats = FrameStats {
            evicted: self.evict_stale(renderer, pipeline, &live),
            ..FrameStats::default()
        };

        let mut results: Vec<Option<TextureId>> = vec![None; pipeline.len()];
        for (i, node) in pipeline.nodes().iter().enumerate() {
            if !live[i] {
                continue;
            }
            let inputs = node
                .inputs
                .iter()
                .map(|idx| input_texture(&results, *idx, node))
                .collect::<HeroResult<Vec<_>>>()?;
            let frame = Frame {
                size,
                opts,
                inputs: &inputs,
            };
            results[i] = self.run_node(renderer, node, &frame, &mut stats)?;
            stats.nodes_executed += 1;
        }

        tracing::debug!(
            renders = stats.renders,
            cache_hits = stats.cache_hits,
            "frame executed"
        );
        Ok(stats)
    }

    /// Release every texture this executor holds.
    pub fn dispose<R: RendererPort + ?Sized>(&mut self, renderer: &mut R) {
        for state in self.nodes.values_mut() {
            state.owner.dispose(renderer);
        }
        self.nodes.clear();
        self.pool.dispose(renderer);
    }

    fn evict_stale<R: RendererPort + ?Sized>(
        &mut self,
        renderer: &mut R,
        pipeline: &Pipeline,
        live: &[bool],
    ) -> usize {
        let keep = pipeline
            .nodes()
            .iter()
            .zip(live)
            .filter(|(_, l)| **l)
            .map(|(n, _)| &n.id)
            .collect::<HashSet<_>>();
        let stale = self
            .nodes
            .keys()
            .filter(|id| !keep.contains(id))
            .cloned()
            .collect::<Vec<_>>();
        for id in &stale {
            if let Some(mut state) = self.nodes.remove(id) {
                tracing::debug!(node = %id, "disposing stale node texture");
                state.owner.dispose(renderer);
            }
        }
        stale.len()
    }

    fn owned_texture<R: RendererPort + ?Sized>(
        &mut self,
        renderer: &mut R,
        id: &NodeId,
        size: Viewport,
    ) -> HeroResult<(TextureId, &mut NodeState)> {
        let state = self.nodes.entry(id.clone()).or_default();
        let texture = state.owner.ensure_texture(renderer, size)?;
        Ok((texture, state))
    }

    fn run_node<R: RendererPort + ?Sized>(
        &mut self,
        renderer: &mut R,
        node: &Node,
        frame: &Frame<'_>,
        stats: &mut FrameStats,
    ) -> HeroResult<Option<TextureId>> {
        match &node.kind {
            NodeKind::Render(spec) => self
                .run_render(renderer, node, spec, frame, stats)
                .map(Some),
            NodeKind::MaskComposite(spec) => {
                let [content, grey] = frame.inputs[..] else {
                    return Err(arity(node, 2));
                };
                let (out, state) = self.owned_texture(renderer, &node.id, frame.size)?;
                renderer.apply_dual_texture_effect_to_texture(spec, content, grey, out)?;
                state.owner.mark_clean();
                stats.dual_passes += 1;
                Ok(Some(out))
            }
            NodeKind::EffectChain(steps) => {
                let [input] = frame.inputs[..] else {
                    return Err(arity(node, 1));
                };
                self.run_effects(renderer, node, steps, input, frame, stats)
                    .map(Some)
            }
            NodeKind::Overlay { slots } => {
                let [first, rest @ ..] = frame.inputs else {
                    return Err(arity(node, 2));
                };
                if rest.is_empty() {
                    return Ok(Some(*first));
                }
                let mut acc = *first;
                for (i, top) in rest.iter().enumerate() {
                    let out = if i + 1 == rest.len() {
                        let (out, state) = self.owned_texture(renderer, &node.id, frame.size)?;
                        state.owner.mark_clean();
                        out
                    } else {
                        let slot = slots
                            .get(i)
                            .copied()
                            .unwrap_or(i % OffscreenPool::DEFAULT_SLOTS);
                        self.pool.slot(renderer, slot, frame.size)?
                    };
                    renderer.apply_dual_texture_effect_to_texture(
                        &DualTextureSpec::AlphaOver,
                        acc,
                        *top,
                        out,
                    )?;
                    stats.dual_passes += 1;
                    acc = out;
                }
                Ok(Some(acc))
            }
            NodeKind::Output => {
                let [input] = frame.inputs[..] else {
                    return Err(arity(node, 1));
                };
                renderer.composite_to_canvas(
                    input,
                    &CanvasCompositeOpts {
                        clear: frame.opts.clear,
                    },
                )?;
                Ok(None)
            }
        }
    }

    fn run_render<R: RendererPort + ?Sized>(
        &mut self,
        renderer: &mut R,
        node: &Node,
        spec: &RenderSpec,
        frame: &Frame<'_>,
        stats: &mut FrameStats,
    ) -> HeroResult<TextureId> {
        let key = ContentKey {
            fingerprint: spec.fingerprint(),
            scale: frame.opts.scale,
        };
        let (out, state) = self.owned_texture(renderer, &node.id, frame.size)?;
        if !state.owner.is_dirty() && state.content == Some(key) {
            tracing::debug!(node = %node.id, "render cache hit");
            stats.cache_hits += 1;
            return Ok(out);
        }
        renderer.render_to_texture(&spec.scaled(frame.opts.scale), out)?;
        state.owner.mark_clean();
        state.content = Some(key);
        stats.renders += 1;
        Ok(out)
    }

    fn run_effects<R: RendererPort + ?Sized>(
        &mut self,
        renderer: &mut R,
        node: &Node,
        steps: &[EffectStep],
        input: TextureId,
        frame: &Frame<'_>,
        stats: &mut FrameStats,
    ) -> HeroResult<TextureId> {
        let mut current = input;
        for step in steps {
            let (definition, target) = match (step.definition, step.target) {
                (Some(d), StepTarget::Pool(_) | StepTarget::Output) => (d, step.target),
                _ => {
                    tracing::debug!(effect = %step.effect.id, "effect skipped");
                    stats.effects_skipped += 1;
                    continue;
                }
            };
            let out = match target {
                StepTarget::Pool(slot) => self.pool.slot(renderer, slot, frame.size)?,
                _ => {
                    let (out, state) = self.owned_texture(renderer, &node.id, frame.size)?;
                    state.owner.mark_clean();
                    out
                }
            };
            let spec = definition.create_spec(&step.effect.params, frame.size, frame.opts.scale);
            renderer.apply_post_effect_to_texture(&spec, current, out)?;
            stats.effect_passes += 1;
            current = out;
        }
        if current == input {
            tracing::debug!(node = %node.id, "no applicable effect, passing input through");
        }
        Ok(current)
    }
}

struct Frame<'a> {
    size: Viewport,
    opts: &'a RenderOptions,
    inputs: &'a [TextureId],
}

fn input_texture(
    results: &[Option<TextureId>],
    idx: NodeIndex,
    node: &Node,
) -> HeroResult<TextureId> {
    results
        .get(idx.as_usize())
        .copied()
        .flatten()
        .ok_or_else(|| {
            HeroError::render(format!(
                "node '{}' reads input #{} which produced no texture",
                node.id, idx.0
            ))
        })
}

fn arity(node: &Node, expected: usize) -> HeroError {
    HeroError::render(format!(
        "node '{}' expects {expected} input(s), got {}",
        node.id,
        node.inputs.len()
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/executor.rs"]
mod tests;
