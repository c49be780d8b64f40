//! Scene-to-pipeline compiler.
//!
//! The builder walks the visible layer tree once, resolving colors and mask/effect settings into
//! concrete node payloads. Every processor is routed through [`targets`] so that the same targeting
//! rule decides applicability at the root and inside groups.

use crate::compile::graph::{Arena, EffectStep, NodeKind, Pipeline, StepTarget};
use crate::compile::spec::{
    DualTextureSpec, ImageSpec, MaskSpec, RenderSpec, SurfaceSpec, TextSpec,
};
use crate::compile::targeting::targets;
use crate::effects::registry;
use crate::foundation::error::{BuildError, HeroResult};
use crate::foundation::ids::{NodeId, NodeIndex};
use crate::palette::primitive::{ColorRef, PrimitivePalette};
use crate::palette::resolve::{ColorResolver, ColorRole};
use crate::scene::mask::MaskShape;
use crate::scene::model::{
    BACKGROUND_GROUP_ID, BACKGROUND_SURFACE_ID, GroupLayer, LayerNode, ProcessorLayer,
    SceneConfig, SurfaceLayer,
};
use crate::scene::modifier::{EffectConfig, Modifier};
use crate::scene::surface::SurfacePattern;
use smallvec::SmallVec;
use std::collections::HashSet;

/// Number of offscreen slots effect chains and overlays alternate between.
const PING_PONG_SLOTS: usize = 2;

/// Compile a scene into a render pipeline.
///
/// The config is never mutated; building twice from equal inputs yields identical pipelines.
#[tracing::instrument(skip_all, fields(layers = config.layers.len()))]
pub fn build_pipeline(config: &SceneConfig, palette: &PrimitivePalette) -> HeroResult<Pipeline> {
    if config.layers.is_empty() {
        return Err(BuildError::EmptyLayers.into());
    }
    config.viewport.validate()?;

    let mut b = Builder {
        arena: Arena::default(),
        colors: ColorResolver::new(palette, config.colors.semantic_context),
        used_ids: HashSet::new(),
    };

    let roots = visible(&config.layers);
    let siblings = roots.iter().map(|(_, n)| *n).collect::<Vec<_>>();
    let background = find_background(&roots);

    let mut layers = Vec::new();
    if let Some(bg) = &background {
        if let Some(idx) = b.build_background(bg)? {
            layers.push(idx);
        }
    }

    for (pos, (orig, node)) in roots.iter().enumerate() {
        if background.as_ref().is_some_and(|bg| bg.root_pos == pos) {
            continue;
        }
        let key = node_key(node, "root", *orig);
        match node {
            LayerNode::Processor(_) => {}
            LayerNode::Group(g) => {
                if let Some(idx) = b.build_group(g, &key)? {
                    layers.push(idx);
                }
            }
            leaf => layers.extend(b.render_leaf(leaf, &key, Roles::SURFACE)),
        }
    }

    if layers.is_empty() {
        return Err(BuildError::NothingToRender {
            layer_count: config.layers.len(),
        }
        .into());
    }

    let mut last = b.combine(layers, NodeId::named("scene"));
    for (pos, (orig, node)) in roots.iter().enumerate() {
        let LayerNode::Processor(p) = node else {
            continue;
        };
        let key = node_key(node, "root", *orig);
        if targets(&siblings, pos, true).is_empty() {
            tracing::debug!(processor = %key, "root processor has no target, skipped");
            continue;
        }
        last = b.apply_processor(p, &key, last);
    }

    let output = b.push(NodeId::named("output"), NodeKind::Output, [last]);
    let pipeline = b.arena.finish(output, config.viewport);
    tracing::debug!(nodes = pipeline.len(), "pipeline built");
    Ok(pipeline)
}

#[derive(Clone, Copy)]
struct Roles {
    primary: ColorRole,
    secondary: ColorRole,
}

impl Roles {
    const SURFACE: Self = Self {
        primary: ColorRole::SurfacePrimary,
        secondary: ColorRole::SurfaceSecondary,
    };
    const BACKGROUND: Self = Self {
        primary: ColorRole::BackgroundPrimary,
        secondary: ColorRole::BackgroundSecondary,
    };
}

struct Background<'a> {
    /// Position in the visible root list.
    root_pos: usize,
    /// Enclosing group and its key, absent for the legacy root-level `base` form.
    group: Option<(&'a GroupLayer, String)>,
    /// The canvas surface itself.
    surface: &'a LayerNode,
    /// Position of `surface` among the group's visible children.
    child_pos: usize,
}

fn visible(nodes: &[LayerNode]) -> Vec<(usize, &LayerNode)> {
    nodes.iter().enumerate().filter(|(_, n)| n.is_visible()).collect()
}

fn find_background<'a>(roots: &[(usize, &'a LayerNode)]) -> Option<Background<'a>> {
    let group_with = |matches: &dyn Fn(&GroupLayer) -> bool| {
        roots.iter().enumerate().find_map(|(pos, &(orig, n))| match n {
            LayerNode::Group(g) if matches(g) => Some((pos, node_key(n, "root", orig), g)),
            _ => None,
        })
    };
    let group = group_with(&|g| g.meta.id == BACKGROUND_GROUP_ID)
        .or_else(|| group_with(&|g| g.meta.name == BACKGROUND_GROUP_ID));

    if let Some((root_pos, key, g)) = group {
        let child = g
            .children
            .iter()
            .filter(|c| c.is_visible())
            .enumerate()
            .find(|(_, c)| match c {
                LayerNode::Surface(s) | LayerNode::Base(s) => {
                    s.meta.id == BACKGROUND_SURFACE_ID || s.meta.name == BACKGROUND_SURFACE_ID
                }
                _ => false,
            });
        if let Some((child_pos, surface)) = child {
            return Some(Background {
                root_pos,
                group: Some((g, key)),
                surface,
                child_pos,
            });
        }
    }

    roots.iter().enumerate().find_map(|(root_pos, &(_, n))| match n {
        LayerNode::Base(_) => Some(Background {
            root_pos,
            group: None,
            surface: n,
            child_pos: 0,
        }),
        _ => None,
    })
}

fn node_key(node: &LayerNode, parent: &str, index: usize) -> String {
    let id = &node.meta().id;
    if id.is_empty() {
        format!("{parent}[{index}]")
    } else {
        id.clone()
    }
}

struct Builder<'a> {
    arena: Arena,
    colors: ColorResolver<'a>,
    used_ids: HashSet<NodeId>,
}

impl Builder<'_> {
    fn push(
        &mut self,
        id: NodeId,
        kind: NodeKind,
        inputs: impl IntoIterator<Item = NodeIndex>,
    ) -> NodeIndex {
        let id = self.unique(id);
        self.arena.push(id, kind, inputs)
    }

    /// Suffix colliding ids so each node keeps its own cache slot.
    fn unique(&mut self, id: NodeId) -> NodeId {
        if self.used_ids.insert(id.clone()) {
            return id;
        }
        let mut n = 2usize;
        loop {
            let candidate = NodeId::named(&format!("{id}~{n}"));
            if self.used_ids.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    fn build_background(&mut self, bg: &Background<'_>) -> HeroResult<Option<NodeIndex>> {
        let Some((group, key)) = &bg.group else {
            return Ok(self.render_background(bg.surface));
        };
        self.build_children(&group.children, key, Some(bg.child_pos))
    }

    fn render_background(&mut self, node: &LayerNode) -> Option<NodeIndex> {
        self.render_leaf(node, BACKGROUND_SURFACE_ID, Roles::BACKGROUND)
    }

    fn build_group(&mut self, group: &GroupLayer, key: &str) -> HeroResult<Option<NodeIndex>> {
        self.build_children(&group.children, key, None)
    }

    /// Sequential accumulator walk over one group's visible children.
    fn build_children(
        &mut self,
        children: &[LayerNode],
        group_key: &str,
        background_pos: Option<usize>,
    ) -> HeroResult<Option<NodeIndex>> {
        let list = visible(children);
        let siblings = list.iter().map(|(_, n)| *n).collect::<Vec<_>>();
        let mut acc: Vec<NodeIndex> = Vec::new();

        for (pos, (orig, child)) in list.iter().enumerate() {
            let key = node_key(child, group_key, *orig);
            if background_pos == Some(pos) {
                acc.extend(self.render_background(child));
                continue;
            }
            match child {
                LayerNode::Group(g) => {
                    if let Some(idx) = self.build_group(g, &key)? {
                        acc.push(idx);
                    }
                }
                LayerNode::Processor(p) => {
                    if targets(&siblings, pos, false).is_empty() || acc.is_empty() {
                        tracing::debug!(processor = %key, "processor has no target, skipped");
                        continue;
                    }
                    let pending = std::mem::take(&mut acc);
                    let input = self.combine(pending, NodeId::new("overlay", &key));
                    acc.push(self.apply_processor(p, &key, input));
                }
                leaf => acc.extend(self.render_leaf(leaf, &key, Roles::SURFACE)),
            }
        }

        if acc.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.combine(acc, NodeId::new("group", group_key))))
    }

    /// One input passes through; two or more are stacked by an overlay node.
    fn combine(&mut self, inputs: Vec<NodeIndex>, id: NodeId) -> NodeIndex {
        if let [only] = inputs[..] {
            return only;
        }
        let slots = (0..inputs.len().saturating_sub(2))
            .map(|i| i % PING_PONG_SLOTS)
            .collect::<SmallVec<_>>();
        self.push(id, NodeKind::Overlay { slots }, inputs)
    }

    /// Mask compositor (first enabled mask with a known shape), then the effect chain.
    fn apply_processor(&mut self, p: &ProcessorLayer, key: &str, input: NodeIndex) -> NodeIndex {
        let mut current = input;

        let mask = p.modifiers.iter().find_map(|m| match m {
            Modifier::Mask(mask) if mask.enabled => mask
                .shape
                .as_ref()
                .and_then(MaskShape::from_config)
                .map(|shape| MaskSpec::new(shape, mask.invert, mask.feather)),
            _ => None,
        });
        if let Some(spec) = mask {
            let grey = self.push(
                NodeId::new("mask", key),
                NodeKind::Render(RenderSpec::Mask(spec)),
                [],
            );
            current = self.push(
                NodeId::new("masked", key),
                NodeKind::MaskComposite(DualTextureSpec::MaskAlpha),
                [current, grey],
            );
        }

        let effects = p
            .modifiers
            .iter()
            .filter_map(|m| match m {
                Modifier::Effect(e) => Some(e.clone()),
                Modifier::Mask(_) => None,
            })
            .collect::<Vec<_>>();
        if !effects.is_empty() {
            let steps = plan_effect_steps(effects);
            current = self.push(
                NodeId::new("effects", key),
                NodeKind::EffectChain(steps),
                [current],
            );
        }
        current
    }

    /// Render node for a leaf; `None` for groups and processors.
    fn render_leaf(&mut self, node: &LayerNode, key: &str, roles: Roles) -> Option<NodeIndex> {
        let spec = self.leaf_spec(node, roles)?;
        Some(self.push(NodeId::new("render", key), NodeKind::Render(spec), []))
    }

    fn leaf_spec(&self, node: &LayerNode, roles: Roles) -> Option<RenderSpec> {
        let spec = match node {
            LayerNode::Base(s) | LayerNode::Surface(s) => self.surface_spec(s, roles),
            LayerNode::Text(t) => RenderSpec::Text(TextSpec {
                text: t.text.clone(),
                font_family: t.font_family.clone(),
                font_size: t.font_size,
                font_weight: t.font_weight,
                letter_spacing: t.letter_spacing,
                line_height: t.line_height,
                color: self.colors.resolve(&t.color, ColorRole::Text),
                x: t.position.x,
                y: t.position.y,
                anchor: t.position.anchor,
                rotation: t.rotation,
            }),
            LayerNode::Image(i) => RenderSpec::Image(ImageSpec {
                image_id: i.image_id.clone(),
                placement: i.placement,
            }),
            LayerNode::Group(_) | LayerNode::Processor(_) => return None,
        };
        Some(spec)
    }

    fn surface_spec(&self, s: &SurfaceLayer, roles: Roles) -> RenderSpec {
        let (primary, secondary) = match &s.colors {
            Some(c) => (c.primary.clone(), c.secondary.clone()),
            None => (ColorRef::Auto, ColorRef::Auto),
        };
        RenderSpec::Surface(SurfaceSpec {
            pattern: SurfacePattern::from_config(&s.surface),
            primary: self.colors.resolve(&primary, roles.primary),
            secondary: self.colors.resolve(&secondary, roles.secondary),
        })
    }
}

/// Assign write targets: known effects alternate between pool slots and the last one writes the
/// node's own texture; unknown ids are skipped.
fn plan_effect_steps(effects: Vec<EffectConfig>) -> Vec<EffectStep> {
    let definitions = effects
        .iter()
        .map(|e| registry::lookup(&e.id))
        .collect::<Vec<_>>();
    let known = definitions.iter().filter(|d| d.is_some()).count();
    let mut seen = 0usize;
    effects
        .into_iter()
        .zip(definitions)
        .map(|(effect, definition)| {
            let target = match definition {
                None => {
                    tracing::warn!(effect = %effect.id, "unknown effect, skipped");
                    StepTarget::Skip
                }
                Some(_) => {
                    seen += 1;
                    if seen == known {
                        StepTarget::Output
                    } else {
                        StepTarget::Pool((seen - 1) % PING_PONG_SLOTS)
                    }
                }
            };
            EffectStep {
                effect,
                definition,
                target,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/compile/builder.rs"]
mod tests;
