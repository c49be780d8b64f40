use crate::compile::spec::{DualTextureSpec, RenderSpec};
use crate::effects::registry::EffectDefinition;
use crate::foundation::core::Viewport;
use crate::foundation::ids::{NodeId, NodeIndex};
use crate::scene::modifier::EffectConfig;
use smallvec::SmallVec;
use std::fmt::Write as _;

/// Compiled render graph.
///
/// Nodes live in an arena whose inputs always point at lower indices, so ascending index order is
/// a valid execution order.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub(crate) nodes: Vec<Node>,
    pub(crate) output: NodeIndex,
    pub(crate) viewport: Viewport,
    pub(crate) pool_slots: usize,
}

/// One graph node.
#[derive(Debug, Clone)]
pub struct Node {
    /// Stable id; keys the executor's texture cache.
    pub id: NodeId,
    /// Node behavior.
    pub kind: NodeKind,
    /// Upstream nodes, in the order the kind expects them.
    pub inputs: SmallVec<[NodeIndex; 4]>,
}

/// Node behaviors.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Draw a leaf into the node's texture.
    Render(RenderSpec),
    /// Inputs `[content, greymap]`; keeps content where the greymap is bright.
    MaskComposite(DualTextureSpec),
    /// One input run through effects in order.
    EffectChain(Vec<EffectStep>),
    /// Two or more inputs stacked bottom to top. `slots` are the pool slots for the
    /// intermediate results of the fold.
    Overlay {
        /// Pool slot per intermediate pass.
        slots: SmallVec<[usize; 4]>,
    },
    /// Composite the single input onto the canvas.
    Output,
}

/// Discriminant of [`NodeKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Render,
    MaskComposite,
    EffectChain,
    Overlay,
    Output,
}

impl NodeKind {
    /// Discriminant.
    pub fn tag(&self) -> NodeTag {
        match self {
            Self::Render(_) => NodeTag::Render,
            Self::MaskComposite(_) => NodeTag::MaskComposite,
            Self::EffectChain(_) => NodeTag::EffectChain,
            Self::Overlay { .. } => NodeTag::Overlay,
            Self::Output => NodeTag::Output,
        }
    }
}

/// One effect inside a chain.
#[derive(Debug, Clone)]
pub struct EffectStep {
    /// Effect as configured.
    pub effect: EffectConfig,
    /// Registry entry; `None` for ids the registry does not know.
    pub definition: Option<&'static EffectDefinition>,
    /// Where this step writes.
    pub target: StepTarget,
}

/// Write target of an effect step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepTarget {
    /// Not executed.
    Skip,
    /// Offscreen pool slot.
    Pool(usize),
    /// The chain node's own texture.
    Output,
}

impl Pipeline {
    /// Terminal output node.
    pub fn output(&self) -> NodeIndex {
        self.output
    }

    /// All nodes in execution order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node at an index.
    pub fn node(&self, idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(idx.as_usize())
    }

    /// Design-space viewport of the scene.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Offscreen pool slots the executor must provide.
    pub fn pool_slots(&self) -> usize {
        self.pool_slots
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when the arena is empty (never the case for built pipelines).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find a node by id.
    pub fn find(&self, id: &str) -> Option<(NodeIndex, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .find(|(_, n)| n.id == id)
            .map(|(i, n)| (NodeIndex(i as u32), n))
    }

    /// Ids of a node's inputs.
    pub fn input_ids(&self, idx: NodeIndex) -> Vec<&str> {
        self.node(idx)
            .map(|n| {
                n.inputs
                    .iter()
                    .filter_map(|i| self.node(*i))
                    .map(|i| i.id.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of nodes with a given tag.
    pub fn count(&self, tag: NodeTag) -> usize {
        self.nodes.iter().filter(|n| n.kind.tag() == tag).count()
    }

    /// Membership mask of the nodes the output depends on.
    pub(crate) fn reachable(&self) -> Vec<bool> {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![self.output];
        while let Some(idx) = stack.pop() {
            let i = idx.as_usize();
            if i >= seen.len() || seen[i] {
                continue;
            }
            seen[i] = true;
            stack.extend(self.nodes[i].inputs.iter().copied());
        }
        seen
    }

    /// Deterministic, line-oriented description of the graph.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "pipeline viewport={}x{} nodes={} output=#{} pool_slots={}",
            self.viewport.width,
            self.viewport.height,
            self.nodes.len(),
            self.output.0,
            self.pool_slots
        );
        for (i, n) in self.nodes.iter().enumerate() {
            let inputs = n
                .inputs
                .iter()
                .map(|x| format!("#{}", x.0))
                .collect::<Vec<_>>()
                .join(",");
            let _ = writeln!(out, "#{i} {} {} [{inputs}]", n.id, describe(&n.kind));
        }
        out
    }

    /// xxh3 hash of [`Self::dump`].
    pub fn fingerprint(&self) -> u64 {
        xxhash_rust::xxh3::xxh3_64(self.dump().as_bytes())
    }
}

fn describe(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Render(spec) => format!("render({})", spec.label()),
        NodeKind::MaskComposite(spec) => format!("maskComposite({})", spec.shader()),
        NodeKind::EffectChain(steps) => {
            let steps = steps
                .iter()
                .map(|s| match s.target {
                    StepTarget::Skip => format!("{}->skip", s.effect.id),
                    StepTarget::Pool(slot) => format!("{}->pool{slot}", s.effect.id),
                    StepTarget::Output => format!("{}->out", s.effect.id),
                })
                .collect::<Vec<_>>()
                .join(" ");
            format!("effectChain({steps})")
        }
        NodeKind::Overlay { slots } => format!("overlay(slots={slots:?})"),
        NodeKind::Output => "output".to_owned(),
    }
}

/// Append-only node arena used while building.
#[derive(Debug, Default)]
pub(crate) struct Arena {
    nodes: Vec<Node>,
    max_slot: Option<usize>,
}

impl Arena {
    pub(crate) fn push(
        &mut self,
        id: NodeId,
        kind: NodeKind,
        inputs: impl IntoIterator<Item = NodeIndex>,
    ) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        let inputs = inputs.into_iter().collect::<SmallVec<_>>();
        debug_assert!(inputs.iter().all(|i| *i < idx));
        self.note_slots(&kind);
        self.nodes.push(Node { id, kind, inputs });
        idx
    }

    fn note_slots(&mut self, kind: &NodeKind) {
        let used = match kind {
            NodeKind::EffectChain(steps) => steps
                .iter()
                .filter_map(|s| match s.target {
                    StepTarget::Pool(slot) => Some(slot),
                    _ => None,
                })
                .max(),
            NodeKind::Overlay { slots } => slots.iter().copied().max(),
            _ => None,
        };
        if let Some(slot) = used {
            self.max_slot = Some(self.max_slot.map_or(slot, |m| m.max(slot)));
        }
    }

    pub(crate) fn finish(self, output: NodeIndex, viewport: Viewport) -> Pipeline {
        Pipeline {
            nodes: self.nodes,
            output,
            viewport,
            pool_slots: self.max_slot.map_or(0, |m| m + 1),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/graph.rs"]
mod tests;
