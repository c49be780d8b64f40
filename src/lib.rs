//! hero-render compiles layered hero-image scenes into render graphs and executes them.
//!
//! The flow is:
//!
//! - Load a [`SceneConfig`] (legacy or normalized JSON) and a [`PrimitivePalette`]
//! - Compile them with [`build_pipeline`] into a [`Pipeline`] of render and composite nodes
//! - Execute the pipeline through an [`Executor`] against any [`RendererPort`]
//!
//! [`RenderSession`] bundles the last two steps and keeps node textures alive between frames.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod compile;
pub(crate) mod effects;
pub(crate) mod palette;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod session;

pub use crate::foundation::core::{Rgba, Viewport};
pub use crate::foundation::error::{BuildError, HeroError, HeroResult};
pub use crate::foundation::ids::{NodeId, NodeIndex, TextureId};

pub use crate::scene::mask::{MaskGeometry, MaskShape, MaskShapeConfig, MaskShapeKind};
pub use crate::scene::model::{
    Anchor, BACKGROUND_GROUP_ID, BACKGROUND_SURFACE_ID, ColorConfig, ForegroundConfig,
    ForegroundElement, ForegroundKind, GroupLayer, Hsv, ImageFit, ImageLayer, ImagePlacement,
    LayerColors, LayerNode, NodeMeta, ProcessorLayer, SceneConfig, SemanticContext, SurfaceLayer,
    TextLayer, TextPosition,
};
pub use crate::scene::modifier::{
    EffectConfig, LegacyEffectBundle, LegacyEffectEntry, MaskModifier, Modifier,
};
pub use crate::scene::params::{LegacyKindConfig, ParamMap};
pub use crate::scene::preset::PresetStore;
pub use crate::scene::surface::{SurfaceConfig, SurfaceKind, SurfacePattern};

pub use crate::palette::color::oklch_to_rgba;
pub use crate::palette::primitive::{ALL_PRIMITIVE_KEYS, ColorRef, Oklch, PrimitivePalette, Theme};
pub use crate::palette::resolve::{ColorResolver, ColorRole, MIDGROUND_SHIFT};

pub use crate::compile::builder::build_pipeline;
pub use crate::compile::graph::{EffectStep, Node, NodeKind, NodeTag, Pipeline, StepTarget};
pub use crate::compile::spec::{
    CanvasCompositeOpts, DualTextureSpec, ImageSpec, MaskSpec, RenderSpec, SurfaceSpec, TextSpec,
};
pub use crate::compile::targeting::targets;

pub use crate::effects::registry::{
    EffectDefinition, EffectSpec, EffectType, EffectUniform, ParamDef, definitions, lookup,
};

pub use crate::render::executor::{Executor, FrameStats, RenderOptions};
pub use crate::render::owner::TextureOwner;
pub use crate::render::pool::{OffscreenPool, PoolStats};
pub use crate::render::port::RendererPort;
pub use crate::render::recording::{CallKind, RecordingRenderer, RendererCall};

pub use crate::session::render_session::{RenderSession, render_hero_config};
