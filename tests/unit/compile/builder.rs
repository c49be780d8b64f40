use super::*;
use crate::compile::graph::NodeTag;
use crate::foundation::core::Viewport;
use crate::foundation::error::HeroError;
use crate::palette::primitive::Theme;
use crate::scene::mask::MaskShapeConfig;
use crate::scene::model::ColorConfig;
use crate::scene::modifier::MaskModifier;
use crate::scene::surface::{SurfaceConfig, SurfaceKind};

fn palette() -> PrimitivePalette {
    PrimitivePalette::fallback(&ColorConfig::default(), Theme::Light)
}

fn scene(layers: Vec<LayerNode>) -> SceneConfig {
    layers
        .into_iter()
        .fold(SceneConfig::new(Viewport::default()), SceneConfig::with_layer)
}

fn surface(id: &str) -> LayerNode {
    LayerNode::surface(id, SurfaceConfig::new(SurfaceKind::Grid))
}

fn mask(shape: MaskShapeConfig) -> Modifier {
    Modifier::Mask(MaskModifier::new(shape))
}

fn effect(id: &str) -> Modifier {
    Modifier::Effect(EffectConfig::new(id))
}

fn ids(p: &Pipeline) -> Vec<&str> {
    p.nodes().iter().map(|n| n.id.as_str()).collect()
}

fn inputs_of<'a>(p: &'a Pipeline, id: &str) -> Vec<&'a str> {
    let (idx, _) = p.find(id).unwrap();
    p.input_ids(idx)
}

#[test]
fn empty_scene_fails_to_build() {
    let err = build_pipeline(&scene(vec![]), &palette()).unwrap_err();
    assert_eq!(err.as_build(), Some(&BuildError::EmptyLayers));
}

#[test]
fn scene_without_renderable_layers_fails() {
    let cfg = scene(vec![
        LayerNode::processor("p", vec![effect("blur")]),
        LayerNode::group("empty", vec![]),
    ]);
    let err = build_pipeline(&cfg, &palette()).unwrap_err();
    assert!(matches!(
        err,
        HeroError::Build(BuildError::NothingToRender { layer_count: 2 })
    ));
}

#[test]
fn background_only_needs_no_overlay() {
    let cfg = scene(vec![LayerNode::background(SurfaceConfig::solid())]);
    let p = build_pipeline(&cfg, &palette()).unwrap();
    assert_eq!(ids(&p), ["render:background", "output"]);
    assert_eq!(p.count(NodeTag::Overlay), 0);
    assert_eq!(inputs_of(&p, "output"), ["render:background"]);
}

#[test]
fn background_resolves_with_background_roles() {
    let pal = palette();
    let cfg = scene(vec![LayerNode::background(SurfaceConfig::solid())]);
    let p = build_pipeline(&cfg, &pal).unwrap();
    let NodeKind::Render(RenderSpec::Surface(s)) = &p.nodes()[0].kind else {
        panic!("expected surface render");
    };
    let colors = ColorResolver::new(&pal, cfg.colors.semantic_context);
    assert_eq!(s.secondary, colors.resolve_key("F1"));
    assert_eq!(s.primary, colors.resolve_key("B"));
}

#[test]
fn root_level_base_is_the_fallback_background() {
    let cfg = scene(vec![
        LayerNode::Base(SurfaceLayer {
            meta: crate::scene::model::NodeMeta::new("legacy-bg"),
            surface: SurfaceConfig::solid(),
            colors: None,
        }),
        LayerNode::group("g", vec![surface("s")]),
    ]);
    let p = build_pipeline(&cfg, &palette()).unwrap();
    assert_eq!(ids(&p), ["render:background", "render:s", "scene", "output"]);
    assert_eq!(inputs_of(&p, "scene"), ["render:background", "render:s"]);
}

#[test]
fn clip_group_masks_its_content() {
    let cfg = scene(vec![
        LayerNode::background(SurfaceConfig::solid()),
        LayerNode::group(
            "clip",
            vec![
                surface("s"),
                LayerNode::processor("p", vec![mask(MaskShapeConfig::circle(0.5, 0.5, 0.3))]),
            ],
        ),
    ]);
    let p = build_pipeline(&cfg, &palette()).unwrap();
    assert_eq!(
        ids(&p),
        ["render:background", "render:s", "mask:p", "masked:p", "scene", "output"]
    );
    assert_eq!(inputs_of(&p, "masked:p"), ["render:s", "mask:p"]);
    assert_eq!(inputs_of(&p, "scene"), ["render:background", "masked:p"]);
    let NodeKind::Render(RenderSpec::Mask(m)) = &p.find("mask:p").unwrap().1.kind else {
        panic!("expected mask render");
    };
    assert!(m.keeps_inner());
}

#[test]
fn group_processors_apply_cumulatively() {
    let cfg = scene(vec![LayerNode::group(
        "g",
        vec![
            LayerNode::text("text1", "Hello"),
            LayerNode::processor("proc1", vec![mask(MaskShapeConfig::circle(0.5, 0.5, 0.3))]),
            LayerNode::text("text2", "World"),
            LayerNode::processor("proc2", vec![effect("blur")]),
        ],
    )]);
    let p = build_pipeline(&cfg, &palette()).unwrap();
    assert_eq!(inputs_of(&p, "masked:proc1"), ["render:text1", "mask:proc1"]);
    assert_eq!(inputs_of(&p, "overlay:proc2"), ["masked:proc1", "render:text2"]);
    assert_eq!(inputs_of(&p, "effects:proc2"), ["overlay:proc2"]);
    assert_eq!(inputs_of(&p, "output"), ["effects:proc2"]);
    assert!(p.find("group:g").is_none());
}

#[test]
fn adjacent_processor_in_group_is_skipped() {
    let cfg = scene(vec![LayerNode::group(
        "g",
        vec![
            surface("s"),
            LayerNode::processor("p1", vec![effect("blur")]),
            LayerNode::processor("p2", vec![effect("mosaic")]),
        ],
    )]);
    let p = build_pipeline(&cfg, &palette()).unwrap();
    assert!(p.find("effects:p1").is_some());
    assert!(p.find("effects:p2").is_none());
}

#[test]
fn root_processor_wraps_the_scene() {
    let cfg = scene(vec![
        LayerNode::background(SurfaceConfig::solid()),
        LayerNode::group("g", vec![surface("a"), surface("b")]),
        LayerNode::processor("post", vec![effect("vignette")]),
    ]);
    let p = build_pipeline(&cfg, &palette()).unwrap();
    assert_eq!(inputs_of(&p, "group:g"), ["render:a", "render:b"]);
    assert_eq!(inputs_of(&p, "effects:post"), ["scene"]);
    assert_eq!(inputs_of(&p, "output"), ["effects:post"]);
}

#[test]
fn root_processor_after_processor_is_skipped() {
    let cfg = scene(vec![
        surface("a"),
        LayerNode::processor("p1", vec![effect("blur")]),
        LayerNode::processor("p2", vec![effect("mosaic")]),
    ]);
    let p = build_pipeline(&cfg, &palette()).unwrap();
    assert_eq!(ids(&p), ["render:a", "effects:p1", "output"]);
}

#[test]
fn invisible_nodes_are_dropped_before_targeting() {
    let mut hidden = surface("hidden");
    if let LayerNode::Surface(s) = &mut hidden {
        s.meta.visible = false;
    }
    let mut hidden_proc = LayerNode::processor("hp", vec![effect("blur")]);
    if let LayerNode::Processor(pr) = &mut hidden_proc {
        pr.meta.visible = false;
    }
    let cfg = scene(vec![LayerNode::group(
        "g",
        vec![
            surface("a"),
            hidden_proc,
            hidden,
            LayerNode::processor("p", vec![effect("mosaic")]),
        ],
    )]);
    let p = build_pipeline(&cfg, &palette()).unwrap();
    assert_eq!(ids(&p), ["render:a", "effects:p", "output"]);
}

#[test]
fn effect_steps_alternate_slots_and_skip_unknown_ids() {
    let cfg = scene(vec![
        surface("a"),
        LayerNode::processor(
            "fx",
            vec![effect("blur"), effect("sparkle"), effect("pixelate"), effect("vignette")],
        ),
    ]);
    let p = build_pipeline(&cfg, &palette()).unwrap();
    let NodeKind::EffectChain(steps) = &p.find("effects:fx").unwrap().1.kind else {
        panic!("expected effect chain");
    };
    let targets = steps.iter().map(|s| s.target).collect::<Vec<_>>();
    assert_eq!(
        targets,
        [
            StepTarget::Pool(0),
            StepTarget::Skip,
            StepTarget::Pool(1),
            StepTarget::Output
        ]
    );
    assert!(steps[1].definition.is_none());
    assert_eq!(p.pool_slots(), 2);
}

#[test]
fn unnamed_and_duplicate_nodes_get_distinct_ids() {
    let mut unnamed = surface("");
    if let LayerNode::Surface(s) = &mut unnamed {
        s.meta.name = String::new();
    }
    let cfg = scene(vec![LayerNode::group(
        "g",
        vec![unnamed, surface("dup"), surface("dup")],
    )]);
    let p = build_pipeline(&cfg, &palette()).unwrap();
    assert_eq!(
        ids(&p),
        ["render:g[0]", "render:dup", "render:dup~2", "group:g", "output"]
    );
    assert_eq!(p.find("group:g").map(|(_, n)| n.inputs.len()), Some(3));
}

#[test]
fn building_twice_is_deterministic_and_leaves_config_untouched() {
    let cfg = scene(vec![
        LayerNode::background(SurfaceConfig::new(SurfaceKind::Stripe)),
        LayerNode::group(
            "g",
            vec![
                surface("a"),
                LayerNode::processor("p", vec![mask(MaskShapeConfig::circle(0.4, 0.4, 0.2))]),
                LayerNode::text("t", "hi"),
            ],
        ),
        LayerNode::processor("post", vec![effect("blur")]),
    ]);
    let before = cfg.clone();
    let a = build_pipeline(&cfg, &palette()).unwrap();
    let b = build_pipeline(&cfg, &palette()).unwrap();
    assert_eq!(a.dump(), b.dump());
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(cfg, before);
}

#[test]
fn background_group_children_build_like_group_children() {
    let cfg = scene(vec![LayerNode::group(
        BACKGROUND_GROUP_ID,
        vec![
            LayerNode::surface(BACKGROUND_SURFACE_ID, SurfaceConfig::solid()),
            LayerNode::processor("bgfx", vec![effect("blur")]),
        ],
    )]);
    let p = build_pipeline(&cfg, &palette()).unwrap();
    assert_eq!(ids(&p), ["render:background", "effects:bgfx", "output"]);
}
